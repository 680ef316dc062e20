//! Tests for the HTTP-agnostic API layer

use rollcall::adapters::{FixedClock, RequestOrigin, RosterStore};
use rollcall::api::{self, ApiResponse, ErrorCode, RegisterRequest, VerifyRequest};
use rollcall::config::Config;
use rollcall::core::error::{StoreError, VerifyError};
use rollcall::core::models::{RegistrationKind, VerificationOutcome};
use rollcall::core::services::{Orchestrator, Stores};

use crate::common::fixtures::{IN_ROOM, STUDENT, at, live, policy, references, roster};
use crate::common::mocks::FailingStore;

// =============================================================================
// REQUEST PARSING
// =============================================================================

#[test]
fn test_parse_verify_request() {
    let req = api::parse_verify_request(r#"{"student_id":"1RV23CS001","live_embedding":[0.5,1]}"#)
        .unwrap();
    assert_eq!(
        req,
        VerifyRequest {
            student_id: STUDENT.to_string(),
            live_embedding: vec![0.5, 1.0],
        }
    );
}

#[test]
fn test_non_numeric_embedding_is_bad_request() {
    let err = api::parse_verify_request(r#"{"student_id":"1RV23CS001","live_embedding":["a"]}"#)
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::BadRequest);
}

#[test]
fn test_alias_fields_are_rejected() {
    for body in [
        r#"{"usn":"1RV23CS001","live_embedding":[1.0]}"#,
        r#"{"student_id":"1RV23CS001","embedding":[1.0]}"#,
        r#"{"student_id":"1RV23CS001","live_embedding":[1.0],"extra":true}"#,
    ] {
        assert_eq!(api::parse_verify_request(body).unwrap_err().status_code(), 400, "{body}");
    }
    let err = api::parse_register_request(r#"{"student_id":"1RV23CS001","embeddings":[[1.0]],"name":"x"}"#)
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

#[test]
fn test_error_codes() {
    let store: api::ApiError = VerifyError::from(StoreError::Unavailable("down".into())).into();
    assert_eq!(store.code, ErrorCode::StoreUnavailable);
    assert_eq!(store.status_code(), 503);
    assert!(store.is_retryable());

    let contended: api::ApiError = StoreError::Conflict("roster.toml.lock".into()).into();
    assert_eq!(contended.status_code(), 503);
    assert!(contended.is_retryable());
    assert_eq!(contended.to_string(), "STORE_UNAVAILABLE: store contended: roster.toml.lock");
}

#[test]
fn test_verify_handler_maps_validation_to_bad_request() {
    let store = RosterStore::in_memory(roster());
    let clock = FixedClock(at(8, 10));
    let orchestrator = Orchestrator::new(Stores::uniform(&store), &clock, policy());
    let req = VerifyRequest {
        student_id: STUDENT.to_string(),
        live_embedding: vec![1.0; 3],
    };
    let err = api::verify(&orchestrator, &req, &RequestOrigin::peer(IN_ROOM)).unwrap_err();
    assert_eq!(err.code, ErrorCode::BadRequest);
    assert!(err.message.contains("dimension"), "{}", err.message);
}

#[test]
fn test_verify_handler_maps_store_failure_to_unavailable() {
    let store = FailingStore;
    let clock = FixedClock(at(8, 10));
    let orchestrator = Orchestrator::new(Stores::uniform(&store), &clock, policy());
    let req = VerifyRequest {
        student_id: STUDENT.to_string(),
        live_embedding: live(),
    };
    let err = api::verify(&orchestrator, &req, &RequestOrigin::peer(IN_ROOM)).unwrap_err();
    assert_eq!(err.code, ErrorCode::StoreUnavailable);
}

// =============================================================================
// HANDLERS
// =============================================================================

#[test]
fn test_verify_handler_rounds_scores() {
    let store = RosterStore::in_memory(roster());
    let clock = FixedClock(at(8, 10));
    let orchestrator = Orchestrator::new(Stores::uniform(&store), &clock, policy());
    let req = VerifyRequest {
        student_id: STUDENT.to_string(),
        live_embedding: live(),
    };

    let outcome = api::verify(&orchestrator, &req, &RequestOrigin::peer(IN_ROOM)).unwrap();
    let VerificationOutcome::Credited { scores, best_score, .. } = outcome else {
        panic!("expected credit");
    };
    for score in scores.iter().chain(std::iter::once(&best_score)) {
        assert!((score * 100.0 - (score * 100.0).round()).abs() < 1e-9, "{score}");
    }
    assert!((best_score - 1.0).abs() < 1e-9);
}

#[test]
fn test_round_scores_on_mismatch() {
    let outcome = api::round_scores(VerificationOutcome::BiometricMismatch {
        scores: vec![0.123_456, 0.789_01],
        match_count: 0,
        required_matches: 2,
        best_score: 0.789_01,
    });
    assert_eq!(
        outcome,
        VerificationOutcome::BiometricMismatch {
            scores: vec![0.12, 0.79],
            match_count: 0,
            required_matches: 2,
            best_score: 0.79,
        }
    );
}

#[test]
fn test_register_handler() {
    let store = RosterStore::in_memory(roster());
    let clock = FixedClock(at(7, 0));
    let orchestrator = Orchestrator::new(Stores::uniform(&store), &clock, policy());
    let req = RegisterRequest {
        student_id: "1RV23CS002".to_string(),
        embeddings: references(),
    };
    let data = api::register(&orchestrator, &req).unwrap();
    assert_eq!(data.kind, RegistrationKind::Registered);
    assert_eq!(data.embeddings, 5);
}

#[test]
fn test_status_counts() {
    let mut doc = roster();
    doc.students.push(rollcall::adapters::StudentRecord::new("1RV23CS002", Some("10A")));
    let store = RosterStore::in_memory(doc);
    let status = api::status(&Config::default(), None, &store).unwrap();

    assert_eq!(status.counts.students, 2);
    assert_eq!(status.counts.registered, 1);
    assert_eq!(status.counts.classrooms, 1);
    assert_eq!(status.counts.schedules, 2);
    assert_eq!(status.counts.ledger_entries, 0);
    assert_eq!(status.roster, None);
    assert_eq!(status.version, rollcall::VERSION);
}

// =============================================================================
// ENVELOPE
// =============================================================================

#[test]
fn test_envelope_shapes() {
    let ok: Result<VerificationOutcome, api::ApiError> = Ok(VerificationOutcome::NotRegistered {
        identity: STUDENT.to_string(),
    });
    let json = serde_json::to_value(ApiResponse::from_result(&ok)).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "not_registered");
    assert!(json.get("error").is_none());

    let err: Result<VerificationOutcome, api::ApiError> =
        Err(api::ApiError::bad_request("invalid student key format: x"));
    let json = serde_json::to_value(ApiResponse::from_result(&err)).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "BAD_REQUEST");
    assert!(json.get("data").is_none());
}
