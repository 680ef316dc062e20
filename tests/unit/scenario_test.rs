//! End-to-end verification scenarios against the in-memory roster

use rollcall::adapters::{FixedClock, RequestOrigin, RosterStore};
use rollcall::core::error::VerifyError;
use rollcall::core::models::{LedgerEntry, RegistrationKind, VerificationOutcome, VerificationStatus};
use rollcall::core::ports::LedgerStore;
use rollcall::core::services::{Orchestrator, Stores, average};

use crate::common::fixtures::{
    DIM, IN_ROOM, OFF_SITE, ROUTER, STUDENT, at, axis, live, policy, references, roster,
};
use crate::common::mocks::{FailingStore, RecordingStore};

fn verify_at(store: &RosterStore, h: u32, m: u32, requester: &str) -> VerificationOutcome {
    let clock = FixedClock(at(h, m));
    Orchestrator::new(Stores::uniform(store), &clock, policy())
        .verify(STUDENT, &live(), &RequestOrigin::peer(requester))
        .unwrap()
}

// =============================================================================
// HAPPY PATH AND DEDUP
// =============================================================================

#[test]
fn test_first_verification_credits_session() {
    let store = RosterStore::in_memory(roster());
    let outcome = verify_at(&store, 8, 10, IN_ROOM);

    match outcome {
        VerificationOutcome::Credited {
            subject,
            attended,
            total,
            percentage,
            match_count,
            scores,
            credited_at,
            ..
        } => {
            assert_eq!(subject, "Math");
            assert_eq!((attended, total), (1, 1));
            assert!((percentage - 100.0).abs() < 1e-9);
            assert_eq!(match_count, 3);
            assert_eq!(scores.len(), 5);
            assert_eq!(credited_at, at(8, 10));
        },
        other => panic!("expected credit, got {other:?}"),
    }
}

#[test]
fn test_second_verification_in_same_session_is_refused() {
    let store = RosterStore::in_memory(roster());
    verify_at(&store, 8, 10, IN_ROOM);
    let outcome = verify_at(&store, 8, 45, IN_ROOM);

    assert_eq!(
        outcome,
        VerificationOutcome::AlreadyCredited {
            subject: "Math".to_string(),
            last_credit: at(8, 10),
        }
    );
    let entry = store.get_entry(STUDENT, "Math").unwrap().unwrap();
    assert_eq!((entry.attended, entry.total), (1, 1));
}

#[test]
fn test_next_day_same_session_is_credited() {
    let mut doc = roster();
    let mut entry = LedgerEntry::new(STUDENT, "Math");
    entry.attended = 3;
    entry.total = 4;
    entry.last_credit = Some(at(8, 10) - chrono::Duration::days(1));
    doc.ledger.push(entry);
    let store = RosterStore::in_memory(doc);

    match verify_at(&store, 8, 10, IN_ROOM) {
        VerificationOutcome::Credited {
            attended,
            total,
            percentage,
            ..
        } => {
            assert_eq!((attended, total), (4, 5));
            assert!((percentage - 80.0).abs() < 1e-9);
        },
        other => panic!("expected credit, got {other:?}"),
    }
}

// =============================================================================
// POLICY REJECTIONS
// =============================================================================

#[test]
fn test_off_site_requester_is_rejected_without_credit() {
    let store = RosterStore::in_memory(roster());
    let outcome = verify_at(&store, 8, 10, OFF_SITE);

    assert_eq!(
        outcome,
        VerificationOutcome::LocationMismatch {
            room: "R1".to_string(),
            requester: Some(OFF_SITE.to_string()),
            classroom_address: ROUTER.to_string(),
        }
    );
    assert!(store.get_entry(STUDENT, "Math").unwrap().is_none());
}

#[test]
fn test_forwarded_for_header_decides_location() {
    let store = RosterStore::in_memory(roster());
    let clock = FixedClock(at(8, 10));
    let origin = RequestOrigin::peer(OFF_SITE).with_forwarded_for(format!("{IN_ROOM}, {OFF_SITE}"));
    let outcome = Orchestrator::new(Stores::uniform(&store), &clock, policy())
        .verify(STUDENT, &live(), &origin)
        .unwrap();
    assert!(outcome.is_credited());
}

#[test]
fn test_between_sessions_has_no_active_session() {
    let store = RosterStore::in_memory(roster());
    let outcome = verify_at(&store, 9, 5, IN_ROOM);
    assert_eq!(outcome.status(), VerificationStatus::NoActiveSession);
}

#[test]
fn test_unbound_room_is_classroom_config_missing() {
    let store = RosterStore::in_memory(roster());
    let outcome = verify_at(&store, 9, 30, IN_ROOM);
    assert_eq!(
        outcome,
        VerificationOutcome::ClassroomConfigMissing {
            subject: "Physics".to_string(),
            room: "R2".to_string(),
        }
    );
}

#[test]
fn test_unknown_student_is_not_registered() {
    let store = RosterStore::in_memory(roster());
    let clock = FixedClock(at(8, 10));
    let outcome = Orchestrator::new(Stores::uniform(&store), &clock, policy())
        .verify("1RV23CS002", &live(), &RequestOrigin::peer(IN_ROOM))
        .unwrap();
    assert_eq!(outcome.status(), VerificationStatus::NotRegistered);
}

#[test]
fn test_missing_group_is_reported() {
    let mut doc = roster();
    doc.students[0].group = Some("  ".to_string());
    let store = RosterStore::in_memory(doc);
    let outcome = verify_at(&store, 8, 10, IN_ROOM);
    assert_eq!(outcome.status(), VerificationStatus::NoGroupAssigned);
}

#[test]
fn test_dissimilar_capture_is_biometric_mismatch() {
    let store = RosterStore::in_memory(roster());
    let clock = FixedClock(at(8, 10));
    let outcome = Orchestrator::new(Stores::uniform(&store), &clock, policy())
        .verify(STUDENT, &axis(7), &RequestOrigin::peer(IN_ROOM))
        .unwrap();

    match outcome {
        VerificationOutcome::BiometricMismatch {
            match_count,
            required_matches,
            best_score,
            ..
        } => {
            assert_eq!(match_count, 0);
            assert_eq!(required_matches, 2);
            assert!(best_score.abs() < 1e-9);
        },
        other => panic!("expected mismatch, got {other:?}"),
    }
    assert!(store.get_entry(STUDENT, "Math").unwrap().is_none());
}

// =============================================================================
// REFERENCE SET SELECTION
// =============================================================================

#[test]
fn test_short_reference_set_without_fallback_is_incomplete() {
    let mut doc = roster();
    doc.students[0].embeddings.truncate(4);
    let store = RosterStore::in_memory(doc);

    assert_eq!(
        verify_at(&store, 8, 10, IN_ROOM),
        VerificationOutcome::IncompleteReferenceData { found: 4, expected: 5 }
    );
}

#[test]
fn test_short_reference_set_uses_fallback_with_one_match() {
    let mut doc = roster();
    doc.students[0].embeddings.truncate(2);
    doc.students[0].fallback_embedding = Some(axis(0));
    let store = RosterStore::in_memory(doc);

    match verify_at(&store, 8, 10, IN_ROOM) {
        VerificationOutcome::Credited { match_count, scores, .. } => {
            assert_eq!(match_count, 1);
            assert_eq!(scores.len(), 1);
        },
        other => panic!("expected credit via fallback, got {other:?}"),
    }
}

#[test]
fn test_malformed_fallback_is_incomplete() {
    let mut doc = roster();
    doc.students[0].embeddings.clear();
    doc.students[0].fallback_embedding = Some(vec![1.0; DIM - 1]);
    let store = RosterStore::in_memory(doc);

    assert_eq!(
        verify_at(&store, 8, 10, IN_ROOM),
        VerificationOutcome::IncompleteReferenceData { found: 0, expected: 5 }
    );
}

// =============================================================================
// ERRORS
// =============================================================================

#[test]
fn test_invalid_capture_never_reaches_the_store() {
    let store = RecordingStore::new(roster());
    let clock = FixedClock(at(8, 10));
    let orchestrator = Orchestrator::new(Stores::uniform(&store), &clock, policy());

    let mut bad = live();
    bad[3] = f32::NAN;
    let err = orchestrator.verify(STUDENT, &bad, &RequestOrigin::peer(IN_ROOM)).unwrap_err();
    assert!(matches!(err, VerifyError::Validation(_)));

    let err = orchestrator
        .verify(STUDENT, &live()[..DIM - 1], &RequestOrigin::peer(IN_ROOM))
        .unwrap_err();
    assert!(!err.is_retryable());

    let err = orchestrator.verify("student-1", &live(), &RequestOrigin::peer(IN_ROOM)).unwrap_err();
    assert!(matches!(err, VerifyError::Validation(_)));

    assert_eq!(store.calls(), 0);
}

#[test]
fn test_store_failure_is_an_error_not_an_outcome() {
    let store = FailingStore;
    let clock = FixedClock(at(8, 10));
    let err = Orchestrator::new(Stores::uniform(&store), &clock, policy())
        .verify(STUDENT, &live(), &RequestOrigin::peer(IN_ROOM))
        .unwrap_err();
    assert!(err.is_retryable());
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[test]
fn test_register_then_verify() {
    let mut doc = roster();
    doc.students.clear();
    let store = RosterStore::in_memory(doc);
    let clock = FixedClock(at(7, 30));
    let orchestrator = Orchestrator::new(Stores::uniform(&store), &clock, policy());

    assert_eq!(orchestrator.register(STUDENT, &references()).unwrap(), RegistrationKind::Registered);
    assert_eq!(orchestrator.register(STUDENT, &references()).unwrap(), RegistrationKind::Updated);

    let snapshot = store.snapshot().unwrap();
    let record = &snapshot.students[0];
    assert_eq!(record.fallback_embedding.as_deref(), Some(average(&references()).as_slice()));
    assert_eq!(record.registered_at, Some(at(7, 30)));

    // registration does not assign a group
    assert_eq!(verify_at(&store, 8, 10, IN_ROOM).status(), VerificationStatus::NoGroupAssigned);
}

#[test]
fn test_register_rejects_bad_batches_before_store_access() {
    let store = RecordingStore::new(roster());
    let clock = FixedClock(at(7, 30));
    let orchestrator = Orchestrator::new(Stores::uniform(&store), &clock, policy());

    let mut refs = references();
    refs.pop();
    assert!(orchestrator.register(STUDENT, &refs).is_err());

    let mut refs = references();
    refs[2] = vec![0.0; DIM + 1];
    let err = orchestrator.register(STUDENT, &refs).unwrap_err();
    assert!(err.to_string().contains("embedding 3"), "{err}");

    assert_eq!(store.calls(), 0);
}
