//! Pure API handlers
//!
//! These handlers wrap the orchestrator for any transport. They are
//! HTTP-agnostic.

use std::path::Path;

use crate::adapters::RosterStore;
use crate::api::error::ApiError;
use crate::api::types::{
    RegisterRequest, RegistrationData, RosterCounts, StatusData, VerifyRequest,
};
use crate::config::Config;
use crate::core::models::VerificationOutcome;
use crate::core::ports::AddressSource;
use crate::core::services::Orchestrator;

/// Parse a verify request body
pub fn parse_verify_request(body: &str) -> Result<VerifyRequest, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::bad_request(format!("invalid verify request: {e}")))
}

/// Parse a register request body
pub fn parse_register_request(body: &str) -> Result<RegisterRequest, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::bad_request(format!("invalid register request: {e}")))
}

/// Verify attendance; scores in the outcome are rounded for presentation
pub fn verify(
    orchestrator: &Orchestrator<'_>,
    request: &VerifyRequest,
    origin: &dyn AddressSource,
) -> Result<VerificationOutcome, ApiError> {
    let outcome = orchestrator.verify(&request.student_id, &request.live_embedding, origin)?;
    Ok(round_scores(outcome))
}

/// Register a full reference set
pub fn register(
    orchestrator: &Orchestrator<'_>,
    request: &RegisterRequest,
) -> Result<RegistrationData, ApiError> {
    let kind = orchestrator.register(&request.student_id, &request.embeddings)?;
    Ok(RegistrationData {
        student_id: request.student_id.clone(),
        kind,
        embeddings: request.embeddings.len(),
    })
}

/// Configuration and roster summary
pub fn status(
    config: &Config,
    config_path: Option<&Path>,
    roster: &RosterStore,
) -> Result<StatusData, ApiError> {
    let doc = roster.snapshot()?;
    let reference_count = config.verification.reference_count;
    Ok(StatusData {
        version: crate::VERSION.to_string(),
        config: config.summary(config_path),
        roster: roster.path().map(|p| p.display().to_string()),
        counts: RosterCounts {
            students: doc.students.len(),
            registered: doc
                .students
                .iter()
                .filter(|s| s.embeddings.len() == reference_count)
                .count(),
            classrooms: doc.classrooms.len(),
            schedules: doc.schedules.len(),
            ledger_entries: doc.ledger.len(),
        },
    })
}

/// Round a similarity score to two decimals
#[must_use]
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

/// Round every similarity score and the percentage in an outcome
#[must_use]
pub fn round_scores(outcome: VerificationOutcome) -> VerificationOutcome {
    match outcome {
        VerificationOutcome::BiometricMismatch {
            scores,
            match_count,
            required_matches,
            best_score,
        } => VerificationOutcome::BiometricMismatch {
            scores: scores.into_iter().map(round_score).collect(),
            match_count,
            required_matches,
            best_score: round_score(best_score),
        },
        VerificationOutcome::Credited {
            subject,
            percentage,
            attended,
            total,
            best_score,
            scores,
            match_count,
            credited_at,
        } => VerificationOutcome::Credited {
            subject,
            percentage: round_score(percentage),
            attended,
            total,
            best_score: round_score(best_score),
            scores: scores.into_iter().map(round_score).collect(),
            match_count,
            credited_at,
        },
        other => other,
    }
}
