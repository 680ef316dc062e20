//! Output formatting for human and JSON modes
//!
//! Every command result can be rendered either as human-readable text or as
//! the JSON [`ApiResponse`] envelope.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;

use crate::api::{ApiError, ApiResponse, RegistrationData, StatusData};
use crate::core::models::VerificationOutcome;

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Render a verification result to stdout (errors to stderr in human mode)
pub fn render_verification(result: &Result<VerificationOutcome, ApiError>, mode: OutputMode) {
    emit(result, mode, format_outcome);
}

/// Render a registration result
pub fn render_registration(result: &Result<RegistrationData, ApiError>, mode: OutputMode) {
    emit(result, mode, format_registration);
}

/// Render a status result
pub fn render_status(result: &Result<StatusData, ApiError>, mode: OutputMode) {
    emit(result, mode, format_status);
}

fn emit<T: Serialize + Clone>(
    result: &Result<T, ApiError>,
    mode: OutputMode,
    human: fn(&T) -> String,
) {
    match (mode, result) {
        (OutputMode::Json, _) => println!("{}", json(result)),
        (OutputMode::Human, Ok(data)) => print!("{}", human(data)),
        (OutputMode::Human, Err(err)) => eprintln!("{}", format_error(err)),
    }
}

/// The JSON envelope for a result
#[must_use]
pub fn json<T: Serialize + Clone>(result: &Result<T, ApiError>) -> String {
    serde_json::to_string_pretty(&ApiResponse::from_result(result)).unwrap_or_default()
}

/// Human text for an API error
#[must_use]
pub fn format_error(err: &ApiError) -> String {
    let hint = if err.is_retryable() { " (retry later)" } else { "" };
    format!("{} {}{hint}", "error:".red().bold(), err.message)
}

/// Human text for a verification outcome
#[must_use]
pub fn format_outcome(outcome: &VerificationOutcome) -> String {
    let mut out = String::new();
    let tag = outcome.status().as_str();
    if outcome.is_credited() {
        let _ = writeln!(out, "{} {}", tag.green().bold(), outcome.message());
    } else {
        let _ = writeln!(out, "{} {}", tag.yellow().bold(), outcome.message());
    }

    match outcome {
        VerificationOutcome::Credited {
            attended,
            total,
            percentage,
            best_score,
            match_count,
            scores,
            ..
        } => {
            let _ = writeln!(out, "  attendance: {attended}/{total} ({percentage:.2}%)");
            let _ = writeln!(
                out,
                "  matches:    {match_count}/{} (best {best_score:.2})",
                scores.len()
            );
        },
        VerificationOutcome::BiometricMismatch {
            match_count,
            required_matches,
            best_score,
            ..
        } => {
            let _ = writeln!(
                out,
                "  matches:    {match_count} of {required_matches} required (best {best_score:.2})"
            );
        },
        VerificationOutcome::LocationMismatch {
            requester,
            classroom_address,
            ..
        } => {
            let _ = writeln!(
                out,
                "  requester:  {}",
                requester.as_deref().unwrap_or("unknown")
            );
            let _ = writeln!(out, "  classroom:  {classroom_address}");
        },
        VerificationOutcome::NoActiveSession { group, at } => {
            let _ = writeln!(out, "  group {group} at {}", at.format("%H:%M"));
        },
        VerificationOutcome::IncompleteReferenceData { found, expected } => {
            let _ = writeln!(out, "  found {found} of {expected} reference embeddings");
        },
        VerificationOutcome::AlreadyCredited { last_credit, .. } => {
            let _ = writeln!(out, "  credited at {}", last_credit.format("%Y-%m-%d %H:%M"));
        },
        VerificationOutcome::NotRegistered { .. }
        | VerificationOutcome::NoGroupAssigned { .. }
        | VerificationOutcome::ClassroomConfigMissing { .. } => {},
    }
    out
}

fn format_registration(data: &RegistrationData) -> String {
    format!(
        "{} {} ({} reference embeddings)\n",
        data.kind.to_string().green().bold(),
        data.student_id,
        data.embeddings
    )
}

/// Human text for status
#[must_use]
pub fn format_status(data: &StatusData) -> String {
    let mut out = String::new();
    let c = &data.config;
    let _ = writeln!(out, "{} {}", "rollcall".bold(), data.version);
    let _ = writeln!(out, "  config:     {}", c.source.as_deref().unwrap_or("defaults"));
    let _ = writeln!(out, "  roster:     {}", data.roster.as_deref().unwrap_or("in-memory"));
    let _ = writeln!(
        out,
        "  matching:   threshold {:.2}, {} of {} references, dimension {}",
        c.similarity_threshold, c.min_matches, c.reference_count, c.embedding_dimension
    );
    let loopback = if c.allow_loopback { ", loopback allowed" } else { "" };
    let _ = writeln!(out, "  network:    /{}{loopback}", c.mask_bits);
    let _ = writeln!(out, "  clock:      UTC{}", c.utc_offset);
    let n = &data.counts;
    let _ = writeln!(
        out,
        "  students:   {} ({} with full reference set)",
        n.students, n.registered
    );
    let _ = writeln!(out, "  classrooms: {}", n.classrooms);
    let _ = writeln!(out, "  schedules:  {}", n.schedules);
    let _ = writeln!(out, "  ledger:     {}", n.ledger_entries);
    out
}
