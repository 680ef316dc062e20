//! Session credit ledger - credits attendance at most once per session
//!
//! A (student, subject) pair is eligible for credit unless its last credit
//! was recorded on the same calendar day *and* inside the current session's
//! window. Eligibility is recomputed on every call from the stored
//! timestamp; there is no explicit status field. Two sessions of the same
//! subject on the same day are therefore credited independently.

use chrono::NaiveDateTime;
use log::debug;

use crate::core::error::StoreError;
use crate::core::models::{LedgerEntry, SessionWindow};
use crate::core::ports::LedgerStore;

/// Result of a credit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Counters incremented; carries the entry as written
    Credited(LedgerEntry),
    /// This session was already credited; nothing written
    AlreadyCreditedForSession {
        /// Entry as currently stored
        entry: LedgerEntry,
        /// Time of the credit that blocks this one
        last_credit: NaiveDateTime,
    },
}

/// Credit one attended session for (`identity`, `subject`) unless already credited
///
/// The dedup check and the increment run inside a single
/// [`LedgerStore::update_entry`] call, so concurrent attempts for the same
/// row produce exactly one `Credited`. The entry is created on first credit.
pub fn try_credit(
    store: &dyn LedgerStore,
    identity: &str,
    subject: &str,
    window: SessionWindow,
    now: NaiveDateTime,
) -> Result<CreditOutcome, StoreError> {
    let mut outcome = None;

    store.update_entry(identity, subject, &mut |current| {
        let entry = current.cloned().unwrap_or_else(|| LedgerEntry::new(identity, subject));

        if entry.credited_within(&window, now) {
            let last_credit = entry.last_credit.unwrap_or(now);
            outcome = Some(CreditOutcome::AlreadyCreditedForSession { entry, last_credit });
            return None;
        }

        let next = entry.credited(now);
        outcome = Some(CreditOutcome::Credited(next.clone()));
        Some(next)
    })?;

    let outcome = outcome.ok_or_else(|| {
        StoreError::Unavailable(format!("ledger update for ({identity}, {subject}) did not run"))
    })?;

    match &outcome {
        CreditOutcome::Credited(entry) => debug!(
            "credited {identity}/{subject}: {}/{} ({:.2}%)",
            entry.attended,
            entry.total,
            entry.percentage()
        ),
        CreditOutcome::AlreadyCreditedForSession { last_credit, .. } => {
            debug!("{identity}/{subject} already credited at {last_credit} for {window}");
        },
    }

    Ok(outcome)
}
