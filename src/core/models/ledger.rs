//! Attendance ledger entry
//!
//! One entry per (student, subject). Counters only ever move together and
//! the percentage is always derived from them, never stored.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::SessionWindow;

/// Running attendance counters for one student in one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Student key
    pub identity: String,
    /// Subject name
    pub subject: String,
    /// Sessions credited as attended
    #[serde(default)]
    pub attended: u32,
    /// Sessions counted in total
    #[serde(default)]
    pub total: u32,
    /// Local wall-clock time of the most recent credit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_credit: Option<NaiveDateTime>,
}

impl LedgerEntry {
    /// A fresh entry with zeroed counters
    #[must_use]
    pub fn new(identity: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            subject: subject.into(),
            attended: 0,
            total: 0,
            last_credit: None,
        }
    }

    /// `attended / total * 100`, or 0 when nothing has been counted yet
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.attended) / f64::from(self.total) * 100.0
    }

    /// Whether the last credit was on `now`'s calendar day inside `window`
    #[must_use]
    pub fn credited_within(&self, window: &SessionWindow, now: NaiveDateTime) -> bool {
        self.last_credit
            .is_some_and(|last| last.date() == now.date() && window.contains(last.time()))
    }

    /// The entry after crediting one attended session at `now`
    #[must_use]
    pub fn credited(mut self, now: NaiveDateTime) -> Self {
        self.attended = self.attended.saturating_add(1);
        self.total = self.total.saturating_add(1);
        self.last_credit = Some(now);
        self
    }

    /// Whether the counters satisfy `attended <= total`
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.attended <= self.total
    }
}
