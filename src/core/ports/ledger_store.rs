//! Ledger store port
//!
//! The one shared mutable resource of the core. Crediting relies on
//! [`LedgerStore::update_entry`] running its closure as a single atomic
//! read-modify-write for the given (identity, subject) row.

use crate::core::error::StoreError;
use crate::core::models::LedgerEntry;

/// Closure deciding the new value of a ledger row
///
/// Receives the current entry (if any) and returns the entry to write, or
/// `None` to leave the row untouched.
pub type LedgerUpdate<'a> = dyn FnMut(Option<&LedgerEntry>) -> Option<LedgerEntry> + 'a;

/// Persistence of per-(student, subject) attendance counters
pub trait LedgerStore: Send + Sync {
    /// Current entry for a (student, subject) pair
    fn get_entry(&self, identity: &str, subject: &str) -> Result<Option<LedgerEntry>, StoreError>;

    /// Insert or overwrite an entry
    fn upsert_entry(&self, entry: &LedgerEntry) -> Result<(), StoreError>;

    /// Atomically read, decide and write one row
    ///
    /// Implementations must guarantee that no other `update_entry` or
    /// `upsert_entry` for the same row interleaves between the read passed
    /// to `update` and the write of its result (row lock, file lock, or
    /// serializable transaction). A writer that cannot get exclusive access
    /// in time reports [`StoreError::Conflict`].
    fn update_entry(
        &self,
        identity: &str,
        subject: &str,
        update: &mut LedgerUpdate<'_>,
    ) -> Result<(), StoreError>;
}
