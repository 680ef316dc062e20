//! Domain models for rollcall
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Identity`] - A registered student
//! - [`ClassroomBinding`] - Room label mapped to its router address
//! - [`SessionSchedule`] - One weekly class slot for a group
//! - [`LedgerEntry`] - Per-(student, subject) attendance counters
//! - [`VerificationOutcome`] - Terminal result of a verify request
//! - [`VerificationPolicy`] - Matching parameters

mod identity;
mod ledger;
mod outcome;
mod policy;
mod schedule;

pub use identity::{ClassroomBinding, Identity, RegistrationKind};
pub use ledger::LedgerEntry;
pub use outcome::{VerificationOutcome, VerificationStatus};
pub use policy::{DEFAULT_KEY_PATTERN, KeyFormat, VerificationPolicy};
pub use schedule::{SessionSchedule, SessionWindow};
