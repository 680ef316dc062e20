//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the attendance decision logic
//! and everything it does not own: the student/schedule/classroom/ledger
//! repositories, the wall clock, and the requester's network address.
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The core depends only on these traits, never on concrete implementations.
//! Every call goes to the backing store; nothing is cached in-process.

mod address;
mod classroom_store;
mod clock;
mod identity_store;
mod ledger_store;
mod schedule_store;

pub use address::AddressSource;
pub use classroom_store::ClassroomStore;
pub use clock::Clock;
pub use identity_store::IdentityStore;
pub use ledger_store::{LedgerStore, LedgerUpdate};
pub use schedule_store::ScheduleStore;

#[cfg(test)]
pub use classroom_store::MockClassroomStore;
#[cfg(test)]
pub use identity_store::MockIdentityStore;
#[cfg(test)]
pub use schedule_store::MockScheduleStore;
