//! TOML roster backing every store port
//!
//! A roster is one TOML document holding students (with their reference
//! embeddings), classroom bindings, schedules and ledger entries.
//!
//! - [`document`] - Serde model, load and save
//! - [`store`] - `IdentityStore`, `ScheduleStore`, `ClassroomStore` and
//!   `LedgerStore` implementation

pub mod document;
pub mod store;

pub use document::{RosterDocument, StudentRecord};
pub use store::RosterStore;
