//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `roster/` - TOML roster document backing every store port
//! - `clock` - System and fixed wall clocks
//! - `origin` - Requester address from forwarded-for header or peer address

pub mod clock;
pub mod origin;
pub mod roster;

pub use clock::{FixedClock, SystemClock};
pub use origin::RequestOrigin;
pub use roster::{RosterDocument, RosterStore, StudentRecord};
