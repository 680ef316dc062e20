//! Core attendance decision logic
//!
//! This module contains pure business logic with no I/O dependencies.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Identity, `SessionSchedule`, `LedgerEntry`, outcomes)
//! - `services/` - Matching, classification, scheduling, crediting and orchestration
//! - `ports/` - Trait definitions for the backing stores, clock and requester address
//! - `error` - Validation and store error taxonomy

pub mod error;
pub mod models;
pub mod ports;
pub mod services;
