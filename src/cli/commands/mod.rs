//! Command implementations

mod context;
mod register;
mod status;
mod verify;

pub use register::register;
pub use status::status;
pub use verify::{VerifyOrigin, verify};
