//! HTTP-agnostic API layer
//!
//! Typed request/response structures and pure handlers that any transport
//! (an HTTP server, the CLI, a test harness) can drive.
//!
//! ## Design
//!
//! - **One canonical request schema**: unknown or aliased fields are rejected
//! - **Handlers are pure functions**: take typed input, return `Result<T, ApiError>`
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code for translation

mod error;
mod handlers;
mod types;

pub use error::{ApiError, ApiErrorData, ErrorCode};
pub use handlers::{
    parse_register_request, parse_verify_request, register, round_score, round_scores, status,
    verify,
};
pub use types::{ApiResponse, RegisterRequest, RegistrationData, RosterCounts, StatusData, VerifyRequest};
