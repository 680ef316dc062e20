//! API request and response types
//!
//! All types are framework-agnostic and can be used by any client.

use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiErrorData};
use crate::config::ConfigSummary;
use crate::core::models::RegistrationKind;

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Standard API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorData>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    #[must_use]
    pub fn failure(err: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.into()),
        }
    }

    /// Wrap a handler result
    #[must_use]
    pub fn from_result(result: &Result<T, ApiError>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(data) => Self::success(data.clone()),
            Err(err) => Self::failure(err),
        }
    }
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request body for verifying attendance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyRequest {
    /// Student key
    pub student_id: String,
    /// Embedding of the live capture
    pub live_embedding: Vec<f32>,
}

/// Request body for registering reference embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// Student key
    pub student_id: String,
    /// Full reference set, in capture order
    pub embeddings: Vec<Vec<f32>>,
}

// =============================================================================
// RESPONSE DATA TYPES
// =============================================================================

/// Response data for registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationData {
    /// Student key
    pub student_id: String,
    /// Whether the student was new
    pub kind: RegistrationKind,
    /// Number of reference embeddings stored
    pub embeddings: usize,
}

/// Roster contents by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterCounts {
    /// Students
    pub students: usize,
    /// Students with a full reference set
    pub registered: usize,
    /// Classroom bindings
    pub classrooms: usize,
    /// Schedule slots
    pub schedules: usize,
    /// Ledger entries
    pub ledger_entries: usize,
}

/// Response data for status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusData {
    /// Crate version
    pub version: String,
    /// Active configuration
    pub config: ConfigSummary,
    /// Roster file, if file-backed
    pub roster: Option<String>,
    /// Roster contents
    pub counts: RosterCounts,
}
