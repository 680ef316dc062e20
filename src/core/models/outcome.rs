//! Verification outcome
//!
//! Every `verify` request ends in exactly one of these variants. Callers
//! branch on the variant (or on [`VerificationStatus`]), never on message text.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Machine-readable status tag of a [`VerificationOutcome`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Unknown student key
    NotRegistered,
    /// Student has no group label
    NoGroupAssigned,
    /// No session for the group at this time
    NoActiveSession,
    /// The session's room has no network binding
    ClassroomConfigMissing,
    /// Requester is not in the classroom subnet
    LocationMismatch,
    /// No usable reference embeddings
    IncompleteReferenceData,
    /// Not enough reference embeddings matched
    BiometricMismatch,
    /// Session already credited
    AlreadyCredited,
    /// Credit granted
    Ok,
}

impl VerificationStatus {
    /// Snake-case tag, identical to the serialized form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRegistered => "not_registered",
            Self::NoGroupAssigned => "no_group_assigned",
            Self::NoActiveSession => "no_active_session",
            Self::ClassroomConfigMissing => "classroom_config_missing",
            Self::LocationMismatch => "location_mismatch",
            Self::IncompleteReferenceData => "incomplete_reference_data",
            Self::BiometricMismatch => "biometric_mismatch",
            Self::AlreadyCredited => "already_credited",
            Self::Ok => "ok",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a `verify` request, with its diagnostic payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// No identity with this key
    NotRegistered {
        /// Requested student key
        identity: String,
    },

    /// Identity exists but has no group label
    NoGroupAssigned {
        /// Student key
        identity: String,
    },

    /// No scheduled session for the group contains the current time
    NoActiveSession {
        /// Group label
        group: String,
        /// Local time of day the lookup used
        at: NaiveTime,
    },

    /// The active session's room has no registered address
    ClassroomConfigMissing {
        /// Subject of the active session
        subject: String,
        /// Room label with no binding
        room: String,
    },

    /// Requester address is not co-located with the classroom router
    LocationMismatch {
        /// Room the student is expected in
        room: String,
        /// Requester address, if one could be determined
        requester: Option<String>,
        /// Router address registered for the room
        classroom_address: String,
    },

    /// Neither a full reference set nor a usable fallback vector exists
    IncompleteReferenceData {
        /// Number of stored reference vectors
        found: usize,
        /// Number the policy expects
        expected: usize,
    },

    /// Too few reference embeddings reached the similarity threshold
    BiometricMismatch {
        /// Similarity against each reference, in stored order
        scores: Vec<f64>,
        /// How many scores reached the threshold
        match_count: usize,
        /// How many were required
        required_matches: usize,
        /// Highest similarity observed
        best_score: f64,
    },

    /// This session was already credited
    AlreadyCredited {
        /// Subject of the active session
        subject: String,
        /// When the existing credit was recorded
        last_credit: NaiveDateTime,
    },

    /// Credit granted
    #[serde(rename = "ok")]
    Credited {
        /// Subject credited
        subject: String,
        /// Attendance percentage after this credit
        percentage: f64,
        /// Attended sessions after this credit
        attended: u32,
        /// Total sessions after this credit
        total: u32,
        /// Highest similarity observed
        best_score: f64,
        /// Similarity against each reference, in stored order
        scores: Vec<f64>,
        /// How many scores reached the threshold
        match_count: usize,
        /// When the credit was recorded
        credited_at: NaiveDateTime,
    },
}

impl VerificationOutcome {
    /// The status tag of this outcome
    #[must_use]
    pub const fn status(&self) -> VerificationStatus {
        match self {
            Self::NotRegistered { .. } => VerificationStatus::NotRegistered,
            Self::NoGroupAssigned { .. } => VerificationStatus::NoGroupAssigned,
            Self::NoActiveSession { .. } => VerificationStatus::NoActiveSession,
            Self::ClassroomConfigMissing { .. } => VerificationStatus::ClassroomConfigMissing,
            Self::LocationMismatch { .. } => VerificationStatus::LocationMismatch,
            Self::IncompleteReferenceData { .. } => VerificationStatus::IncompleteReferenceData,
            Self::BiometricMismatch { .. } => VerificationStatus::BiometricMismatch,
            Self::AlreadyCredited { .. } => VerificationStatus::AlreadyCredited,
            Self::Credited { .. } => VerificationStatus::Ok,
        }
    }

    /// Whether attendance was credited
    #[must_use]
    pub const fn is_credited(&self) -> bool {
        matches!(self, Self::Credited { .. })
    }

    /// Human-readable explanation for end users
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NotRegistered { .. } => "Student not registered. Please register first.".into(),
            Self::NoGroupAssigned { .. } => {
                "Student class not set. Please ask an administrator to assign one.".into()
            },
            Self::NoActiveSession { .. } => "No active class at this time for your section.".into(),
            Self::ClassroomConfigMissing { room, .. } => {
                format!("Classroom configuration not found for {room}.")
            },
            Self::LocationMismatch { room, .. } => {
                format!("Location verification failed. You must be in {room}.")
            },
            Self::IncompleteReferenceData { .. } => {
                "Incomplete registration data. Please re-register.".into()
            },
            Self::BiometricMismatch { .. } => "Biometric verification failed.".into(),
            Self::AlreadyCredited { subject, .. } => {
                format!("Attendance already marked for {subject} (this class session).")
            },
            Self::Credited { subject, .. } => format!("Attendance marked for {subject}."),
        }
    }
}
