//! Student identity and classroom binding models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A registered student
///
/// Reference embeddings are stored alongside the identity but fetched
/// separately through `IdentityStore::get_reference_embeddings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Fixed-format student key (USN)
    pub key: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Class/section label used to look up the schedule (e.g. "10A")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Averaged reference vector, used when the full set is unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_embedding: Option<Vec<f32>>,

    /// When the embeddings were last (re-)registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<NaiveDateTime>,
}

impl Identity {
    /// Create an identity with no group and no embeddings
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: None,
            group: None,
            fallback_embedding: None,
            registered_at: None,
        }
    }

    /// Set the group label
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// The group label, if one is assigned and non-blank
    #[must_use]
    pub fn assigned_group(&self) -> Option<&str> {
        self.group.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }
}

/// A room label mapped to the router address used as a location proxy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomBinding {
    /// Unique room label
    pub room: String,
    /// Router address registered for the room
    pub address: String,
}

impl ClassroomBinding {
    /// Create a binding
    #[must_use]
    pub fn new(room: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            address: address.into(),
        }
    }
}

/// Whether a registration created a new identity or replaced embeddings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    /// New identity created
    Registered,
    /// Existing identity's embeddings fully replaced
    Updated,
}

impl std::fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Updated => write!(f, "updated"),
        }
    }
}
