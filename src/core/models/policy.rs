//! Decision parameters passed explicitly into the core

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

/// Default student key format: `1RV23CS001` through `1RV23CS420`
pub const DEFAULT_KEY_PATTERN: &str = r"^1RV23CS(0[0-9]{2}|[1-3][0-9]{2}|4[0-1][0-9]|420)$";

/// Parameters for embedding validation and biometric matching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationPolicy {
    /// Minimum cosine similarity for a reference to count as a match
    pub similarity_threshold: f64,
    /// Matches required out of a full reference set
    pub min_matches: usize,
    /// Number of reference embeddings captured at registration
    pub reference_count: usize,
    /// Embedding dimension D
    pub embedding_dimension: usize,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            min_matches: 2,
            reference_count: 5,
            embedding_dimension: 512,
        }
    }
}

/// Compiled student key format
#[derive(Debug, Clone)]
pub struct KeyFormat {
    pattern: Regex,
}

impl KeyFormat {
    /// Compile a key format from a regular expression
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Check a key against the format
    pub fn check(&self, key: &str) -> Result<(), ValidationError> {
        if self.pattern.is_match(key) {
            Ok(())
        } else {
            Err(ValidationError::InvalidKey(key.to_string()))
        }
    }

    /// The source pattern
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_KEY_PATTERN).expect("default key pattern is valid"),
        }
    }
}
