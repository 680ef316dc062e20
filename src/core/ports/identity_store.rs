//! Identity store port
//!
//! Defines the interface for loading students and their reference embeddings.

use chrono::NaiveDateTime;

use crate::core::error::StoreError;
use crate::core::models::{Identity, RegistrationKind};

/// Repository of registered students
///
/// Implementations handle persistence of identities and their reference
/// embeddings (database rows, TOML documents, ...).
#[cfg_attr(test, mockall::automock)]
pub trait IdentityStore: Send + Sync {
    /// Find an identity by student key
    fn get_by_key(&self, key: &str) -> Result<Option<Identity>, StoreError>;

    /// Reference embeddings in capture order; empty when none are stored
    fn get_reference_embeddings(&self, key: &str) -> Result<Vec<Vec<f32>>, StoreError>;

    /// Replace the full embedding set of `key`, creating the identity if absent
    ///
    /// Prior embeddings are discarded, never merged.
    fn replace_embeddings(
        &self,
        key: &str,
        embeddings: &[Vec<f32>],
        fallback: &[f32],
        at: NaiveDateTime,
    ) -> Result<RegistrationKind, StoreError>;
}
