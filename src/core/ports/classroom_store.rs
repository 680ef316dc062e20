//! Classroom store port

use crate::core::error::StoreError;
use crate::core::models::ClassroomBinding;

/// Lookup of classroom network bindings
#[cfg_attr(test, mockall::automock)]
pub trait ClassroomStore: Send + Sync {
    /// Binding for a room label, if one is registered
    fn get_binding(&self, room: &str) -> Result<Option<ClassroomBinding>, StoreError>;
}
