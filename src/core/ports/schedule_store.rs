//! Schedule store port

use crate::core::error::StoreError;
use crate::core::models::SessionSchedule;

/// Lookup of scheduled sessions
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleStore: Send + Sync {
    /// All sessions scheduled for a group, in any order
    fn list_sessions_for_group(&self, group: &str) -> Result<Vec<SessionSchedule>, StoreError>;
}
