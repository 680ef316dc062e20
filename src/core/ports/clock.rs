//! Wall clock port

use chrono::NaiveDateTime;

/// Source of the institution's local wall-clock time
pub trait Clock: Send + Sync {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;
}
