//! Class schedule model
//!
//! Times are wall-clock times of day in the institution's local time and
//! are written as `HH:MM` in persisted data.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One scheduled class slot for a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSchedule {
    /// Class/section label
    pub group: String,
    /// Subject taught in this slot
    pub subject: String,
    /// Start of the session (inclusive)
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End of the session (inclusive)
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    /// Room label, resolved through the classroom store
    pub room: String,
}

impl SessionSchedule {
    /// Create a schedule entry
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        subject: impl Into<String>,
        start: NaiveTime,
        end: NaiveTime,
        room: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            subject: subject.into(),
            start,
            end,
            room: room.into(),
        }
    }

    /// The session's time window
    #[must_use]
    pub const fn window(&self) -> SessionWindow {
        SessionWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// Inclusive start/end time-of-day of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    /// Start (inclusive)
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// End (inclusive)
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl SessionWindow {
    /// Whether `end` is strictly after `start`
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.end > self.start
    }

    /// Whether `at` falls inside the window, both ends inclusive
    #[must_use]
    pub fn contains(&self, at: NaiveTime) -> bool {
        self.start <= at && at <= self.end
    }
}

impl std::fmt::Display for SessionWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// `HH:MM` (or `HH:MM:SS`) serde representation for [`NaiveTime`]
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid time of day: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
    }
}
