//! Schedule resolver - finds the session active for a group at a time of day
//!
//! Window bounds are inclusive at both ends. Windows for one group are not
//! supposed to overlap; when they do, the resolver still picks one session
//! deterministically (earliest start, then earliest end, then subject, then
//! room) and logs the overlap.

use std::cmp::Ordering;

use chrono::NaiveTime;
use log::{debug, warn};

use crate::core::models::SessionSchedule;

/// The session of `group` whose window contains `at`, if any
///
/// Entries for other groups and entries whose end is not after their start
/// are ignored. "No session" is an ordinary outcome, not an error.
#[must_use]
pub fn find_active_session(
    group: &str,
    at: NaiveTime,
    schedules: &[SessionSchedule],
) -> Option<SessionSchedule> {
    let mut active: Vec<&SessionSchedule> = schedules
        .iter()
        .filter(|s| s.group == group)
        .filter(|s| {
            let window = s.window();
            if !window.is_well_formed() {
                warn!("ignoring schedule for {group}/{} with invalid window {window}", s.subject);
                return false;
            }
            window.contains(at)
        })
        .collect();

    if active.len() > 1 {
        warn!(
            "{} overlapping sessions for {group} at {}; choosing earliest start",
            active.len(),
            at.format("%H:%M")
        );
    }

    active.sort_by(|a, b| tie_break(a, b));
    let chosen = active.first().map(|s| (*s).clone());
    if let Some(session) = &chosen {
        debug!("active session for {group}: {} {} in {}", session.subject, session.window(), session.room);
    }
    chosen
}

fn tie_break(a: &SessionSchedule, b: &SessionSchedule) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| a.end.cmp(&b.end))
        .then_with(|| a.subject.cmp(&b.subject))
        .then_with(|| a.room.cmp(&b.room))
}
