//! Drag-and-drop rescheduling.
//!
//! The drag payload carries only the event id; the drop handler looks the
//! event up in the store and shifts both endpoints by whole calendar days.
//! Endpoints are rebuilt from date plus wall-clock time, so the time of day
//! and the day-count span survive even when the move crosses a
//! daylight-saving transition.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, TimeZone};

use crate::models::event::{Event, EventPatch};
use crate::utils::date::days_between;

/// Payload attached to a dragged event bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub event_id: i64,
}

impl DragPayload {
    pub fn new(event_id: i64) -> Self {
        Self { event_id }
    }

    /// Serialize for the drag data channel.
    pub fn encode(&self) -> String {
        self.event_id.to_string()
    }

    /// Parse a payload string. Anything that is not a bare id is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(Self::new)
    }
}

/// Build the patch that moves `event` so its first day lands on `target_day`.
///
/// Returns `None` when the event already starts on that day.
pub fn reschedule(event: &Event, target_day: NaiveDate) -> Option<EventPatch> {
    let offset = days_between(event.start.date_naive(), target_day);
    if offset == 0 {
        return None;
    }

    Some(EventPatch::reschedule(
        shift_wall_clock(event.start, offset),
        shift_wall_clock(event.end, offset),
    ))
}

/// Move an instant by whole calendar days, keeping its wall-clock time.
///
/// Adding an absolute `Duration` would shift the local time of day whenever
/// the move crosses a DST change, so the result is rebuilt from the new date
/// and the original time instead. An ambiguous time (clocks rolled back)
/// resolves to the earlier instant; a time skipped by the clock jump slides
/// forward one hour.
fn shift_wall_clock(instant: DateTime<Local>, offset_days: i64) -> DateTime<Local> {
    let shifted = (instant.date_naive() + Duration::days(offset_days)).and_time(instant.time());

    match Local.from_local_datetime(&shifted) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => (shifted + Duration::hours(1))
            .and_local_timezone(Local)
            .earliest()
            .unwrap_or(instant + Duration::days(offset_days)),
    }
}
