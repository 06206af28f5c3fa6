//! Month grid layout math.
//!
//! The calendar renders one row per category with one column per day of the
//! visible month. A multi-day event paints a single bar: it anchors on its
//! first visible day and spans to its end day, clipped at the month edge.

use chrono::NaiveDate;

use crate::models::event::Event;
use crate::utils::date::{days_between, days_in_month};

/// Every day of the given month, in order.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// Whether the event covers the given day (closed interval, day granularity).
pub fn on_date(event: &Event, day: NaiveDate) -> bool {
    event.start.date_naive() <= day && day <= event.end.date_naive()
}

/// Whether the event's bar starts in this cell.
///
/// That is either the event's first day, or the first day of the visible
/// month when the event started in an earlier month.
pub fn is_anchor(event: &Event, day: NaiveDate, days: &[NaiveDate]) -> bool {
    if !on_date(event, day) {
        return false;
    }
    if event.start.date_naive() == day {
        return true;
    }
    days.first() == Some(&day) && event.start.date_naive() < day
}

/// Number of columns the event's bar occupies starting at `day`.
///
/// Clipped to the days remaining in the visible month; never less than one
/// column, so a zero-duration event still renders.
pub fn span_width(event: &Event, day: NaiveDate, days: &[NaiveDate]) -> usize {
    let Some(index) = days.iter().position(|d| *d == day) else {
        return 1;
    };
    let remaining = (days.len() - index) as i64;
    let span = days_between(day, event.end.date_naive()) + 1;
    span.clamp(1, remaining) as usize
}
