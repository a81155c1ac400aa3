use std::cmp::Ordering;

use chrono::NaiveDate;

use super::{EventItem, EventStatus};

/// Parses an event date.
///
/// Accepts `YYYY-MM-DD` as well as full RFC 3339 timestamps, which some older
/// records carry.
pub fn parse_event_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(date)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

/// Compares two events by date, ascending.
///
/// Unparsable dates sort after parsable ones and fall back to string order.
fn compare_dates(a: &EventItem, b: &EventItem) -> Ordering {
    match (parse_event_date(&a.date), parse_event_date(&b.date)) {
        (Some(a_date), Some(b_date)) => a_date.cmp(&b_date),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.date.cmp(&b.date),
    }
}

/// Orders events for the events page: upcoming events first by date
/// ascending, then past events by date descending (most recent first).
pub fn order_for_display(events: Vec<EventItem>) -> Vec<EventItem> {
    let (mut upcoming, mut past): (Vec<_>, Vec<_>) = events
        .into_iter()
        .partition(|e| e.status == EventStatus::Upcoming);

    upcoming.sort_by(compare_dates);
    past.sort_by(|a, b| match (parse_event_date(&a.date), parse_event_date(&b.date)) {
        (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
        _ => compare_dates(a, b),
    });

    upcoming.extend(past);
    upcoming
}
