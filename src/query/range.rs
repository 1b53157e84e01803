use chrono::NaiveDate;

use crate::calendar::date::format_date;
use crate::calendar::{CalendarDocument, Event};

/// How many events a day cell shows before collapsing the rest.
pub const VISIBLE_EVENT_CAP: usize = 3;

/// Inclusive on both ends. ISO dates sort lexicographically in calendar order,
/// so the bounds are compared as strings. An inverted range matches nothing.
pub fn is_date_in_range(date: NaiveDate, start_date: &str, end_date: &str) -> bool {
    let day = format_date(date);
    start_date <= day.as_str() && day.as_str() <= end_date
}

/// Events active on `date`, in document order. An empty filter means every
/// employee.
pub fn events_for_date<'a>(
    document: &'a CalendarDocument,
    date: NaiveDate,
    employee_filter: Option<&str>,
) -> Vec<&'a Event> {
    let filter = employee_filter.filter(|id| !id.is_empty());

    let events: Vec<&Event> = document
        .events
        .iter()
        .filter(|event| filter.is_none_or(|id| event.belongs_to(id)))
        .filter(|event| is_date_in_range(date, &event.start_date, &event.end_date))
        .collect();

    tracing::debug!("{} events on {} (filter: {:?})", events.len(), date, filter);
    events
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEvents<'a> {
    pub visible: Vec<&'a Event>,
    pub overflow: usize,
}

impl DayEvents<'_> {
    pub fn total(&self) -> usize {
        self.visible.len() + self.overflow
    }

    pub fn has_overflow(&self) -> bool {
        self.overflow > 0
    }
}

/// Splits a day's events into the first `cap` shown and a count of the rest.
pub fn cap_events(mut events: Vec<&Event>, cap: usize) -> DayEvents<'_> {
    let overflow = events.len().saturating_sub(cap);
    events.truncate(cap);
    DayEvents { visible: events, overflow }
}
