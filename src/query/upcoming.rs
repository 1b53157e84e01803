use chrono::{Datelike, Days, NaiveDate};

use crate::calendar::date::{month_short_name, parse_date, DateError};
use crate::calendar::{CalendarDocument, Employee, Event, EventType};

/// Lookahead of the upcoming list, counted from the reference date. Both the
/// reference date and the date this many days later are included.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// An event with its employee and event type resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEvent<'a> {
    pub event: &'a Event,
    pub employee: &'a Employee,
    pub event_type: &'a EventType,
    pub start: NaiveDate,
}

/// Events starting within `[reference, reference + 7 days]`, sorted by start
/// date. Events with equal start dates keep their relative input order.
///
/// Events whose employee or event type cannot be resolved are skipped, as are
/// events with an unparseable start date; neither fails the query.
pub fn upcoming_events<'a, I>(
    events: I,
    employees: &'a [Employee],
    event_types: &'a [EventType],
    reference: NaiveDate,
) -> Vec<UpcomingEvent<'a>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let window_end = reference
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut upcoming: Vec<UpcomingEvent<'a>> = events
        .into_iter()
        .filter_map(|event| {
            let start = match event.start() {
                Ok(start) => start,
                Err(e) => {
                    tracing::warn!("Skipping event {}: {}", event.id, e);
                    return None;
                }
            };

            if start < reference || start > window_end {
                return None;
            }

            let employee = employees.iter().find(|emp| emp.id == event.employee_id);
            let event_type = event_types.iter().find(|t| t.id == event.event_type_id);

            match (employee, event_type) {
                (Some(employee), Some(event_type)) => Some(UpcomingEvent {
                    event,
                    employee,
                    event_type,
                    start,
                }),
                _ => {
                    tracing::debug!("Skipping event {} with dangling reference", event.id);
                    None
                }
            }
        })
        .collect();

    // sort_by_key is stable, which gives the tie-break on equal start dates
    upcoming.sort_by_key(|u| u.start);
    upcoming
}

/// Upcoming events for the sidebar, optionally narrowed to one employee.
pub fn upcoming_for_document<'a>(
    document: &'a CalendarDocument,
    employee_filter: Option<&str>,
    reference: NaiveDate,
) -> Vec<UpcomingEvent<'a>> {
    let filter = employee_filter.filter(|id| !id.is_empty());
    upcoming_events(
        document
            .events
            .iter()
            .filter(|event| filter.is_none_or(|id| event.belongs_to(id))),
        &document.employees,
        &document.event_types,
        reference,
    )
}

/// `10. jun` for a one-day event, `10. jun - 12. jun` for a longer one.
pub fn format_date_range(start_date: &str, end_date: &str) -> Result<String, DateError> {
    let start = parse_date(start_date)?;
    if start_date == end_date {
        return Ok(short_label(start));
    }

    let end = parse_date(end_date)?;
    Ok(format!("{} - {}", short_label(start), short_label(end)))
}

fn short_label(date: NaiveDate) -> String {
    format!("{}. {}", date.day(), month_short_name(date))
}
