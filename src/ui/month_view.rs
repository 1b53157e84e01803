use chrono::NaiveDate;

use crate::calendar::date::{self, DateError};
use crate::calendar::{CalendarDocument, Event};
use crate::query::range::{cap_events, events_for_date, DayEvents, VISIBLE_EVENT_CAP};

#[derive(Debug, Clone, PartialEq)]
pub struct MonthLayout<'a> {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Week<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Week<'a> {
    pub days: Vec<CalendarDay<'a>>,
}

/// One cell of the month grid. Derived from the document on every layout.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub is_weekend: bool,
    pub events: Vec<&'a Event>,
}

impl<'a> CalendarDay<'a> {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            is_current_month: true,
            is_today: false,
            is_weekend: date::is_weekend(date),
            events: Vec::new(),
        }
    }

    pub fn with_today(mut self, today: bool) -> Self {
        self.is_today = today;
        self
    }

    pub fn with_current_month(mut self, current_month: bool) -> Self {
        self.is_current_month = current_month;
        self
    }

    pub fn with_events(mut self, events: Vec<&'a Event>) -> Self {
        self.events = events;
        self
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn capped(&self) -> DayEvents<'a> {
        cap_events(self.events.clone(), VISIBLE_EVENT_CAP)
    }

    pub fn visible_events(&self) -> &[&'a Event] {
        &self.events[..self.events.len().min(VISIBLE_EVENT_CAP)]
    }

    pub fn overflow_count(&self) -> usize {
        self.events.len().saturating_sub(VISIBLE_EVENT_CAP)
    }
}

impl<'a> MonthLayout<'a> {
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay<'a>> {
        self.weeks.iter().flat_map(|w| &w.days)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&CalendarDay<'a>> {
        self.days().find(|d| d.date == date)
    }
}

pub fn calculate_layout<'a>(
    document: &'a CalendarDocument,
    year: i32,
    month: u32,
    today: NaiveDate,
    employee_filter: Option<&str>,
) -> Result<MonthLayout<'a>, DateError> {
    let grid = date::month_grid(year, month)?;
    let anchor = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(DateError::InvalidMonth { year, month })?;

    let weeks = grid
        .chunks(7)
        .map(|chunk| Week {
            days: chunk
                .iter()
                .map(|&day| {
                    CalendarDay::new(day)
                        .with_today(date::is_today(day, today))
                        .with_current_month(date::is_same_month(day, anchor))
                        .with_events(events_for_date(document, day, employee_filter))
                })
                .collect(),
        })
        .collect();

    Ok(MonthLayout { year, month, weeks })
}
