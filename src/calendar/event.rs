use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::date::{parse_date, DateError};

/// A whole-day assignment of an employee to an event type.
///
/// Dates are kept as the ISO strings found in the stored document so that
/// saving a loaded document reproduces it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "employeeId")]
    pub employee_id: String,
    #[serde(rename = "eventTypeId")]
    pub event_type_id: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Event {
    pub fn start(&self) -> Result<NaiveDate, DateError> {
        parse_date(&self.start_date)
    }

    pub fn end(&self) -> Result<NaiveDate, DateError> {
        parse_date(&self.end_date)
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }

    /// Number of days covered, both ends included.
    pub fn span_days(&self) -> Result<i64, DateError> {
        Ok((self.end()? - self.start()?).num_days() + 1)
    }

    /// Day ranges are inclusive, so events sharing a single day overlap.
    pub fn overlaps(&self, other: &Event) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }

    pub fn belongs_to(&self, employee_id: &str) -> bool {
        self.employee_id == employee_id
    }
}
