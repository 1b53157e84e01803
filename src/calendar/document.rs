use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::calendar_type::{Employee, EventType};
use crate::calendar::date::{parse_date, DateError};
use crate::calendar::event::Event;
use crate::calendar::ids::IdGenerator;
use crate::ui::palette::is_valid_color;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("Event ends ({end}) before it starts ({start})")]
    InvertedRange { start: String, end: String },
    #[error("Unknown employee: {0}")]
    UnknownEmployee(String),
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

/// The persisted calendar: everything the application stores.
///
/// Collections keep insertion order, which is also the order queries
/// report matches in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDocument {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(rename = "eventTypes", default)]
    pub event_types: Vec<EventType>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEventType {
    pub name: String,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub employee_id: String,
    pub event_type_id: String,
    pub start_date: String,
    pub end_date: String,
    pub title: Option<String>,
}

impl NewEvent {
    pub fn new(
        employee_id: impl Into<String>,
        event_type_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            event_type_id: event_type_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            title: None,
        }
    }
}

impl CalendarDocument {
    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn event_type(&self, id: &str) -> Option<&EventType> {
        self.event_types.iter().find(|t| t.id == id)
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Events whose employee or event type no longer exists.
    pub fn dangling_events(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| self.employee(&e.employee_id).is_none() || self.event_type(&e.event_type_id).is_none())
            .collect()
    }

    fn contains_id(&self, id: &str) -> bool {
        self.employee(id).is_some() || self.event_type(id).is_some() || self.event(id).is_some()
    }

    fn fresh_id(&self, ids: &mut dyn IdGenerator) -> String {
        loop {
            let id = ids.next_id();
            if !self.contains_id(&id) {
                return id;
            }
            tracing::warn!("Generated id {} already in use, drawing another", id);
        }
    }

    pub fn with_employee_added(&self, name: &str, ids: &mut dyn IdGenerator) -> Result<Self, DocumentError> {
        let name = required_name(name)?;
        let mut next = self.clone();
        let id = self.fresh_id(ids);
        tracing::info!("Adding employee {} ({})", name, id);
        next.employees.push(Employee { id, name });
        Ok(next)
    }

    /// Removes the employee together with every event assigned to them.
    pub fn with_employee_removed(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.employees.retain(|e| e.id != id);
        next.events.retain(|e| e.employee_id != id);
        tracing::info!(
            "Removed employee {} and {} of their events",
            id,
            self.events.len() - next.events.len()
        );
        next
    }

    pub fn with_event_type_added(&self, new_type: NewEventType, ids: &mut dyn IdGenerator) -> Result<Self, DocumentError> {
        let name = required_name(&new_type.name)?;
        if !is_valid_color(&new_type.color) {
            return Err(DocumentError::InvalidColor(new_type.color));
        }

        let mut next = self.clone();
        let id = self.fresh_id(ids);
        tracing::info!("Adding event type {} ({})", name, id);
        next.event_types.push(EventType {
            id,
            name,
            color: new_type.color,
            icon: new_type.icon,
        });
        Ok(next)
    }

    /// Removes the event type together with every event of that type.
    pub fn with_event_type_removed(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.event_types.retain(|t| t.id != id);
        next.events.retain(|e| e.event_type_id != id);
        tracing::info!(
            "Removed event type {} and {} events",
            id,
            self.events.len() - next.events.len()
        );
        next
    }

    pub fn with_event_added(&self, new_event: NewEvent, ids: &mut dyn IdGenerator) -> Result<Self, DocumentError> {
        self.validate_event(&new_event)?;

        let mut next = self.clone();
        let id = self.fresh_id(ids);
        tracing::info!(
            "Adding event {} for {} from {} to {}",
            id,
            new_event.employee_id,
            new_event.start_date,
            new_event.end_date
        );
        next.events.push(Event {
            id,
            employee_id: new_event.employee_id,
            event_type_id: new_event.event_type_id,
            start_date: new_event.start_date,
            end_date: new_event.end_date,
            title: new_event.title,
        });
        Ok(next)
    }

    /// Replaces the employee, type and dates of an event in place. An existing
    /// title is kept unless the update carries a new one.
    pub fn with_event_updated(&self, id: &str, update: NewEvent) -> Result<Self, DocumentError> {
        self.validate_event(&update)?;

        let mut next = self.clone();
        let event = next
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DocumentError::UnknownEvent(id.to_string()))?;

        event.employee_id = update.employee_id;
        event.event_type_id = update.event_type_id;
        event.start_date = update.start_date;
        event.end_date = update.end_date;
        if update.title.is_some() {
            event.title = update.title;
        }

        tracing::info!("Updated event {}", id);
        Ok(next)
    }

    pub fn with_event_removed(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.events.retain(|e| e.id != id);
        next
    }

    fn validate_event(&self, event: &NewEvent) -> Result<(), DocumentError> {
        let start = parse_date(&event.start_date)?;
        let end = parse_date(&event.end_date)?;
        if start > end {
            return Err(DocumentError::InvertedRange {
                start: event.start_date.clone(),
                end: event.end_date.clone(),
            });
        }

        if self.employee(&event.employee_id).is_none() {
            return Err(DocumentError::UnknownEmployee(event.employee_id.clone()));
        }

        if self.event_type(&event.event_type_id).is_none() {
            return Err(DocumentError::UnknownEventType(event.event_type_id.clone()));
        }

        Ok(())
    }
}

fn required_name(name: &str) -> Result<String, DocumentError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(DocumentError::EmptyName)
    } else {
        Ok(trimmed.to_string())
    }
}
