pub mod app;
pub mod calendar;
pub mod query;
pub mod storage;
pub mod ui;

pub use app::{AppState, SyncStatus};
pub use calendar::{CalendarDocument, Employee, Event, EventType};
