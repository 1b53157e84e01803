pub mod calendar_type;
pub mod date;
pub mod document;
pub mod event;
pub mod ids;

pub use calendar_type::{Employee, EventType};
pub use date::DateError;
pub use document::{CalendarDocument, DocumentError, NewEvent, NewEventType};
pub use event::Event;
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
