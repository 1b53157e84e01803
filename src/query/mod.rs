pub mod range;
pub mod upcoming;

pub use range::{cap_events, events_for_date, is_date_in_range, DayEvents, VISIBLE_EVENT_CAP};
pub use upcoming::{format_date_range, upcoming_events, upcoming_for_document, UpcomingEvent, UPCOMING_WINDOW_DAYS};
