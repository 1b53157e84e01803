use chrono::{Datelike, NaiveDate};

use crate::calendar::date::{add_months, DateError};
use crate::calendar::{CalendarDocument, DocumentError, Event, IdGenerator, NewEvent, NewEventType, UuidIdGenerator};
use crate::query::range::events_for_date;
use crate::query::upcoming::{upcoming_for_document, UpcomingEvent};
use crate::storage::store::CalendarStore;
use crate::ui::month_view::{calculate_layout, MonthLayout};

#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Synced,
    Offline,
    Error(String),
}

/// The running application: the last document known to be good plus the
/// view state around it. Storage failures never discard the in-memory
/// document.
pub struct AppState {
    pub document: CalendarDocument,
    pub year: i32,
    pub month: u32,
    pub employee_filter: Option<String>,
    pub sync_status: SyncStatus,
    store: Box<dyn CalendarStore>,
    ids: Box<dyn IdGenerator + Send>,
}

impl AppState {
    pub fn new(store: Box<dyn CalendarStore>, document: CalendarDocument, today: NaiveDate) -> Self {
        Self {
            document,
            year: today.year(),
            month: today.month(),
            employee_filter: None,
            sync_status: SyncStatus::Synced,
            store,
            ids: Box::new(UuidIdGenerator),
        }
    }

    /// Reads the document from `store`, starting from an empty one if that fails.
    pub async fn load(store: Box<dyn CalendarStore>, today: NaiveDate) -> Self {
        match store.load().await {
            Ok(document) => Self::new(store, document, today),
            Err(e) => {
                tracing::error!("Failed to load calendar, continuing with empty data: {}", e);
                let mut app = Self::new(store, CalendarDocument::default(), today);
                app.sync_status = SyncStatus::Offline;
                app
            }
        }
    }

    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator + Send>) -> Self {
        self.ids = ids;
        self
    }

    pub fn set_employee_filter(&mut self, employee_id: Option<String>) {
        self.employee_filter = employee_id.filter(|id| !id.is_empty());
    }

    fn filter(&self) -> Option<&str> {
        self.employee_filter.as_deref()
    }

    pub fn next_month(&mut self) {
        (self.year, self.month) = add_months(self.year, self.month, 1);
    }

    pub fn previous_month(&mut self) {
        (self.year, self.month) = add_months(self.year, self.month, -1);
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        self.year = date.year();
        self.month = date.month();
    }

    pub fn month_layout(&self, today: NaiveDate) -> Result<MonthLayout<'_>, DateError> {
        calculate_layout(&self.document, self.year, self.month, today, self.filter())
    }

    pub fn day_events(&self, date: NaiveDate) -> Vec<&Event> {
        events_for_date(&self.document, date, self.filter())
    }

    pub fn upcoming(&self, today: NaiveDate) -> Vec<UpcomingEvent<'_>> {
        upcoming_for_document(&self.document, self.filter(), today)
    }

    pub async fn add_employee(&mut self, name: &str) -> Result<(), DocumentError> {
        let next = self.document.with_employee_added(name, self.ids.as_mut())?;
        self.commit(next).await;
        Ok(())
    }

    pub async fn remove_employee(&mut self, id: &str) {
        let next = self.document.with_employee_removed(id);
        if self.employee_filter.as_deref() == Some(id) {
            self.employee_filter = None;
        }
        self.commit(next).await;
    }

    pub async fn add_event_type(&mut self, new_type: NewEventType) -> Result<(), DocumentError> {
        let next = self.document.with_event_type_added(new_type, self.ids.as_mut())?;
        self.commit(next).await;
        Ok(())
    }

    pub async fn remove_event_type(&mut self, id: &str) {
        let next = self.document.with_event_type_removed(id);
        self.commit(next).await;
    }

    pub async fn add_event(&mut self, new_event: NewEvent) -> Result<(), DocumentError> {
        let next = self.document.with_event_added(new_event, self.ids.as_mut())?;
        self.commit(next).await;
        Ok(())
    }

    pub async fn update_event(&mut self, id: &str, update: NewEvent) -> Result<(), DocumentError> {
        let next = self.document.with_event_updated(id, update)?;
        self.commit(next).await;
        Ok(())
    }

    pub async fn remove_event(&mut self, id: &str) {
        let next = self.document.with_event_removed(id);
        self.commit(next).await;
    }

    async fn commit(&mut self, next: CalendarDocument) {
        self.document = next;
        self.sync_status = match self.store.save(&self.document).await {
            Ok(()) => SyncStatus::Synced,
            Err(e) => {
                tracing::error!("Failed to save calendar, keeping changes in memory: {}", e);
                SyncStatus::Error(e.user_message())
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Employee, EventType, SequentialIdGenerator};
    use crate::storage::store::{MockCalendarStore, StoreError};
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn create_test_document() -> CalendarDocument {
        CalendarDocument {
            employees: vec![
                Employee { id: "E1".to_string(), name: "Ana".to_string() },
                Employee { id: "E2".to_string(), name: "Marko".to_string() },
            ],
            event_types: vec![EventType {
                id: "T1".to_string(),
                name: "Odmor".to_string(),
                color: "#10B981".to_string(),
                icon: "Sun".to_string(),
            }],
            events: vec![
                Event {
                    id: "V1".to_string(),
                    employee_id: "E1".to_string(),
                    event_type_id: "T1".to_string(),
                    start_date: "2024-06-10".to_string(),
                    end_date: "2024-06-12".to_string(),
                    title: None,
                },
                Event {
                    id: "V2".to_string(),
                    employee_id: "E2".to_string(),
                    event_type_id: "T1".to_string(),
                    start_date: "2024-06-11".to_string(),
                    end_date: "2024-06-11".to_string(),
                    title: None,
                },
            ],
        }
    }

    fn saving_store() -> MockCalendarStore {
        let mut store = MockCalendarStore::new();
        store.expect_save().returning(|_| Ok(()));
        store
    }

    fn failing_store() -> MockCalendarStore {
        let mut store = MockCalendarStore::new();
        store.expect_save().returning(|_| Err(StoreError::Status {
            status: 500,
            body: "Cannot save data".to_string(),
        }));
        store
    }

    fn create_app(store: MockCalendarStore) -> AppState {
        AppState::new(Box::new(store), create_test_document(), date(2024, 6, 10))
            .with_id_generator(Box::new(SequentialIdGenerator::new("N")))
    }

    #[test]
    fn new_app_shows_month_of_today() {
        let app = create_app(MockCalendarStore::new());
        assert_eq!((app.year, app.month), (2024, 6));
        assert_eq!(app.sync_status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn load_uses_stored_document() {
        let mut store = MockCalendarStore::new();
        store.expect_load().times(1).returning(|| Ok(create_test_document()));

        let app = AppState::load(Box::new(store), date(2024, 6, 10)).await;

        assert_eq!(app.document, create_test_document());
        assert_eq!(app.sync_status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn failed_load_starts_empty_and_offline() {
        let mut store = MockCalendarStore::new();
        store.expect_load().returning(|| {
            Err(StoreError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")))
        });

        let app = AppState::load(Box::new(store), date(2024, 6, 10)).await;

        assert_eq!(app.document, CalendarDocument::default());
        assert_eq!(app.sync_status, SyncStatus::Offline);
    }

    #[tokio::test]
    async fn mutation_is_saved() {
        let mut store = MockCalendarStore::new();
        store
            .expect_save()
            .withf(|doc| doc.employees.iter().any(|e| e.name == "Jovana"))
            .times(1)
            .returning(|_| Ok(()));
        let mut app = create_app(store);

        app.add_employee("Jovana").await.unwrap();

        assert_eq!(app.document.employees.len(), 3);
        assert_eq!(app.sync_status, SyncStatus::Synced);
    }

    #[tokio::test]
    async fn failed_save_keeps_in_memory_changes() {
        let mut app = create_app(failing_store());

        app.remove_employee("E1").await;

        assert!(app.document.employee("E1").is_none());
        assert_eq!(app.document.events.len(), 1);
        assert!(matches!(app.sync_status, SyncStatus::Error(_)));
    }

    #[tokio::test]
    async fn rejected_mutation_does_not_save() {
        let mut store = MockCalendarStore::new();
        store.expect_save().never();
        let mut app = create_app(store);

        let result = app.add_event(NewEvent::new("E1", "T1", "2024-06-20", "2024-06-19")).await;

        assert!(matches!(result, Err(DocumentError::InvertedRange { .. })));
        assert_eq!(app.document, create_test_document());
    }

    #[tokio::test]
    async fn removing_filtered_employee_clears_filter() {
        let mut app = create_app(saving_store());
        app.set_employee_filter(Some("E1".to_string()));

        app.remove_employee("E1").await;

        assert_eq!(app.employee_filter, None);
    }

    #[tokio::test]
    async fn event_lifecycle_updates_day_queries() {
        let mut app = create_app(saving_store());

        app.add_event(NewEvent::new("E2", "T1", "2024-06-20", "2024-06-21")).await.unwrap();
        assert_eq!(app.day_events(date(2024, 6, 21)).len(), 1);

        app.update_event("N1", NewEvent::new("E2", "T1", "2024-06-22", "2024-06-22")).await.unwrap();
        assert!(app.day_events(date(2024, 6, 21)).is_empty());
        assert_eq!(app.day_events(date(2024, 6, 22))[0].id, "N1");

        app.remove_event("N1").await;
        assert!(app.day_events(date(2024, 6, 22)).is_empty());
    }

    #[tokio::test]
    async fn removing_event_type_cascades() {
        let mut app = create_app(saving_store());

        app.remove_event_type("T1").await;

        assert!(app.document.events.is_empty());
    }

    #[tokio::test]
    async fn adding_event_type_validates_color() {
        let mut app = create_app(saving_store());

        let result = app
            .add_event_type(NewEventType {
                name: "Bolovanje".to_string(),
                color: "#EF4444".to_string(),
                icon: "Heart".to_string(),
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(app.document.event_types.last().map(|t| t.id.as_str()), Some("N1"));
    }

    #[test]
    fn month_navigation_wraps_years() {
        let mut app = create_app(MockCalendarStore::new());
        app.jump_to(date(2024, 12, 5));

        app.next_month();
        assert_eq!((app.year, app.month), (2025, 1));

        app.previous_month();
        app.previous_month();
        assert_eq!((app.year, app.month), (2024, 11));
    }

    #[test]
    fn queries_respect_employee_filter() {
        let mut app = create_app(MockCalendarStore::new());
        app.set_employee_filter(Some("E2".to_string()));

        let events = app.day_events(date(2024, 6, 11));
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["V2"]);

        let upcoming = app.upcoming(date(2024, 6, 10));
        let upcoming_ids: Vec<&str> = upcoming.iter().map(|u| u.event.id.as_str()).collect();
        assert_eq!(upcoming_ids, vec!["V2"]);

        let layout = app.month_layout(date(2024, 6, 10)).unwrap();
        assert!(!layout.day(date(2024, 6, 10)).unwrap().has_events());
    }

    #[test]
    fn empty_filter_is_cleared() {
        let mut app = create_app(MockCalendarStore::new());
        app.set_employee_filter(Some(String::new()));
        assert_eq!(app.employee_filter, None);
    }
}
