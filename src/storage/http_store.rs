use async_trait::async_trait;

use crate::calendar::CalendarDocument;
use crate::storage::store::{CalendarStore, StoreError};

const CALENDAR_PATH: &str = "/api/calendar";

/// Talks to a calendar file server exposing `GET`/`POST /api/calendar`.
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, CALENDAR_PATH)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    tracing::error!("Calendar server returned {}: {}", status, body);
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CalendarStore for HttpStore {
    async fn load(&self) -> Result<CalendarDocument, StoreError> {
        let url = self.url();
        tracing::info!("Loading calendar from {}", url);

        let response = check_status(self.client.get(&url).send().await?).await?;
        let body = response.text().await?;
        let document: CalendarDocument = serde_json::from_str(&body)?;

        tracing::info!("Loaded {} events from server", document.events.len());
        Ok(document)
    }

    async fn save(&self, document: &CalendarDocument) -> Result<(), StoreError> {
        let url = self.url();
        tracing::debug!("POST {} with {} events", url, document.events.len());

        check_status(self.client.post(&url).json(document).send().await?).await?;

        tracing::info!("Saved calendar to server");
        Ok(())
    }
}
