use async_trait::async_trait;
use thiserror::Error;

use crate::calendar::CalendarDocument;
use crate::storage::config::{StorageBackend, StorageConfig};
use crate::storage::file_store::FileStore;
use crate::storage::http_store::HttpStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed calendar data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl StoreError {
    /// User-facing hint; every storage failure is worth retrying later.
    pub fn user_message(&self) -> String {
        match self {
            Self::Malformed(_) => "Saved calendar data is unreadable".to_string(),
            _ => "Calendar storage is unavailable, try again later".to_string(),
        }
    }
}

/// Where the calendar document lives. The application reads it once and
/// writes the whole document back after each change; the last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn load(&self) -> Result<CalendarDocument, StoreError>;

    async fn save(&self, document: &CalendarDocument) -> Result<(), StoreError>;
}

pub fn open_store(config: &StorageConfig) -> Box<dyn CalendarStore> {
    match config.backend {
        StorageBackend::File => Box::new(FileStore::new(config.data_file.clone())),
        StorageBackend::Http => Box::new(HttpStore::new(config.server_url.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_data_has_its_own_message() {
        let err = StoreError::Malformed(serde_json::from_str::<CalendarDocument>("{").unwrap_err());
        assert!(err.user_message().contains("unreadable"));

        let err = StoreError::Status { status: 500, body: "Cannot save data".to_string() };
        assert!(err.user_message().contains("try again"));
    }
}
