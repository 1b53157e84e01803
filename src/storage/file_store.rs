use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::calendar::CalendarDocument;
use crate::storage::store::{CalendarStore, StoreError};

/// Keeps the document in a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl CalendarStore for FileStore {
    async fn load(&self) -> Result<CalendarDocument, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No data file at {}, starting empty", self.path.display());
                return Ok(CalendarDocument::default());
            }
            Err(e) => {
                tracing::error!("Cannot read {}: {}", self.path.display(), e);
                return Err(e.into());
            }
        };

        let document: CalendarDocument = serde_json::from_str(&content)?;
        tracing::info!(
            "Loaded {} employees, {} event types, {} events from {}",
            document.employees.len(),
            document.event_types.len(),
            document.events.len(),
            self.path.display()
        );
        Ok(document)
    }

    async fn save(&self, document: &CalendarDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(document)?;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::info!("Saved calendar to {}", self.path.display());
        Ok(())
    }
}
