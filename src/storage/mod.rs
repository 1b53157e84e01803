pub mod config;
pub mod file_store;
pub mod http_store;
pub mod store;

pub use config::{Config, ConfigError, StorageBackend};
pub use file_store::FileStore;
pub use http_store::HttpStore;
pub use store::{open_store, CalendarStore, StoreError};
