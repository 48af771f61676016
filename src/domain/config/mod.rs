//! Configuration value objects

mod app_config;
mod backend;

pub use app_config::{AppConfig, DATABASE_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS};
pub use backend::BackendPreference;
