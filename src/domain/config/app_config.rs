//! Application configuration value object

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::recording::AudioMimeType;

use super::BackendPreference;

/// Default playback status poll interval
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default log level when neither RUST_LOG nor -v is given
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// File name of the local recording database
pub const DATABASE_FILE_NAME: &str = "iSpeaker_data.sqlite3";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: Option<String>,
    pub database_path: Option<String>,
    pub host_dir: Option<String>,
    pub default_mime_type: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub audio: Option<bool>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values.
    /// Paths are left unset so they resolve against the data dir at runtime.
    pub fn defaults() -> Self {
        Self {
            backend: Some("auto".to_string()),
            database_path: None,
            host_dir: None,
            default_mime_type: Some("audio/wav".to_string()),
            poll_interval_ms: Some(DEFAULT_POLL_INTERVAL_MS),
            audio: Some(true),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            backend: other.backend.or(self.backend),
            database_path: other.database_path.or(self.database_path),
            host_dir: other.host_dir.or(self.host_dir),
            default_mime_type: other.default_mime_type.or(self.default_mime_type),
            poll_interval_ms: other.poll_interval_ms.or(self.poll_interval_ms),
            audio: other.audio.or(self.audio),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get backend preference, or auto if not set/invalid
    pub fn backend_or_default(&self) -> BackendPreference {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get database path, or the default under the user data dir
    pub fn database_path_or_default(&self) -> PathBuf {
        self.database_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get host recordings dir, or the default under the user data dir
    pub fn host_dir_or_default(&self) -> PathBuf {
        self.host_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("recordings"))
    }

    /// Get the MIME type used when a recording has none stored, or wav
    pub fn default_mime_type_or_default(&self) -> AudioMimeType {
        self.default_mime_type
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get playback poll interval; zero is treated as unset
    pub fn poll_interval_or_default(&self) -> Duration {
        let ms = self
            .poll_interval_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        Duration::from_millis(ms)
    }

    /// Get audio output setting, or true if not set
    pub fn audio_or_default(&self) -> bool {
        self.audio.unwrap_or(true)
    }

    /// Get log level, or "warn" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Application data directory
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("ispeaker")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.backend, Some("auto".to_string()));
        assert_eq!(config.default_mime_type, Some("audio/wav".to_string()));
        assert_eq!(config.poll_interval_ms, Some(50));
        assert_eq!(config.audio, Some(true));
        assert_eq!(config.log_level, Some("warn".to_string()));
        assert!(config.database_path.is_none());
        assert!(config.host_dir.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.backend.is_none());
        assert!(config.poll_interval_ms.is_none());
        assert!(config.audio.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            backend: Some("local".to_string()),
            poll_interval_ms: Some(10),
            ..Default::default()
        };
        let other = AppConfig {
            backend: Some("host".to_string()),
            poll_interval_ms: None,
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.backend, Some("host".to_string()));
        assert_eq!(merged.poll_interval_ms, Some(10));
    }

    #[test]
    fn backend_or_default_parses() {
        let config = AppConfig {
            backend: Some("local".to_string()),
            ..Default::default()
        };
        assert_eq!(config.backend_or_default(), BackendPreference::Local);
    }

    #[test]
    fn backend_or_default_uses_auto_on_invalid() {
        let config = AppConfig {
            backend: Some("cloud".to_string()),
            ..Default::default()
        };
        assert_eq!(config.backend_or_default(), BackendPreference::Auto);
    }

    #[test]
    fn database_path_default_is_under_data_dir() {
        let path = AppConfig::empty().database_path_or_default();
        assert!(path.ends_with("ispeaker/iSpeaker_data.sqlite3"));
    }

    #[test]
    fn database_path_uses_configured() {
        let config = AppConfig {
            database_path: Some("/tmp/recs.sqlite3".to_string()),
            ..Default::default()
        };
        assert_eq!(config.database_path_or_default(), PathBuf::from("/tmp/recs.sqlite3"));
    }

    #[test]
    fn host_dir_default_is_under_data_dir() {
        let path = AppConfig::empty().host_dir_or_default();
        assert!(path.ends_with("ispeaker/recordings"));
    }

    #[test]
    fn default_mime_type_falls_back_to_wav() {
        let config = AppConfig {
            default_mime_type: Some("text/plain".to_string()),
            ..Default::default()
        };
        assert_eq!(config.default_mime_type_or_default(), AudioMimeType::Wav);

        let config = AppConfig {
            default_mime_type: Some("audio/ogg".to_string()),
            ..Default::default()
        };
        assert_eq!(config.default_mime_type_or_default(), AudioMimeType::Ogg);
    }

    #[test]
    fn zero_poll_interval_uses_default() {
        let config = AppConfig {
            poll_interval_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(config.poll_interval_or_default(), Duration::from_millis(50));
    }

    #[test]
    fn boolean_and_level_defaults() {
        let config = AppConfig::empty();
        assert!(config.audio_or_default());
        assert_eq!(config.log_level_or_default(), "warn");
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig {
            backend: Some("local".to_string()),
            poll_interval_ms: Some(25),
            audio: Some(false),
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
