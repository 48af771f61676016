//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, BackendPreference};
use crate::domain::error::ConfigError;
use crate::domain::recording::AudioMimeType;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS, VALID_LOG_LEVELS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(value_of(&config, key).as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, value_of(&config, key).as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "backend" => {
            let backend: BackendPreference =
                value.parse().map_err(|e| invalid(key, format!("{}", e)))?;
            config.backend = Some(backend.to_string());
        }
        "database_path" => config.database_path = Some(non_empty(key, value)?),
        "host_dir" => config.host_dir = Some(non_empty(key, value)?),
        "default_mime_type" => {
            let mime_type: AudioMimeType =
                value.parse().map_err(|e| invalid(key, format!("{}", e)))?;
            config.default_mime_type = Some(mime_type.to_string());
        }
        "poll_interval_ms" => {
            let ms = value
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| invalid(key, "Value must be a positive number of milliseconds"))?;
            config.poll_interval_ms = Some(ms);
        }
        "audio" => {
            let enabled =
                parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?;
            config.audio = Some(enabled);
        }
        "log_level" => {
            let lower = value.to_lowercase();
            if !VALID_LOG_LEVELS.contains(&lower.as_str()) {
                return Err(invalid(
                    key,
                    format!(
                        "Invalid value '{}'. Valid options: {}",
                        value,
                        VALID_LOG_LEVELS.join(", ")
                    ),
                ));
            }
            config.log_level = Some(lower);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

fn value_of(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "backend" => config.backend.clone(),
        "database_path" => config.database_path.clone(),
        "host_dir" => config.host_dir.clone(),
        "default_mime_type" => config.default_mime_type.clone(),
        "poll_interval_ms" => config.poll_interval_ms.map(|ms| ms.to_string()),
        "audio" => config.audio.map(|b| b.to_string()),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}

fn non_empty(key: &str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(key, "Value must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}
