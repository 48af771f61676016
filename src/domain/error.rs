//! Domain error types

use thiserror::Error;

/// Error when a recording key fails validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid recording key: \"{input}\". {reason}")]
pub struct InvalidKeyError {
    pub input: String,
    pub reason: &'static str,
}

/// Error when a MIME type or file extension is not a supported audio format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Unsupported audio type: \"{input}\". Supported types: ogg, mp3, mpeg, wav, webm, mp4, flac"
)]
pub struct UnsupportedMimeTypeError {
    pub input: String,
}

/// Error when a backend preference string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid backend: \"{input}\". Valid backends are: auto, host, local")]
pub struct InvalidBackendError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
