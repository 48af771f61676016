//! Recording storage port

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{Recording, RecordingKey};

use super::host::HostApiError;

/// Errors from storing, reading, or converting recordings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Recording store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Failed to write recording: {0}")]
    WriteError(String),

    #[error("Failed to read recording: {0}")]
    ReadError(String),

    #[error("Recording not found: {0}")]
    NotFound(String),

    #[error("Failed to convert audio data: {0}")]
    ConversionError(String),

    #[error("Host API error: {0}")]
    Host(HostApiError),
}

impl StoreError {
    /// Whether this error means the key has no recording
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Which storage strategy serviced an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Delegated to the desktop shell's native API
    Host,
    /// In-process object store
    Local,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Local => "local",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Port for a key/value recording store.
///
/// A `put` that has completed is visible to every later `get`/`exists`
/// on the same backend instance.
#[async_trait]
pub trait RecordingBackend: Send + Sync {
    /// Insert or replace the recording stored under its key (last write wins).
    async fn put(&self, recording: Recording) -> Result<(), StoreError>;

    /// Fetch the recording stored under `key`, or `StoreError::NotFound`.
    async fn get(&self, key: &RecordingKey) -> Result<Recording, StoreError>;

    /// Check whether a recording exists. Absence is not an error.
    async fn exists(&self, key: &RecordingKey) -> Result<bool, StoreError>;

    /// Which strategy this backend implements
    fn kind(&self) -> BackendKind;
}
