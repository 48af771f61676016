//! Host binary API port
//!
//! The native API exposed by the desktop shell. It is trusted and already
//! sandboxed by the host, so callers pass its results through untouched.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the host API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostApiError {
    #[error("No recording stored for key '{0}'")]
    NotFound(String),

    #[error("Host I/O failure: {0}")]
    Io(String),

    #[error("Host rejected the request: {0}")]
    Rejected(String),
}

/// Port for the desktop shell's native recording API
#[async_trait]
pub trait HostBinaryApi: Send + Sync {
    /// Persist `buffer` under `key`, replacing any previous recording
    async fn save_recording(&self, key: &str, buffer: Vec<u8>) -> Result<(), HostApiError>;

    /// Check whether a recording is stored under `key`
    async fn check_recording_exists(&self, key: &str) -> Result<bool, HostApiError>;

    /// Read back the bytes stored under `key`
    async fn play_recording(&self, key: &str) -> Result<Vec<u8>, HostApiError>;
}
