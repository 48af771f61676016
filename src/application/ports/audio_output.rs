//! Audio output port for replaying stored recordings

use async_trait::async_trait;
use thiserror::Error;

use crate::application::playback::ObjectUrl;

use super::backend::StoreError;

/// Failure on the direct decode path. Recoverable: the controller falls
/// back to the object URL path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode audio: {0}")]
pub struct DecodeError(pub String);

/// Terminal playback failures, reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),
}

impl PlaybackError {
    /// Whether playback failed because the key has no recording
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }
}

/// Observed state of a running playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Ended,
    Failed(String),
}

/// Handle to audio that has started playing.
///
/// Dropping the handle stops playback.
pub trait PlaybackHandle: Send + Sync {
    /// Current state, polled by the playback controller
    fn status(&self) -> PlaybackStatus;

    /// Stop playback. Idempotent.
    fn stop(&self);
}

/// Port for producing audible output from a binary payload
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Decode the raw payload in memory and start playing it.
    async fn play_buffer(&self, payload: &[u8]) -> Result<Box<dyn PlaybackHandle>, DecodeError>;

    /// Start playing the payload behind a temporary object URL.
    async fn play_url(&self, url: &ObjectUrl) -> Result<Box<dyn PlaybackHandle>, PlaybackError>;
}
