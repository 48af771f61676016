//! Silent audio output
//!
//! Used when audio is disabled in the config.

use async_trait::async_trait;

use crate::application::playback::ObjectUrl;
use crate::application::ports::{
    AudioOutput, DecodeError, PlaybackError, PlaybackHandle, PlaybackStatus,
};

/// Output that accepts every payload and finishes immediately
pub struct NullAudioOutput;

impl NullAudioOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

struct FinishedHandle;

impl PlaybackHandle for FinishedHandle {
    fn status(&self) -> PlaybackStatus {
        PlaybackStatus::Ended
    }

    fn stop(&self) {}
}

#[async_trait]
impl AudioOutput for NullAudioOutput {
    async fn play_buffer(&self, payload: &[u8]) -> Result<Box<dyn PlaybackHandle>, DecodeError> {
        log::debug!("Audio disabled; skipping {} bytes", payload.len());
        Ok(Box::new(FinishedHandle))
    }

    async fn play_url(&self, url: &ObjectUrl) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        log::debug!("Audio disabled; skipping {}", url.url());
        Ok(Box::new(FinishedHandle))
    }
}
