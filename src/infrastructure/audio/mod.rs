//! Audio output adapters

mod decode;
mod null;
mod rodio;

pub use null::NullAudioOutput;
pub use rodio::RodioAudioOutput;

use std::sync::Arc;

use crate::application::ports::AudioOutput;

/// Create an audio output based on whether audio is enabled
pub fn create_audio_output(enabled: bool) -> Arc<dyn AudioOutput> {
    if enabled {
        Arc::new(RodioAudioOutput::new())
    } else {
        Arc::new(NullAudioOutput::new())
    }
}
