//! Application layer - Use cases and port interfaces
//!
//! Contains the core recording operations and trait definitions
//! for external system interactions.

pub mod conversion;
pub mod playback;
pub mod ports;
pub mod store;

// Re-export use cases
pub use conversion::{file_to_buffer, to_buffer};
pub use playback::{
    ObjectUrl, PlaybackCallbacks, PlaybackController, PlaybackEvent, PlaybackOutcome,
    PlaybackPath, PlaybackSession, PlaybackStarted,
};
pub use store::{ActiveBackend, BackendSelector, RecordingStore};
