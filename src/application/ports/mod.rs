//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_output;
pub mod backend;
pub mod config;
pub mod environment;
pub mod host;

// Re-export common types
pub use audio_output::{AudioOutput, DecodeError, PlaybackError, PlaybackHandle, PlaybackStatus};
pub use backend::{BackendKind, RecordingBackend, StoreError};
pub use config::ConfigStore;
pub use environment::EnvironmentProbe;
pub use host::{HostApiError, HostBinaryApi};
