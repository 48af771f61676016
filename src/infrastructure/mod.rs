//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the embedded
//! recording store, the host file-system API, audio output and config.

pub mod audio;
pub mod config;
pub mod environment;
pub mod host;
pub mod local;

// Re-export adapters
pub use audio::{create_audio_output, NullAudioOutput, RodioAudioOutput};
pub use config::XdgConfigStore;
pub use environment::{EnvVarProbe, HOST_SHELL_ENV};
pub use host::{FsHostApi, HostBackend};
pub use local::{LocalBackend, StoreContext};
