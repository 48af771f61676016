//! Recording value objects

mod audio;
mod key;

pub use audio::{format_size, AudioMimeType, Recording};
pub use key::RecordingKey;
