//! Playback of stored recordings
//!
//! A [`PlaybackController`] turns a key into a [`PlaybackSession`]: a spawned
//! task that resolves the payload, plays it (direct decode first, object URL
//! fallback second) and reports through events or callbacks.

mod controller;
mod object_url;
mod session;

pub use controller::PlaybackController;
pub use object_url::ObjectUrl;
pub use session::{
    PlaybackCallbacks, PlaybackEvent, PlaybackOutcome, PlaybackPath, PlaybackSession,
    PlaybackStarted,
};
