//! Rodio-based audio output
//!
//! Each playback gets its own thread that owns the output stream and sink
//! (rodio's stream cannot leave the thread that opened it). The returned
//! handle talks to that thread through a stop channel and a shared state.

use std::io::Cursor;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink, Source};

use crate::application::playback::ObjectUrl;
use crate::application::ports::{
    AudioOutput, DecodeError, PlaybackError, PlaybackHandle, PlaybackStatus,
};

use super::decode::decode_file;

const STATE_PLAYING: u8 = 0;
const STATE_ENDED: u8 = 1;

/// How often the playback thread checks for stop requests and drained sinks
const SINK_POLL: Duration = Duration::from_millis(20);

/// Audio output on the default device
pub struct RodioAudioOutput;

impl RodioAudioOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutput for RodioAudioOutput {
    async fn play_buffer(&self, payload: &[u8]) -> Result<Box<dyn PlaybackHandle>, DecodeError> {
        let bytes = payload.to_vec();
        tokio::task::spawn_blocking(move || {
            let decoder =
                Decoder::new(Cursor::new(bytes)).map_err(|e| DecodeError(e.to_string()))?;
            spawn_player(decoder.convert_samples::<f32>()).map_err(|e| DecodeError(e.to_string()))
        })
        .await
        .map_err(|e| DecodeError(format!("Task join error: {}", e)))?
    }

    async fn play_url(&self, url: &ObjectUrl) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        let path = url.path().to_path_buf();
        let mime_type = url.mime_type();
        tokio::task::spawn_blocking(move || spawn_player(decode_file(&path, mime_type)?))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Start a playback thread and wait until the sink has the source queued
fn spawn_player<S>(source: S) -> Result<Box<dyn PlaybackHandle>, PlaybackError>
where
    S: Source<Item = f32> + Send + 'static,
{
    let (ready_tx, ready_rx) = mpsc::channel::<Result<(), PlaybackError>>();
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let state = Arc::new(AtomicU8::new(STATE_PLAYING));
    let thread_state = Arc::clone(&state);

    thread::Builder::new()
        .name("ispeaker-playback".into())
        .spawn(move || {
            let (_stream, stream_handle) = match OutputStream::try_default() {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
                    return;
                }
            };
            let sink = match Sink::try_new(&stream_handle) {
                Ok(sink) => sink,
                Err(e) => {
                    let _ = ready_tx.send(Err(PlaybackError::PlaybackFailed(e.to_string())));
                    return;
                }
            };

            sink.append(source);
            let _ = ready_tx.send(Ok(()));

            loop {
                match stop_rx.recv_timeout(SINK_POLL) {
                    // Explicit stop, or the handle was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        sink.stop();
                        break;
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if sink.empty() {
                            thread_state.store(STATE_ENDED, Ordering::SeqCst);
                            break;
                        }
                    }
                }
            }
        })
        .map_err(|e| PlaybackError::PlaybackFailed(format!("Cannot start playback: {}", e)))?;

    ready_rx.recv().map_err(|_| {
        PlaybackError::PlaybackFailed("Playback thread exited before starting".to_string())
    })??;

    Ok(Box::new(RodioHandle {
        state,
        stop_tx: Mutex::new(Some(stop_tx)),
    }))
}

/// Handle to one rodio playback thread
struct RodioHandle {
    state: Arc<AtomicU8>,
    stop_tx: Mutex<Option<Sender<()>>>,
}

impl PlaybackHandle for RodioHandle {
    fn status(&self) -> PlaybackStatus {
        match self.state.load(Ordering::SeqCst) {
            STATE_ENDED => PlaybackStatus::Ended,
            _ => PlaybackStatus::Playing,
        }
    }

    fn stop(&self) {
        if let Ok(mut stop_tx) = self.stop_tx.lock() {
            if let Some(tx) = stop_tx.take() {
                let _ = tx.send(());
            }
        }
    }
}
