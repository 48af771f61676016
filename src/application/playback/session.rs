//! Playback sessions: events, outcomes, callbacks and cancellation

use std::fmt;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::ports::PlaybackError;
use crate::domain::recording::{AudioMimeType, RecordingKey};

/// How the audio reached the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPath {
    /// Decoded straight from the in-memory payload
    Direct,
    /// Played from a temporary object URL after direct decoding failed
    ObjectUrl,
}

impl fmt::Display for PlaybackPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::ObjectUrl => write!(f, "object-url"),
        }
    }
}

/// Details handed to the caller once audio is playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackStarted {
    pub key: RecordingKey,
    pub path: PlaybackPath,
    pub mime_type: AudioMimeType,
    pub size_bytes: usize,
    /// Set when playing from an object URL
    pub url: Option<String>,
}

/// Events emitted by a session, in order: at most one `Started`, then
/// exactly one of `Ended` or `Failed`. Nothing is emitted after a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Started(PlaybackStarted),
    Ended,
    Failed(PlaybackError),
}

impl PlaybackEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started(_))
    }
}

/// How a session finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Ended,
    Failed(PlaybackError),
    Stopped,
}

/// Callbacks for playback notifications
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct PlaybackCallbacks {
    /// Called once audio starts playing
    pub on_success: Option<Box<dyn Fn(&PlaybackStarted) + Send + Sync>>,
    /// Called once on any terminal failure
    pub on_error: Option<Box<dyn Fn(&PlaybackError) + Send + Sync>>,
    /// Called once when playback completes naturally
    pub on_ended: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Sending half used by the session task
pub(crate) struct EventSink {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
    token: CancellationToken,
}

impl EventSink {
    pub(crate) fn emit(&self, event: PlaybackEvent) {
        if self.token.is_cancelled() {
            return;
        }
        // Receiver gone means the session was stopped or dropped
        let _ = self.tx.send(event);
    }
}

/// One playback attempt, from request to terminal event.
///
/// Dropping the session cancels it.
pub struct PlaybackSession {
    key: RecordingKey,
    token: CancellationToken,
    events: Option<mpsc::UnboundedReceiver<PlaybackEvent>>,
    task: Option<JoinHandle<PlaybackOutcome>>,
}

impl PlaybackSession {
    /// Create the session and the sink its task reports through
    pub(crate) fn channel(key: RecordingKey) -> (Self, EventSink, CancellationToken) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let sink = EventSink {
            tx,
            token: token.clone(),
        };
        let session = Self {
            key,
            token: token.clone(),
            events: Some(rx),
            task: None,
        };
        (session, sink, token)
    }

    pub(crate) fn attach(&mut self, task: JoinHandle<PlaybackOutcome>) {
        self.task = Some(task);
    }

    pub fn key(&self) -> &RecordingKey {
        &self.key
    }

    /// Token that stops this session when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Next event, or `None` once the session has finished or been stopped
    pub async fn next_event(&mut self) -> Option<PlaybackEvent> {
        let events = self.events.as_mut()?;
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            event = events.recv() => event,
        }
    }

    /// Stop playback. Listeners are detached before resources are released,
    /// so no event is delivered after this call.
    pub async fn stop(mut self) -> PlaybackOutcome {
        self.events.take();
        self.token.cancel();
        self.join().await
    }

    /// Wait for the session to finish on its own
    pub async fn wait(mut self) -> PlaybackOutcome {
        self.join().await
    }

    /// Dispatch events to `callbacks` until a terminal event or cancellation
    pub async fn drive(mut self, callbacks: PlaybackCallbacks) -> PlaybackOutcome {
        while let Some(event) = self.next_event().await {
            match &event {
                PlaybackEvent::Started(started) => {
                    if let Some(ref cb) = callbacks.on_success {
                        cb(started);
                    }
                }
                PlaybackEvent::Ended => {
                    if let Some(ref cb) = callbacks.on_ended {
                        cb();
                    }
                }
                PlaybackEvent::Failed(error) => {
                    if let Some(ref cb) = callbacks.on_error {
                        cb(error);
                    }
                }
            }

            if event.is_terminal() {
                break;
            }
        }

        self.join().await
    }

    async fn join(&mut self) -> PlaybackOutcome {
        let Some(task) = self.task.take() else {
            return PlaybackOutcome::Stopped;
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => PlaybackOutcome::Failed(PlaybackError::PlaybackFailed(format!(
                "Playback task failed: {}",
                e
            ))),
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.token.cancel();
        }
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("key", &self.key)
            .field("stopped", &self.token.is_cancelled())
            .finish()
    }
}
