//! Playback controller: resolves a stored recording and plays it

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{AudioOutput, PlaybackError, PlaybackHandle, PlaybackStatus};
use crate::application::store::RecordingStore;
use crate::domain::config::DEFAULT_POLL_INTERVAL_MS;
use crate::domain::recording::{AudioMimeType, RecordingKey};

use super::object_url::ObjectUrl;
use super::session::{
    EventSink, PlaybackEvent, PlaybackOutcome, PlaybackPath, PlaybackSession, PlaybackStarted,
};

/// Starts one independent playback session per `play` call.
///
/// Overlapping calls for the same key are not merged; callers that want a
/// single active session stop the previous one first.
#[derive(Clone)]
pub struct PlaybackController {
    store: Arc<RecordingStore>,
    output: Arc<dyn AudioOutput>,
    poll_interval: Duration,
    default_mime_type: AudioMimeType,
}

impl PlaybackController {
    pub fn new(store: Arc<RecordingStore>, output: Arc<dyn AudioOutput>) -> Self {
        Self {
            store,
            output,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            default_mime_type: AudioMimeType::default(),
        }
    }

    /// How often a running handle is checked for completion
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Type assumed for recordings stored without one
    pub fn with_default_mime_type(mut self, mime_type: AudioMimeType) -> Self {
        self.default_mime_type = mime_type;
        self
    }

    /// Start playing the recording stored under `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn play(&self, key: RecordingKey) -> PlaybackSession {
        let (mut session, sink, token) = PlaybackSession::channel(key.clone());
        let run = SessionRun {
            controller: self.clone(),
            key,
            sink,
            token,
        };
        session.attach(tokio::spawn(run.execute()));
        session
    }
}

/// State owned by one session task
struct SessionRun {
    controller: PlaybackController,
    key: RecordingKey,
    sink: EventSink,
    token: CancellationToken,
}

/// Audio that has started, plus the object URL it may depend on
struct Started {
    handle: Box<dyn PlaybackHandle>,
    url: Option<ObjectUrl>,
}

impl Started {
    fn finish(self) {
        self.handle.stop();
        drop(self.handle);
        if let Some(url) = self.url {
            url.revoke();
        }
    }
}

impl SessionRun {
    async fn execute(self) -> PlaybackOutcome {
        match self.run().await {
            Ok(outcome) => outcome,
            Err(error) => {
                log::error!("Playback of '{}' failed: {}", self.key, error);
                self.sink.emit(PlaybackEvent::Failed(error.clone()));
                PlaybackOutcome::Failed(error)
            }
        }
    }

    async fn run(&self) -> Result<PlaybackOutcome, PlaybackError> {
        let store = &self.controller.store;
        let recording = tokio::select! {
            biased;
            _ = self.token.cancelled() => return Ok(PlaybackOutcome::Stopped),
            result = store.get(&self.key) => result?,
        };

        let mime_type = recording
            .mime_type()
            .unwrap_or(self.controller.default_mime_type);
        let size_bytes = recording.size_bytes();
        let payload = recording.into_payload();

        let (started, path) = tokio::select! {
            biased;
            _ = self.token.cancelled() => return Ok(PlaybackOutcome::Stopped),
            result = self.start(&payload, mime_type) => result?,
        };

        // Stopped while the output was starting
        if self.token.is_cancelled() {
            started.finish();
            return Ok(PlaybackOutcome::Stopped);
        }

        let url = started.url.as_ref().map(ObjectUrl::url);
        log::info!("Playing '{}' via {} path", self.key, path);
        self.sink.emit(PlaybackEvent::Started(PlaybackStarted {
            key: self.key.clone(),
            path,
            mime_type,
            size_bytes,
            url,
        }));

        self.watch(started).await
    }

    /// Direct decode first; the object URL path only after it fails.
    async fn start(
        &self,
        payload: &[u8],
        mime_type: AudioMimeType,
    ) -> Result<(Started, PlaybackPath), PlaybackError> {
        let output = &self.controller.output;

        match output.play_buffer(payload).await {
            Ok(handle) => return Ok((Started { handle, url: None }, PlaybackPath::Direct)),
            Err(e) => log::warn!("{} for '{}', retrying via object URL", e, self.key),
        }

        let url = ObjectUrl::create(payload, mime_type)?;
        match output.play_url(&url).await {
            Ok(handle) => Ok((
                Started {
                    handle,
                    url: Some(url),
                },
                PlaybackPath::ObjectUrl,
            )),
            Err(e) => {
                url.revoke();
                Err(e)
            }
        }
    }

    /// Poll the running handle until it ends, fails, or the session is stopped
    async fn watch(&self, started: Started) -> Result<PlaybackOutcome, PlaybackError> {
        let mut ticker = interval(self.controller.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    log::debug!("Playback of '{}' stopped", self.key);
                    started.finish();
                    return Ok(PlaybackOutcome::Stopped);
                }
                _ = ticker.tick() => {
                    match started.handle.status() {
                        PlaybackStatus::Playing => {}
                        PlaybackStatus::Ended => {
                            started.finish();
                            log::debug!("Playback of '{}' ended", self.key);
                            self.sink.emit(PlaybackEvent::Ended);
                            return Ok(PlaybackOutcome::Ended);
                        }
                        PlaybackStatus::Failed(message) => {
                            started.finish();
                            return Err(PlaybackError::PlaybackFailed(message));
                        }
                    }
                }
            }
        }
    }
}
