//! Playback controller integration tests with a scripted audio output

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use ispeaker_recordings::application::ports::{
    AudioOutput, DecodeError, PlaybackError, PlaybackHandle, PlaybackStatus, RecordingBackend,
};
use ispeaker_recordings::application::{
    BackendSelector, ObjectUrl, PlaybackCallbacks, PlaybackController, PlaybackEvent,
    PlaybackOutcome, PlaybackPath, PlaybackStarted, RecordingStore,
};
use ispeaker_recordings::domain::config::BackendPreference;
use ispeaker_recordings::domain::recording::{AudioMimeType, Recording, RecordingKey};
use ispeaker_recordings::infrastructure::{EnvVarProbe, LocalBackend, StoreContext};

struct ScriptedHandle {
    status: Arc<Mutex<PlaybackStatus>>,
    stops: Arc<AtomicUsize>,
}

impl PlaybackHandle for ScriptedHandle {
    fn status(&self) -> PlaybackStatus {
        self.status.lock().unwrap().clone()
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

/// Output whose paths succeed or fail on demand. Every handle it hands out
/// reports the shared `status`.
struct ScriptedOutput {
    direct_ok: bool,
    url_ok: bool,
    status: Arc<Mutex<PlaybackStatus>>,
    stops: Arc<AtomicUsize>,
    urls: Mutex<Vec<PathBuf>>,
}

impl ScriptedOutput {
    fn new(direct_ok: bool, url_ok: bool, status: PlaybackStatus) -> Arc<Self> {
        Arc::new(Self {
            direct_ok,
            url_ok,
            status: Arc::new(Mutex::new(status)),
            stops: Arc::new(AtomicUsize::new(0)),
            urls: Mutex::new(Vec::new()),
        })
    }

    fn set_status(&self, status: PlaybackStatus) {
        *self.status.lock().unwrap() = status;
    }

    fn handle(&self) -> Box<dyn PlaybackHandle> {
        Box::new(ScriptedHandle {
            status: self.status.clone(),
            stops: self.stops.clone(),
        })
    }

    fn url_paths(&self) -> Vec<PathBuf> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioOutput for ScriptedOutput {
    async fn play_buffer(&self, _payload: &[u8]) -> Result<Box<dyn PlaybackHandle>, DecodeError> {
        if self.direct_ok {
            Ok(self.handle())
        } else {
            Err(DecodeError("malformed buffer".into()))
        }
    }

    async fn play_url(&self, url: &ObjectUrl) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        assert!(url.path().exists(), "object URL must exist while playing");
        self.urls.lock().unwrap().push(url.path().to_path_buf());
        if self.url_ok {
            Ok(self.handle())
        } else {
            Err(PlaybackError::PlaybackFailed("unsupported source".into()))
        }
    }
}

/// Output whose direct path always fails and whose object URL path never
/// returns, so a session can be stopped while the fallback is starting.
struct StalledOutput {
    entered: Notify,
    urls: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl AudioOutput for StalledOutput {
    async fn play_buffer(&self, _payload: &[u8]) -> Result<Box<dyn PlaybackHandle>, DecodeError> {
        Err(DecodeError("malformed buffer".into()))
    }

    async fn play_url(&self, url: &ObjectUrl) -> Result<Box<dyn PlaybackHandle>, PlaybackError> {
        self.urls.lock().unwrap().push(url.path().to_path_buf());
        self.entered.notify_one();
        std::future::pending().await
    }
}

fn key(s: &str) -> RecordingKey {
    RecordingKey::new(s).unwrap()
}

async fn controller_with(
    output: Arc<dyn AudioOutput>,
    recordings: &[&str],
) -> PlaybackController {
    let local: Arc<dyn RecordingBackend> =
        Arc::new(LocalBackend::new(Arc::new(StoreContext::in_memory())));
    let selector = BackendSelector::new(
        BackendPreference::Local,
        Arc::new(EnvVarProbe::with_var("ISPEAKER_TEST_PLAYBACK_UNSET")),
        local.clone(),
        local,
    );
    let store = Arc::new(RecordingStore::new(selector));
    for name in recordings {
        store
            .put(Recording::new(key(name), vec![7u8; 1024], None))
            .await
            .unwrap();
    }
    PlaybackController::new(store, output).with_poll_interval(Duration::from_millis(2))
}

#[derive(Default)]
struct Counts {
    success: AtomicUsize,
    error: AtomicUsize,
    ended: AtomicUsize,
    not_found: AtomicBool,
    path: Mutex<Option<PlaybackPath>>,
}

fn counting_callbacks(counts: &Arc<Counts>) -> PlaybackCallbacks {
    let on_success = counts.clone();
    let on_error = counts.clone();
    let on_ended = counts.clone();
    PlaybackCallbacks {
        on_success: Some(Box::new(move |started: &PlaybackStarted| {
            on_success.success.fetch_add(1, Ordering::SeqCst);
            *on_success.path.lock().unwrap() = Some(started.path);
        })),
        on_error: Some(Box::new(move |error: &PlaybackError| {
            on_error.error.fetch_add(1, Ordering::SeqCst);
            on_error.not_found.store(error.is_not_found(), Ordering::SeqCst);
        })),
        on_ended: Some(Box::new(move || {
            on_ended.ended.fetch_add(1, Ordering::SeqCst);
        })),
    }
}

#[tokio::test]
async fn missing_key_calls_only_on_error() {
    let output = ScriptedOutput::new(true, true, PlaybackStatus::Ended);
    let controller = controller_with(output, &[]).await;
    let counts = Arc::new(Counts::default());

    let outcome = controller
        .play(key("missing-key"))
        .drive(counting_callbacks(&counts))
        .await;

    assert!(matches!(outcome, PlaybackOutcome::Failed(ref e) if e.is_not_found()));
    assert_eq!(counts.error.load(Ordering::SeqCst), 1);
    assert!(counts.not_found.load(Ordering::SeqCst));
    assert_eq!(counts.success.load(Ordering::SeqCst), 0);
    assert_eq!(counts.ended.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_buffer_falls_back_and_succeeds_once() {
    let output = ScriptedOutput::new(false, true, PlaybackStatus::Ended);
    let controller = controller_with(output.clone(), &["q1"]).await;
    let counts = Arc::new(Counts::default());

    let outcome = controller.play(key("q1")).drive(counting_callbacks(&counts)).await;

    assert_eq!(outcome, PlaybackOutcome::Ended);
    assert_eq!(counts.success.load(Ordering::SeqCst), 1);
    assert_eq!(counts.ended.load(Ordering::SeqCst), 1);
    assert_eq!(counts.error.load(Ordering::SeqCst), 0);
    assert_eq!(*counts.path.lock().unwrap(), Some(PlaybackPath::ObjectUrl));

    let urls = output.url_paths();
    assert_eq!(urls.len(), 1);
    assert!(!urls[0].exists(), "object URL released after playback");
}

#[tokio::test]
async fn both_paths_failing_reports_once_and_releases_url() {
    let output = ScriptedOutput::new(false, false, PlaybackStatus::Playing);
    let controller = controller_with(output.clone(), &["q1"]).await;
    let mut session = controller.play(key("q1"));

    match session.next_event().await {
        Some(PlaybackEvent::Failed(PlaybackError::PlaybackFailed(message))) => {
            assert!(message.contains("unsupported source"));
        }
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(session.next_event().await, None);

    let urls = output.url_paths();
    assert_eq!(urls.len(), 1);
    assert!(!urls[0].exists());
}

#[tokio::test]
async fn stop_mid_playback_releases_everything_silently() {
    let output = ScriptedOutput::new(false, true, PlaybackStatus::Playing);
    let controller = controller_with(output.clone(), &["q1"]).await;
    let mut session = controller.play(key("q1"));

    let started = match session.next_event().await {
        Some(PlaybackEvent::Started(started)) => started,
        other => panic!("expected Started, got {:?}", other),
    };
    assert_eq!(started.mime_type, AudioMimeType::Wav);
    assert!(started.url.as_deref().is_some_and(|u| u.starts_with("file://")));

    let url_path = output.url_paths()[0].clone();
    assert!(url_path.exists());

    assert_eq!(session.stop().await, PlaybackOutcome::Stopped);
    assert!(!url_path.exists());
    assert_eq!(output.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stop_before_start_emits_nothing() {
    let output = ScriptedOutput::new(true, true, PlaybackStatus::Playing);
    let controller = controller_with(output.clone(), &["q1"]).await;
    let counts = Arc::new(Counts::default());

    let session = controller.play(key("q1"));
    session.cancel_token().cancel();
    let outcome = session.drive(counting_callbacks(&counts)).await;

    assert_eq!(outcome, PlaybackOutcome::Stopped);
    assert_eq!(counts.success.load(Ordering::SeqCst), 0);
    assert_eq!(counts.error.load(Ordering::SeqCst), 0);
    assert_eq!(counts.ended.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failure_after_start_is_reported() {
    let output = ScriptedOutput::new(true, true, PlaybackStatus::Playing);
    let controller = controller_with(output.clone(), &["q1"]).await;
    let mut session = controller.play(key("q1"));

    assert!(matches!(
        session.next_event().await,
        Some(PlaybackEvent::Started(_))
    ));
    output.set_status(PlaybackStatus::Failed("device lost".into()));

    assert_eq!(
        session.next_event().await,
        Some(PlaybackEvent::Failed(PlaybackError::PlaybackFailed(
            "device lost".into()
        )))
    );
    assert!(matches!(session.wait().await, PlaybackOutcome::Failed(_)));
    assert_eq!(output.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn overlapping_sessions_are_independent() {
    let output = ScriptedOutput::new(true, true, PlaybackStatus::Playing);
    let controller = controller_with(output.clone(), &["q1"]).await;

    let mut first = controller.play(key("q1"));
    let mut second = controller.play(key("q1"));
    assert!(matches!(first.next_event().await, Some(PlaybackEvent::Started(_))));
    assert!(matches!(second.next_event().await, Some(PlaybackEvent::Started(_))));

    assert_eq!(first.stop().await, PlaybackOutcome::Stopped);
    assert!(!second.is_stopped());

    output.set_status(PlaybackStatus::Ended);
    assert_eq!(second.next_event().await, Some(PlaybackEvent::Ended));
    assert_eq!(second.wait().await, PlaybackOutcome::Ended);
}

#[tokio::test]
async fn dropping_a_session_stops_playback() {
    let output = ScriptedOutput::new(true, true, PlaybackStatus::Playing);
    let controller = controller_with(output.clone(), &["q1"]).await;

    let mut session = controller.play(key("q1"));
    assert!(matches!(session.next_event().await, Some(PlaybackEvent::Started(_))));
    drop(session);

    for _ in 0..200 {
        if output.stops.load(Ordering::SeqCst) == 1 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("dropped session never stopped its handle");
}

#[tokio::test]
async fn stop_while_fallback_starts_releases_url_silently() {
    let output = Arc::new(StalledOutput {
        entered: Notify::new(),
        urls: Mutex::new(Vec::new()),
    });
    let controller = controller_with(output.clone(), &["q1"]).await;
    let mut session = controller.play(key("q1"));

    output.entered.notified().await;
    let url_path = output.urls.lock().unwrap()[0].clone();
    assert!(url_path.exists());

    session.cancel_token().cancel();
    assert_eq!(session.next_event().await, None);
    assert_eq!(session.wait().await, PlaybackOutcome::Stopped);
    assert!(!url_path.exists(), "object URL released on stop");
    assert_eq!(output.urls.lock().unwrap().len(), 1);
}
