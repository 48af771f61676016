//! Command runners and adapter wiring

use std::env;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::RecordingBackend;
use crate::application::{
    BackendSelector, PlaybackCallbacks, PlaybackController, PlaybackOutcome, PlaybackStarted,
    RecordingStore,
};
use crate::domain::config::{AppConfig, BackendPreference};
use crate::domain::error::InvalidBackendError;
use crate::domain::recording::{AudioMimeType, RecordingKey};
use crate::infrastructure::{
    create_audio_output, EnvVarProbe, FsHostApi, HostBackend, LocalBackend, StoreContext,
};

use super::args::RecordingCommand;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment override for the backend preference
pub const BACKEND_ENV: &str = "ISPEAKER_BACKEND";

/// Merge configuration: defaults < file < env < cli
pub fn merge_config(file_config: AppConfig, cli_config: AppConfig) -> AppConfig {
    let env_config = AppConfig {
        backend: env::var(BACKEND_ENV).ok().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    };

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Backend preference from merged config. Unlike `backend_or_default`,
/// an unparseable value is an error here.
pub fn resolve_backend(config: &AppConfig) -> Result<BackendPreference, InvalidBackendError> {
    match config.backend.as_deref() {
        Some(value) => value.parse(),
        None => Ok(BackendPreference::default()),
    }
}

/// Wire both backends behind a selector
pub fn build_store(config: &AppConfig, preference: BackendPreference) -> Arc<RecordingStore> {
    let context = Arc::new(StoreContext::new(config.database_path_or_default()));
    let local: Arc<dyn RecordingBackend> = Arc::new(LocalBackend::new(context));

    let host_api = Arc::new(FsHostApi::new(config.host_dir_or_default()));
    let host: Arc<dyn RecordingBackend> = Arc::new(HostBackend::new(host_api));

    let selector = BackendSelector::new(preference, Arc::new(EnvVarProbe::new()), host, local);
    Arc::new(RecordingStore::new(selector))
}

pub fn build_controller(config: &AppConfig, store: Arc<RecordingStore>) -> PlaybackController {
    PlaybackController::new(store, create_audio_output(config.audio_or_default()))
        .with_poll_interval(config.poll_interval_or_default())
        .with_default_mime_type(config.default_mime_type_or_default())
}

/// Run a recording command
pub async fn run_command(command: RecordingCommand, config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let preference = match resolve_backend(config) {
        Ok(preference) => preference,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let store = build_store(config, preference);
    log::debug!(
        "Backend preference {}, active backend {}",
        preference,
        store.active_backend()
    );

    match command {
        RecordingCommand::Save { key, file, mime } => {
            run_save(&store, &presenter, &key, &file, mime.as_deref()).await
        }
        RecordingCommand::Exists { key } => run_exists(&store, &presenter, &key).await,
        RecordingCommand::Play { key } => {
            let controller = build_controller(config, Arc::clone(&store));
            run_play(&controller, &presenter, &key).await
        }
    }
}

fn parse_key(presenter: &Presenter, key: &str) -> Result<RecordingKey, ExitCode> {
    RecordingKey::new(key).map_err(|e| {
        presenter.error(&e.to_string());
        ExitCode::from(EXIT_USAGE_ERROR)
    })
}

async fn run_save(
    store: &RecordingStore,
    presenter: &Presenter,
    key: &str,
    file: &Path,
    mime: Option<&str>,
) -> ExitCode {
    let key = match parse_key(presenter, key) {
        Ok(key) => key,
        Err(code) => return code,
    };

    let mime_type = match mime {
        Some(value) => match value.parse::<AudioMimeType>() {
            Ok(mime_type) => Some(mime_type),
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => AudioMimeType::from_path(file),
    };

    let spinner = presenter.spinner(&format!("Saving '{}'...", key));
    match store.save_file(file, key.clone(), mime_type).await {
        Ok(kind) => {
            presenter.spinner_success(&spinner, &format!("Saved '{}' to {} store", key, kind));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&spinner, &e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run_exists(store: &RecordingStore, presenter: &Presenter, key: &str) -> ExitCode {
    let key = match parse_key(presenter, key) {
        Ok(key) => key,
        Err(code) => return code,
    };

    match store.exists(&key).await {
        Ok(true) => {
            presenter.output("true");
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(false) => {
            presenter.output("false");
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run_play(controller: &PlaybackController, presenter: &Presenter, key: &str) -> ExitCode {
    let key = match parse_key(presenter, key) {
        Ok(key) => key,
        Err(code) => return code,
    };

    let session = controller.play(key.clone());

    // Ctrl+C stops the session; the drive loop below then returns Stopped
    let token = session.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, stopping playback");
            token.cancel();
        }
    });

    let spinner = presenter.spinner(&format!("Loading '{}'...", key));
    let playing = spinner.clone();
    let callbacks = PlaybackCallbacks {
        on_success: Some(Box::new(move |started: &PlaybackStarted| {
            playing.set_message(Presenter::new().format_playing(started));
        })),
        ..Default::default()
    };

    let outcome = session.drive(callbacks).await;
    interrupt.abort();

    match outcome {
        PlaybackOutcome::Ended => {
            presenter.spinner_success(&spinner, &format!("Finished '{}'", key));
            ExitCode::from(EXIT_SUCCESS)
        }
        PlaybackOutcome::Stopped => {
            spinner.finish_and_clear();
            presenter.warn("Playback stopped");
            ExitCode::from(EXIT_SUCCESS)
        }
        PlaybackOutcome::Failed(e) => {
            presenter.spinner_fail(&spinner, &e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}
