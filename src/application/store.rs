//! Recording store use case
//!
//! Persists, checks and reads recordings through whichever backend the
//! current environment calls for.

use std::path::Path;
use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::domain::config::BackendPreference;
use crate::domain::recording::{AudioMimeType, Recording, RecordingKey};

use super::conversion::{file_to_buffer, to_buffer};
use super::ports::{BackendKind, EnvironmentProbe, RecordingBackend, StoreError};

/// Backend chosen for a single operation
#[derive(Clone)]
pub enum ActiveBackend {
    Host(Arc<dyn RecordingBackend>),
    Local(Arc<dyn RecordingBackend>),
}

impl ActiveBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Host(_) => BackendKind::Host,
            Self::Local(_) => BackendKind::Local,
        }
    }

    pub fn backend(&self) -> &dyn RecordingBackend {
        match self {
            Self::Host(backend) | Self::Local(backend) => backend.as_ref(),
        }
    }
}

/// Decides which backend services each request.
pub struct BackendSelector {
    preference: BackendPreference,
    probe: Arc<dyn EnvironmentProbe>,
    host: Arc<dyn RecordingBackend>,
    local: Arc<dyn RecordingBackend>,
}

impl BackendSelector {
    pub fn new(
        preference: BackendPreference,
        probe: Arc<dyn EnvironmentProbe>,
        host: Arc<dyn RecordingBackend>,
        local: Arc<dyn RecordingBackend>,
    ) -> Self {
        Self {
            preference,
            probe,
            host,
            local,
        }
    }

    /// Resolve the backend for one operation. The probe is asked every time.
    pub fn select(&self) -> ActiveBackend {
        let use_host = match self.preference {
            BackendPreference::Host => true,
            BackendPreference::Local => false,
            BackendPreference::Auto => self.probe.is_host_shell(),
        };

        if use_host {
            ActiveBackend::Host(Arc::clone(&self.host))
        } else {
            ActiveBackend::Local(Arc::clone(&self.local))
        }
    }

    pub fn preference(&self) -> BackendPreference {
        self.preference
    }
}

/// Recording persistence facade used by the CLI and the playback controller
pub struct RecordingStore {
    selector: BackendSelector,
}

impl RecordingStore {
    pub fn new(selector: BackendSelector) -> Self {
        Self { selector }
    }

    /// Backend that would service an operation issued now
    pub fn active_backend(&self) -> BackendKind {
        self.selector.select().kind()
    }

    /// Convert a raw source into a buffer and persist it under `key`.
    pub async fn save_recording<R>(
        &self,
        source: R,
        key: RecordingKey,
        mime_type: Option<AudioMimeType>,
    ) -> Result<BackendKind, StoreError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let payload = to_buffer(source).await?;
        self.put(Recording::new(key, payload, mime_type)).await
    }

    /// Persist the contents of an audio file under `key`
    pub async fn save_file(
        &self,
        path: &Path,
        key: RecordingKey,
        mime_type: Option<AudioMimeType>,
    ) -> Result<BackendKind, StoreError> {
        let payload = file_to_buffer(path).await?;
        self.put(Recording::new(key, payload, mime_type)).await
    }

    /// Persist a recording, returning the backend that stored it
    pub async fn put(&self, recording: Recording) -> Result<BackendKind, StoreError> {
        let active = self.selector.select();
        let key = recording.key().clone();
        let size = recording.human_readable_size();

        active.backend().put(recording).await?;

        log::info!("Saved recording '{}' ({}) via {} backend", key, size, active.kind());
        Ok(active.kind())
    }

    pub async fn get(&self, key: &RecordingKey) -> Result<Recording, StoreError> {
        let active = self.selector.select();
        log::debug!("Reading recording '{}' via {} backend", key, active.kind());
        active.backend().get(key).await
    }

    pub async fn exists(&self, key: &RecordingKey) -> Result<bool, StoreError> {
        self.selector.select().backend().exists(key).await
    }
}
