//! Host-delegated recording backend

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{
    BackendKind, HostApiError, HostBinaryApi, RecordingBackend, StoreError,
};
use crate::domain::recording::{Recording, RecordingKey};

/// Pass-through to the desktop shell's native API.
///
/// No retries and no validation: host failures propagate as-is, except the
/// host's not-found signal which becomes `StoreError::NotFound`.
#[derive(Clone)]
pub struct HostBackend {
    api: Arc<dyn HostBinaryApi>,
}

impl HostBackend {
    pub fn new(api: Arc<dyn HostBinaryApi>) -> Self {
        Self { api }
    }
}

fn from_host(error: HostApiError) -> StoreError {
    match error {
        HostApiError::NotFound(key) => StoreError::NotFound(key),
        other => StoreError::Host(other),
    }
}

#[async_trait]
impl RecordingBackend for HostBackend {
    async fn put(&self, recording: Recording) -> Result<(), StoreError> {
        if let Some(mime_type) = recording.mime_type() {
            log::debug!("Host API does not keep MIME types; dropping {}", mime_type);
        }
        let key = recording.key().clone();
        self.api
            .save_recording(key.as_str(), recording.into_payload())
            .await
            .map_err(from_host)
    }

    async fn get(&self, key: &RecordingKey) -> Result<Recording, StoreError> {
        let payload = self
            .api
            .play_recording(key.as_str())
            .await
            .map_err(from_host)?;
        Ok(Recording::new(key.clone(), payload, None))
    }

    async fn exists(&self, key: &RecordingKey) -> Result<bool, StoreError> {
        self.api
            .check_recording_exists(key.as_str())
            .await
            .map_err(from_host)
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records calls and answers with a canned error
    struct FailingHost {
        error: HostApiError,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HostBinaryApi for FailingHost {
        async fn save_recording(&self, key: &str, buffer: Vec<u8>) -> Result<(), HostApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("save {} {}", key, buffer.len()));
            Err(self.error.clone())
        }

        async fn check_recording_exists(&self, key: &str) -> Result<bool, HostApiError> {
            self.calls.lock().unwrap().push(format!("exists {}", key));
            Err(self.error.clone())
        }

        async fn play_recording(&self, key: &str) -> Result<Vec<u8>, HostApiError> {
            self.calls.lock().unwrap().push(format!("play {}", key));
            Err(self.error.clone())
        }
    }

    fn host(error: HostApiError) -> (HostBackend, Arc<FailingHost>) {
        let api = Arc::new(FailingHost {
            error,
            calls: Mutex::new(Vec::new()),
        });
        (HostBackend::new(api.clone()), api)
    }

    fn key(s: &str) -> RecordingKey {
        RecordingKey::new(s).unwrap()
    }

    #[tokio::test]
    async fn delegates_each_call_once() {
        let (backend, api) = host(HostApiError::Io("disk full".into()));

        let _ = backend.put(Recording::new(key("q1"), vec![0; 3], None)).await;
        let _ = backend.exists(&key("q1")).await;
        let _ = backend.get(&key("q1")).await;

        assert_eq!(
            *api.calls.lock().unwrap(),
            vec!["save q1 3", "exists q1", "play q1"]
        );
    }

    #[tokio::test]
    async fn host_errors_propagate_unchanged() {
        let (backend, _) = host(HostApiError::Rejected("sandbox".into()));
        let err = backend
            .put(Recording::new(key("q1"), vec![1], None))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Host(HostApiError::Rejected("sandbox".into())));
    }

    #[tokio::test]
    async fn host_not_found_maps_to_not_found() {
        let (backend, _) = host(HostApiError::NotFound("q9".into()));
        let err = backend.get(&key("q9")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
