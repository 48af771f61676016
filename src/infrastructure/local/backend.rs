//! Local recording backend on the embedded store

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};

use crate::application::ports::{BackendKind, RecordingBackend, StoreError};
use crate::domain::recording::{AudioMimeType, Recording, RecordingKey};

use super::context::{StoreContext, StoreHandle};

/// Recording backend on the process-local object store
#[derive(Clone)]
pub struct LocalBackend {
    context: Arc<StoreContext>,
}

impl LocalBackend {
    pub fn new(context: Arc<StoreContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<StoreContext> {
        &self.context
    }

    /// Run `op` against the open store on the blocking pool
    async fn with_store<T, F>(
        &self,
        op: F,
        on_error: fn(String) -> StoreError,
    ) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&StoreHandle) -> Result<T, String> + Send + 'static,
    {
        let handle = self.context.open().await?;
        tokio::task::spawn_blocking(move || op(&handle))
            .await
            .map_err(|e| on_error(format!("Task join error: {}", e)))?
            .map_err(on_error)
    }
}

#[async_trait]
impl RecordingBackend for LocalBackend {
    async fn put(&self, recording: Recording) -> Result<(), StoreError> {
        self.with_store(
            move |store| {
                let conn = store.lock()?;
                conn.execute(
                    "INSERT INTO recording_data (id, recording, mime_type) VALUES (?1, ?2, ?3)
                     ON CONFLICT(id) DO UPDATE SET
                         recording = excluded.recording,
                         mime_type = excluded.mime_type",
                    params![
                        recording.key().as_str(),
                        recording.payload(),
                        recording.mime_type().map(|m| m.as_str()),
                    ],
                )
                .map(|_| ())
                .map_err(|e| e.to_string())
            },
            StoreError::WriteError,
        )
        .await
    }

    async fn get(&self, key: &RecordingKey) -> Result<Recording, StoreError> {
        let id = key.as_str().to_string();
        let row = self
            .with_store(
                move |store| {
                    let conn = store.lock()?;
                    conn.query_row(
                        "SELECT recording, mime_type FROM recording_data WHERE id = ?1",
                        [&id],
                        |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Option<String>>(1)?)),
                    )
                    .optional()
                    .map_err(|e| e.to_string())
                },
                StoreError::ReadError,
            )
            .await?;

        let Some((payload, mime)) = row else {
            return Err(StoreError::NotFound(key.to_string()));
        };

        let mime_type = mime.and_then(|m| match m.parse::<AudioMimeType>() {
            Ok(mime_type) => Some(mime_type),
            Err(e) => {
                log::warn!("Ignoring stored type for '{}': {}", key, e);
                None
            }
        });

        Ok(Recording::new(key.clone(), payload, mime_type))
    }

    async fn exists(&self, key: &RecordingKey) -> Result<bool, StoreError> {
        let id = key.as_str().to_string();
        self.with_store(
            move |store| {
                let conn = store.lock()?;
                conn.query_row("SELECT 1 FROM recording_data WHERE id = ?1", [&id], |_| Ok(()))
                    .optional()
                    .map(|row| row.is_some())
                    .map_err(|e| e.to_string())
            },
            StoreError::ReadError,
        )
        .await
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }
}
