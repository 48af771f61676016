//! File-system implementation of the host binary API
//!
//! This is what the desktop shell provides natively: one `.wav` file per
//! recording key under the app's recordings directory.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;

use crate::application::ports::{HostApiError, HostBinaryApi};

/// Native recording files under a root directory
pub struct FsHostApi {
    root: PathBuf,
}

impl FsHostApi {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the recording for `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.wav", escape_key(key)))
    }
}

/// Map a key to a single safe file name component.
/// ASCII alphanumerics, `-` and `_` pass through; everything else is %XX-escaped.
fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn io_error(path: &Path, e: std::io::Error) -> HostApiError {
    HostApiError::Io(format!("{}: {}", path.display(), e))
}

fn write_atomically(root: &Path, path: &Path, buffer: &[u8]) -> Result<(), HostApiError> {
    let mut staging = NamedTempFile::new_in(root).map_err(|e| io_error(root, e))?;
    staging
        .write_all(buffer)
        .map_err(|e| io_error(staging.path(), e))?;
    staging
        .as_file()
        .sync_all()
        .map_err(|e| io_error(staging.path(), e))?;
    staging.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

#[async_trait]
impl HostBinaryApi for FsHostApi {
    async fn save_recording(&self, key: &str, buffer: Vec<u8>) -> Result<(), HostApiError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(&self.root, e))?;

        let path = self.path_for(key);
        let root = self.root.clone();
        let target = path.clone();
        let len = buffer.len();

        // One staging file per write; the last rename wins
        tokio::task::spawn_blocking(move || write_atomically(&root, &target, &buffer))
            .await
            .map_err(|e| HostApiError::Io(format!("Task join error: {}", e)))??;

        log::debug!("Host saved {} bytes to {}", len, path.display());
        Ok(())
    }

    async fn check_recording_exists(&self, key: &str) -> Result<bool, HostApiError> {
        let path = self.path_for(key);
        fs::try_exists(&path).await.map_err(|e| io_error(&path, e))
    }

    async fn play_recording(&self, key: &str) -> Result<Vec<u8>, HostApiError> {
        let path = self.path_for(key);
        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => HostApiError::NotFound(key.to_string()),
            _ => io_error(&path, e),
        })
    }
}
