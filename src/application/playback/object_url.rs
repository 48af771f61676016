//! Temporary object URLs backing the fallback playback path

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::application::ports::PlaybackError;
use crate::domain::recording::AudioMimeType;

/// A recording payload written to a temporary file and addressable by URL.
///
/// Released exactly once: either through [`ObjectUrl::revoke`] or, on any
/// other exit path, when dropped.
#[derive(Debug)]
pub struct ObjectUrl {
    file: Option<NamedTempFile>,
    path: PathBuf,
    mime_type: AudioMimeType,
}

impl ObjectUrl {
    /// Wrap `payload` as a playable object of the given type
    pub fn create(payload: &[u8], mime_type: AudioMimeType) -> Result<Self, PlaybackError> {
        let suffix = format!(".{}", mime_type.extension());
        let mut file = tempfile::Builder::new()
            .prefix("ispeaker-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| {
                PlaybackError::PlaybackFailed(format!("Cannot create object URL: {}", e))
            })?;

        file.write_all(payload)
            .and_then(|_| file.flush())
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Cannot write object URL: {}", e)))?;

        let path = file.path().to_path_buf();
        log::debug!("Created object URL {} ({} bytes)", path.display(), payload.len());

        Ok(Self {
            file: Some(file),
            path,
            mime_type,
        })
    }

    /// Backing file of the object
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// `file://` URL of the object
    pub fn url(&self) -> String {
        file_url(&self.path)
    }

    /// Release the object now
    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(file) = self.file.take() {
            match file.close() {
                Ok(()) => log::debug!("Revoked object URL {}", self.path.display()),
                Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
            }
        }
    }
}

/// Percent-encode `path` as a `file://` URL. Unreserved characters and
/// `/` pass through.
fn file_url(path: &Path) -> String {
    let mut url = String::from("file://");
    for byte in path_bytes(path).iter().copied() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                url.push(byte as char)
            }
            _ => url.push_str(&format!("%{:02X}", byte)),
        }
    }
    url
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    let normalised = path.to_string_lossy().replace('\\', "/");
    let url_path = if normalised.starts_with('/') {
        normalised
    } else {
        format!("/{}", normalised)
    };
    std::borrow::Cow::Owned(url_path.into_bytes())
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_writes_payload_with_extension() {
        let url = ObjectUrl::create(&[1, 2, 3], AudioMimeType::Ogg).unwrap();
        assert_eq!(std::fs::read(url.path()).unwrap(), vec![1, 2, 3]);
        assert_eq!(url.path().extension().unwrap(), "ogg");
        assert!(url.url().starts_with("file://"));
        assert_eq!(url.mime_type(), AudioMimeType::Ogg);
    }

    #[cfg(unix)]
    #[test]
    fn url_is_percent_encoded() {
        assert_eq!(
            file_url(Path::new("/tmp/my recordings/q1 #2.wav")),
            "file:///tmp/my%20recordings/q1%20%232.wav"
        );
        assert_eq!(file_url(Path::new("/tmp/ispeaker-a_b.wav")), "file:///tmp/ispeaker-a_b.wav");
    }

    #[cfg(unix)]
    #[test]
    fn url_encodes_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/tmp/q\xff.wav"));
        assert_eq!(file_url(path), "file:///tmp/q%FF.wav");
    }

    #[test]
    fn revoke_removes_file() {
        let url = ObjectUrl::create(&[0u8; 16], AudioMimeType::Wav).unwrap();
        let path = url.path().to_path_buf();
        url.revoke();
        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_file() {
        let path = {
            let url = ObjectUrl::create(&[0u8; 16], AudioMimeType::Wav).unwrap();
            url.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
