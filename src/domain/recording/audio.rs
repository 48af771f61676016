//! Audio MIME types and the recording entity

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::domain::error::UnsupportedMimeTypeError;

use super::RecordingKey;

/// Supported audio MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMimeType {
    Ogg,
    Mp3,
    Mpeg,
    /// Format written by the desktop shell, and the fallback when nothing is stored
    #[default]
    Wav,
    Webm,
    Mp4,
    Flac,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mp3",
            Self::Mpeg => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Mp4 => "audio/mp4",
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Ogg => "ogg",
            Self::Mp3 | Self::Mpeg => "mp3",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
            Self::Flac => "flac",
        }
    }

    /// Infer the type from a file extension (case-insensitive, without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "mp3" => Some(Self::Mp3),
            "wav" | "wave" => Some(Self::Wav),
            "webm" => Some(Self::Webm),
            "mp4" | "m4a" => Some(Self::Mp4),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    /// Infer the type from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl FromStr for AudioMimeType {
    type Err = UnsupportedMimeTypeError;

    /// Parse a MIME string such as `audio/webm;codecs=opus`.
    /// Parameters are ignored and matching is case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or_default().trim().to_lowercase();

        match essence.as_str() {
            "audio/ogg" | "application/ogg" => Ok(Self::Ogg),
            "audio/mp3" => Ok(Self::Mp3),
            "audio/mpeg" => Ok(Self::Mpeg),
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Ok(Self::Wav),
            "audio/webm" => Ok(Self::Webm),
            "audio/mp4" | "audio/x-m4a" => Ok(Self::Mp4),
            "audio/flac" | "audio/x-flac" => Ok(Self::Flac),
            _ => Err(UnsupportedMimeTypeError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A binary audio payload identified by a unique key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    key: RecordingKey,
    payload: Vec<u8>,
    mime_type: Option<AudioMimeType>,
}

impl Recording {
    /// Create a recording from raw bytes
    pub fn new(key: RecordingKey, payload: Vec<u8>, mime_type: Option<AudioMimeType>) -> Self {
        Self {
            key,
            payload,
            mime_type,
        }
    }

    pub fn key(&self) -> &RecordingKey {
        &self.key
    }

    /// Get the raw audio bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume and return the raw audio bytes
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Stored MIME type, if any was recorded alongside the payload
    pub fn mime_type(&self) -> Option<AudioMimeType> {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.payload.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        format_size(self.size_bytes())
    }
}

/// Byte count in B, KB or MB
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> RecordingKey {
        RecordingKey::new(s).unwrap()
    }

    #[test]
    fn mime_type_as_str() {
        assert_eq!(AudioMimeType::Ogg.as_str(), "audio/ogg");
        assert_eq!(AudioMimeType::Wav.as_str(), "audio/wav");
        assert_eq!(AudioMimeType::Flac.as_str(), "audio/flac");
    }

    #[test]
    fn mime_type_extension() {
        assert_eq!(AudioMimeType::Mpeg.extension(), "mp3");
        assert_eq!(AudioMimeType::Webm.extension(), "webm");
    }

    #[test]
    fn parse_ignores_codec_parameters() {
        let mime: AudioMimeType = "audio/webm;codecs=opus".parse().unwrap();
        assert_eq!(mime, AudioMimeType::Webm);

        let mime: AudioMimeType = " Audio/OGG ; codecs=vorbis".parse().unwrap();
        assert_eq!(mime, AudioMimeType::Ogg);
    }

    #[test]
    fn parse_accepts_wav_aliases() {
        for s in ["audio/wav", "audio/x-wav", "audio/wave"] {
            assert_eq!(s.parse::<AudioMimeType>().unwrap(), AudioMimeType::Wav);
        }
    }

    #[test]
    fn parse_rejects_non_audio() {
        let err = "text/plain".parse::<AudioMimeType>().unwrap_err();
        assert_eq!(err.input, "text/plain");
    }

    #[test]
    fn from_path_uses_extension() {
        assert_eq!(
            AudioMimeType::from_path(Path::new("/tmp/answer.M4A")),
            Some(AudioMimeType::Mp4)
        );
        assert_eq!(AudioMimeType::from_path(Path::new("/tmp/answer")), None);
    }

    #[test]
    fn default_mime_type_is_wav() {
        assert_eq!(AudioMimeType::default(), AudioMimeType::Wav);
    }

    #[test]
    fn recording_accessors() {
        let rec = Recording::new(key("q1"), vec![1, 2, 3], Some(AudioMimeType::Ogg));
        assert_eq!(rec.key().as_str(), "q1");
        assert_eq!(rec.payload(), &[1, 2, 3]);
        assert_eq!(rec.mime_type(), Some(AudioMimeType::Ogg));
        assert_eq!(rec.into_payload(), vec![1, 2, 3]);
    }

    #[test]
    fn human_readable_size_kb() {
        let rec = Recording::new(key("q1"), vec![0u8; 2048], None);
        assert_eq!(rec.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_bytes() {
        let rec = Recording::new(key("q1"), vec![0u8; 500], None);
        assert_eq!(rec.human_readable_size(), "500 B");
    }
}
