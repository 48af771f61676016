//! Recording key value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidKeyError;

/// Unique, immutable identifier of a stored recording.
///
/// Keys are opaque to the store: anything non-empty without control
/// characters is accepted, so keys written by earlier versions of the app
/// (e.g. `"dictation-q1"`) keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordingKey(String);

impl RecordingKey {
    /// Create a key, validating its content
    pub fn new(key: impl Into<String>) -> Result<Self, InvalidKeyError> {
        let key = key.into();

        if key.trim().is_empty() {
            return Err(InvalidKeyError {
                input: key,
                reason: "Key must not be empty",
            });
        }

        if key.chars().any(char::is_control) {
            return Err(InvalidKeyError {
                input: key,
                reason: "Key must not contain control characters",
            });
        }

        Ok(Self(key))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for RecordingKey {
    type Err = InvalidKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordingKey {
    type Error = InvalidKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for RecordingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
