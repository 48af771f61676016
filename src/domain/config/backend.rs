//! Backend preference value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidBackendError;

/// Which storage backend should service recording operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendPreference {
    /// Use the host API when running inside the desktop shell, else the local store
    #[default]
    Auto,
    /// Always delegate to the host binary API
    Host,
    /// Always use the local object store
    Local,
}

impl BackendPreference {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Host => "host",
            Self::Local => "local",
        }
    }

    /// All accepted values
    pub const fn all() -> &'static [&'static str] {
        &["auto", "host", "local"]
    }
}

impl FromStr for BackendPreference {
    type Err = InvalidBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "host" => Ok(Self::Host),
            "local" => Ok(Self::Local),
            _ => Err(InvalidBackendError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
