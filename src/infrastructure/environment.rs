//! Desktop shell detection

use std::env;

use crate::application::ports::EnvironmentProbe;

/// Variable the desktop shell exports into the processes it launches
pub const HOST_SHELL_ENV: &str = "ISPEAKER_HOST_SHELL";

/// Detects the desktop shell from an environment variable.
///
/// The variable is read on every call, so a shell that appears or goes
/// away mid-run is picked up by the next store operation.
#[derive(Debug, Clone)]
pub struct EnvVarProbe {
    var: String,
}

impl EnvVarProbe {
    pub fn new() -> Self {
        Self::with_var(HOST_SHELL_ENV)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvVarProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentProbe for EnvVarProbe {
    fn is_host_shell(&self) -> bool {
        match env::var(&self.var) {
            Ok(value) => {
                let value = value.trim();
                !value.is_empty() && value != "0"
            }
            Err(_) => false,
        }
    }
}
