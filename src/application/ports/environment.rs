//! Runtime environment port

/// Port for detecting whether the process runs inside the desktop shell.
///
/// Implementations must answer from the current environment on every call;
/// the selector never caches the answer.
pub trait EnvironmentProbe: Send + Sync {
    /// True when the host binary API is available
    fn is_host_shell(&self) -> bool;
}
