//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, logger setup
//! and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod presenter;

// Re-export commonly used types
pub use app::{merge_config, run_command, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{BackendArg, Cli, Commands, ConfigAction, RecordingCommand};
pub use logging::init_logging;
pub use presenter::Presenter;
