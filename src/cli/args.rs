//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::config::BackendPreference;

/// iSpeaker recordings - store and replay spoken answers
#[derive(Parser, Debug)]
#[command(name = "ispeaker-recordings")]
#[command(version)]
#[command(about = "Save, check and replay iSpeaker recordings")]
#[command(long_about = None)]
pub struct Cli {
    /// Storage backend (overrides config and ISPEAKER_BACKEND)
    #[arg(short = 'b', long, value_name = "BACKEND", global = true)]
    pub backend: Option<BackendArg>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Recording(RecordingCommand),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands that operate on the recording store
#[derive(Subcommand, Debug)]
pub enum RecordingCommand {
    /// Store an audio file under a key
    Save {
        /// Recording key
        key: String,
        /// Audio file to store
        file: PathBuf,
        /// MIME type (guessed from the file extension when omitted)
        #[arg(short = 'm', long, value_name = "TYPE")]
        mime: Option<String>,
    },
    /// Check whether a recording exists (exit 1 if not)
    Exists {
        /// Recording key
        key: String,
    },
    /// Play a stored recording (Ctrl+C stops)
    Play {
        /// Recording key
        key: String,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Backend argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Auto,
    Host,
    Local,
}

impl From<BackendArg> for BackendPreference {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendPreference::Auto,
            BackendArg::Host => BackendPreference::Host,
            BackendArg::Local => BackendPreference::Local,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "backend",
    "database_path",
    "host_dir",
    "default_mime_type",
    "poll_interval_ms",
    "audio",
    "log_level",
];

/// Valid log level values
pub const VALID_LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
