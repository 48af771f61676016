//! CLI presenter for output formatting

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::PlaybackStarted;
use crate::domain::recording::format_size;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Start a spinner with message. The caller finishes it.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&self, spinner: &ProgressBar, message: &str) {
        // Hidden spinners (stderr not a terminal) would swallow the message
        if spinner.is_hidden() {
            spinner.finish_and_clear();
            self.success(message);
        } else {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&self, spinner: &ProgressBar, message: &str) {
        if spinner.is_hidden() {
            spinner.finish_and_clear();
            self.error(message);
        } else {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (machine-readable results)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Spinner line shown while a recording plays
    pub fn format_playing(&self, started: &PlaybackStarted) -> String {
        format!(
            "Playing '{}' ({}, {}, {})",
            started.key,
            format_size(started.size_bytes),
            started.mime_type,
            started.path
        )
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
