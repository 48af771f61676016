//! iSpeaker recordings - storage and playback of spoken practice answers
//!
//! This crate persists user audio recordings under string keys and plays
//! them back. Storage goes to the desktop shell's native files when running
//! inside the shell, and to an embedded local database otherwise.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recording keys, payloads, MIME types, config and errors
//! - **Application**: Store and playback use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (SQLite store, host files, rodio, XDG config)
//! - **CLI**: Command-line interface, argument parsing and logger setup

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
