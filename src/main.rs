//! iSpeaker recordings CLI entry point

use std::process::ExitCode;

use clap::Parser;

use ispeaker_recordings::application::ports::ConfigStore;
use ispeaker_recordings::cli::{
    app::{merge_config, run_command, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
};
use ispeaker_recordings::domain::config::{AppConfig, BackendPreference};
use ispeaker_recordings::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();
    let store = XdgConfigStore::new();

    let command = match cli.command {
        // Config subcommands work on the file directly
        Commands::Config { action } => {
            init_logging(cli.verbose, AppConfig::defaults().log_level_or_default());
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Commands::Recording(command) => command,
    };

    let (file_config, load_error) = match store.load().await {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::empty(), Some(e)),
    };

    let cli_config = AppConfig {
        backend: cli.backend.map(|b| BackendPreference::from(b).to_string()),
        ..Default::default()
    };
    let config = merge_config(file_config, cli_config);

    init_logging(cli.verbose, config.log_level_or_default());
    if let Some(e) = load_error {
        log::warn!("Ignoring config at {}: {}", store.path().display(), e);
    }

    run_command(command, &config).await
}
