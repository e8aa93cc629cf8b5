//! Command dispatch: resolves the room profile, then hands the
//! integration config to the room-bound handlers.

pub mod config_cmd;
pub mod status;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use laundryview_config::{self as config, Config};
use laundryview_core::IntegrationConfig;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

/// Config file in effect: `--config` or the platform default.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(config::load_config_from(&active_config_path(global))?)
}

/// Build an `IntegrationConfig` for the selected room, applying CLI
/// overrides on top of the profile.
pub fn build_integration_config(
    global: &GlobalOpts,
    interval_override: Option<u64>,
) -> Result<(String, IntegrationConfig), CliError> {
    let cfg = load(global)?;
    let (name, profile) = cfg.resolve_room(global.room.as_deref()).map_err(|e| match e {
        config::ConfigError::NoRoom => CliError::NoRoom {
            path: active_config_path(global).display().to_string(),
        },
        config::ConfigError::UnknownRoom { name } => CliError::RoomNotFound {
            name,
            available: cfg.rooms.keys().cloned().collect::<Vec<_>>().join(", "),
        },
        other => other.into(),
    })?;

    let mut profile = profile.clone();
    if let Some(secs) = interval_override {
        profile.scan_interval_secs = Some(secs);
    }
    let mut integration = config::profile_to_integration_config(name, &profile, &cfg.defaults)?;

    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "--timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        integration.timeout = Duration::from_secs(secs);
    }

    Ok((name.to_owned(), integration))
}

/// Dispatch a command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(global).await,
        Command::Watch(args) => watch::handle(args, global).await,
        // Config commands don't need a room connection
        Command::Config(args) => config_cmd::handle(args, global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "laundryview", &mut std::io::stdout());
            Ok(())
        }
    }
}
