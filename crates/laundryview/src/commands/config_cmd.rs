//! Config subcommand handlers.

use std::fmt::Write;

use laundryview_config::{self as config, Config, RoomProfile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, SetRoomArgs};
use crate::error::CliError;
use crate::output;

use super::{active_config_path, load};

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking phone numbers.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_room {
        let _ = writeln!(out, "default_room = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(
        out,
        "scan_interval_secs = {}",
        cfg.defaults.scan_interval_secs
    );
    let _ = writeln!(out, "timeout_secs = {}", cfg.defaults.timeout_secs);
    let _ = writeln!(out, "base_url = \"{}\"", cfg.defaults.base_url);

    for (name, room) in &cfg.rooms {
        let _ = writeln!(out);
        let _ = writeln!(out, "[rooms.{name}]");
        let _ = writeln!(out, "location = \"{}\"", room.location);
        let _ = writeln!(out, "room = \"{}\"", room.room);
        let _ = writeln!(out, "rdm = \"{}\"", room.rdm);
        if let Some(ref numbers) = room.user_numbers {
            let count = laundryview_core::config::parse_user_numbers(numbers).len();
            let _ = writeln!(out, "user_numbers = \"**** ({count})\"");
        }
        if let Some(secs) = room.scan_interval_secs {
            let _ = writeln!(out, "scan_interval_secs = {secs}");
        }
    }

    out
}

fn save(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    config::save_config_to(cfg, &active_config_path(global))?;
    Ok(())
}

fn set_room(args: SetRoomArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load(global)?;

    let profile = RoomProfile {
        location: args.location,
        room: args.room,
        rdm: args.rdm,
        user_numbers: args.user_numbers,
        scan_interval_secs: args.scan_interval,
    };
    config::validate_room(&args.name, &profile, &cfg.defaults)?;

    let first = cfg.rooms.is_empty();
    cfg.rooms.insert(args.name.clone(), profile);
    if args.default || first {
        cfg.default_room = Some(args.name.clone());
    }
    save(&cfg, global)?;

    if !global.quiet {
        eprintln!("Room '{}' saved", args.name);
    }
    Ok(())
}

fn use_room(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = load(global)?;
    if !cfg.rooms.contains_key(name) {
        return Err(CliError::RoomNotFound {
            name: name.into(),
            available: cfg.rooms.keys().cloned().collect::<Vec<_>>().join(", "),
        });
    }
    cfg.default_room = Some(name.into());
    save(&cfg, global)?;

    if !global.quiet {
        eprintln!("Default room set to '{name}'");
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&active_config_path(global).display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load(global)?;
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Rooms => {
            let cfg = load(global)?;
            let lines: Vec<String> = cfg
                .rooms
                .keys()
                .map(|name| {
                    if cfg.default_room.as_deref() == Some(name.as_str()) {
                        format!("{name} (default)")
                    } else {
                        name.clone()
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::SetRoom(args) => set_room(args, global),

        ConfigCommand::Use { name } => use_room(&name, global),
    }
}
