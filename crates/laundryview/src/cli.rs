//! Clap derive structures for the `laundryview` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// laundryview -- washer and dryer status for a LaundryView room
#[derive(Debug, Parser)]
#[command(
    name = "laundryview",
    version,
    about = "Show washer and dryer status for a LaundryView laundry room",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configured room to use
    #[arg(long, short = 'r', env = "LAUNDRYVIEW_ROOM", global = true)]
    pub room: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "LAUNDRYVIEW_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LAUNDRYVIEW_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "LAUNDRYVIEW_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one sensor per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the room once and print every appliance
    #[command(alias = "st")]
    Status,

    /// Poll the room and print appliance states after every refresh
    Watch(WatchArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in seconds (overrides config; 60-600)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration
    Show,

    /// List configured rooms
    Rooms,

    /// Add or replace a room
    SetRoom(SetRoomArgs),

    /// Make a room the default
    Use {
        /// Room name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct SetRoomArgs {
    /// Room name used with --room
    pub name: String,

    /// Site / building code
    #[arg(long)]
    pub location: String,

    /// Room code
    #[arg(long)]
    pub room: String,

    /// Room-disambiguation token
    #[arg(long)]
    pub rdm: String,

    /// Comma-separated phone numbers for notifications
    #[arg(long)]
    pub user_numbers: Option<String>,

    /// Poll interval for this room in seconds (60-600)
    #[arg(long)]
    pub scan_interval: Option<u64>,

    /// Also make this the default room
    #[arg(long)]
    pub default: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
