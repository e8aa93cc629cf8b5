//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use laundryview_config::ConfigError;
use laundryview_core::{CoreError, UnavailableCause};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const DATA: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Upstream ─────────────────────────────────────────────────────
    #[error("Could not reach the laundry room service: {reason}")]
    #[diagnostic(
        code(laundryview::unavailable),
        help(
            "Check your network connection and the configured base_url.\n\
             Re-run with -v for request details."
        )
    )]
    Unavailable { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(laundryview::timeout),
        help("Increase timeout with --timeout or defaults.timeout_secs.")
    )]
    Timeout,

    #[error("The service returned an unexpected response: {reason}")]
    #[diagnostic(
        code(laundryview::bad_response),
        help("Check that location, room and rdm identify a real room.")
    )]
    BadResponse { reason: String },

    #[error("Room not ready: {reason}")]
    #[diagnostic(
        code(laundryview::not_ready),
        help("The first refresh failed, so no appliances were registered. Try again shortly.")
    )]
    NotReady { reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No laundry room configured")]
    #[diagnostic(
        code(laundryview::no_room),
        help(
            "Add one with: laundryview config set-room <name> --location <loc> --room <room> --rdm <rdm>\n\
             Config file: {path}"
        )
    )]
    NoRoom { path: String },

    #[error("Room '{name}' not found in configuration")]
    #[diagnostic(
        code(laundryview::room_not_found),
        help("Available rooms: {available}")
    )]
    RoomNotFound { name: String, available: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(laundryview::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(laundryview::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(laundryview::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unavailable { .. } | Self::NotReady { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::BadResponse { .. } => exit_code::DATA,
            Self::Validation { .. } | Self::RoomNotFound { .. } | Self::NoRoom { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UpstreamUnavailable {
                cause: UnavailableCause::Timeout,
            } => CliError::Timeout,

            CoreError::UpstreamUnavailable { cause } => CliError::Unavailable {
                reason: cause.to_string(),
            },

            err @ (CoreError::UnexpectedResponseShape { .. }
            | CoreError::MalformedRecord { .. }) => CliError::BadResponse {
                reason: err.to_string(),
            },

            // The first refresh failed: keep timeouts and bad data distinct,
            // everything else is a connection-level "not ready".
            CoreError::NotReady { source } => match *source {
                inner @ (CoreError::UpstreamUnavailable {
                    cause: UnavailableCause::Timeout,
                }
                | CoreError::UnexpectedResponseShape { .. }
                | CoreError::MalformedRecord { .. }) => CliError::from(inner),
                inner => CliError::NotReady {
                    reason: inner.to_string(),
                },
            },

            CoreError::NotSetUp => CliError::NotReady {
                reason: "integration is not set up".into(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoRoom => CliError::NoRoom {
                path: laundryview_config::config_path().display().to_string(),
            },
            ConfigError::UnknownRoom { name } => CliError::RoomNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}
