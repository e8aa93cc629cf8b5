use thiserror::Error;

/// Top-level error type for the `laundryview-api` crate.
///
/// Covers every way a room status request can go wrong: building the
/// client, reaching the upstream host, a non-success status, an
/// undecodable body, or a body that decodes but lacks the room envelope.
/// `laundryview-core` maps these into its refresh failure taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Upstream ────────────────────────────────────────────────────
    /// Upstream answered with a non-2xx status.
    #[error("Upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body was not valid JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Body decoded, but the `lRoom -> app_data` path is missing or has
    /// the wrong JSON type at `segment`.
    #[error("Unexpected response shape at `{segment}`: {detail}")]
    UnexpectedShape {
        segment: &'static str,
        detail: &'static str,
    },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next scheduled poll.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
