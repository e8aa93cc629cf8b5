// ── Core error types ──
//
// Refresh failures as the scheduler and entities see them. Consumers
// never handle reqwest or serde errors directly; the
// `From<laundryview_api::Error>` impl folds transport-layer errors into
// the refresh failure taxonomy.

use std::fmt;

use thiserror::Error;

/// Why the upstream could not deliver a usable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableCause {
    /// Non-2xx HTTP status.
    Status(u16),
    /// The request timed out at the shared client's timeout.
    Timeout,
    /// Connection, DNS, TLS or body-read failure.
    Transport(String),
    /// The body was not valid JSON.
    Decode(String),
}

impl fmt::Display for UnavailableCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Timeout => f.write_str("request timed out"),
            Self::Transport(reason) => write!(f, "transport error: {reason}"),
            Self::Decode(reason) => write!(f, "undecodable body: {reason}"),
        }
    }
}

/// A single raw appliance record that cannot be mapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` has an invalid value: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("identity key `{key}` appears more than once")]
    DuplicateIdentity { key: String },
}

impl MalformedRecord {
    /// The offending field, when the failure is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => Some(*field),
            Self::DuplicateIdentity { .. } => Some("appliance_desc_key"),
            Self::NotAnObject => None,
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Refresh failures ─────────────────────────────────────────────
    #[error("Upstream unavailable: {cause}")]
    UpstreamUnavailable { cause: UnavailableCause },

    #[error("Unexpected response shape at `{segment}`: {detail}")]
    UnexpectedResponseShape { segment: String, detail: String },

    #[error("Malformed appliance record at position {index}: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: MalformedRecord,
    },

    // ── Lifecycle ────────────────────────────────────────────────────
    /// The first refresh failed; no entities were created.
    #[error("Integration not ready: {source}")]
    NotReady {
        #[source]
        source: Box<CoreError>,
    },

    #[error("Integration is not set up")]
    NotSetUp,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for failures that only affect a single refresh
    /// (as opposed to setup or configuration problems).
    pub fn is_refresh_failure(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. }
                | Self::UnexpectedResponseShape { .. }
                | Self::MalformedRecord { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<laundryview_api::Error> for CoreError {
    fn from(err: laundryview_api::Error) -> Self {
        match err {
            laundryview_api::Error::Transport(ref e) => {
                let cause = if e.is_timeout() {
                    UnavailableCause::Timeout
                } else if let Some(status) = e.status() {
                    UnavailableCause::Status(status.as_u16())
                } else {
                    UnavailableCause::Transport(e.to_string())
                };
                CoreError::UpstreamUnavailable { cause }
            }
            laundryview_api::Error::Status { status, .. } => CoreError::UpstreamUnavailable {
                cause: UnavailableCause::Status(status),
            },
            laundryview_api::Error::Deserialization { message, body: _ } => {
                CoreError::UpstreamUnavailable {
                    cause: UnavailableCause::Decode(message),
                }
            }
            laundryview_api::Error::UnexpectedShape { segment, detail } => {
                CoreError::UnexpectedResponseShape {
                    segment: segment.into(),
                    detail: detail.into(),
                }
            }
            laundryview_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            laundryview_api::Error::ClientBuild(message) => CoreError::Config { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_upstream_unavailable() {
        let err = CoreError::from(laundryview_api::Error::Status {
            status: 502,
            url: "https://example.test/api/c_room".into(),
        });
        assert!(matches!(
            err,
            CoreError::UpstreamUnavailable {
                cause: UnavailableCause::Status(502)
            }
        ));
        assert!(err.is_refresh_failure());
    }

    #[test]
    fn decode_failure_maps_to_upstream_unavailable() {
        let err = CoreError::from(laundryview_api::Error::Deserialization {
            message: "expected value at line 1 column 1".into(),
            body: "<html>".into(),
        });
        assert!(matches!(
            err,
            CoreError::UpstreamUnavailable {
                cause: UnavailableCause::Decode(_)
            }
        ));
    }

    #[test]
    fn shape_failure_keeps_segment() {
        let err = CoreError::from(laundryview_api::Error::UnexpectedShape {
            segment: "app_data",
            detail: "missing",
        });
        match err {
            CoreError::UnexpectedResponseShape { segment, .. } => assert_eq!(segment, "app_data"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn malformed_record_names_field() {
        let record = MalformedRecord::MissingField {
            field: "lrm_channel",
        };
        assert_eq!(record.field(), Some("lrm_channel"));
        let err = CoreError::MalformedRecord {
            index: 3,
            source: record,
        };
        assert_eq!(
            err.to_string(),
            "Malformed appliance record at position 3: missing required field `lrm_channel`"
        );
    }

    #[test]
    fn not_ready_is_not_a_refresh_failure() {
        let err = CoreError::NotReady {
            source: Box::new(CoreError::UpstreamUnavailable {
                cause: UnavailableCause::Timeout,
            }),
        };
        assert!(!err.is_refresh_failure());
    }
}
