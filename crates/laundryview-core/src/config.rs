// ── Runtime integration configuration ──
//
// These types describe *which* room to poll and *how often*. They never
// touch disk: the CLI (via laundryview-config) builds an
// `IntegrationConfig` and hands it in.

use std::time::Duration;

use laundryview_api::{DEFAULT_BASE_URL, RoomQuery};

/// Default poll cadence.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Default per-request timeout of the shared HTTP client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One configured laundry room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    pub location: String,
    pub room: String,
    /// Room-disambiguation token.
    pub rdm: String,
    /// Phone numbers for notifications. Accepted and carried, but not
    /// used by the refresh logic yet.
    pub user_numbers: Vec<String>,
}

impl RoomConfig {
    pub fn new(
        location: impl Into<String>,
        room: impl Into<String>,
        rdm: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            room: room.into(),
            rdm: rdm.into(),
            user_numbers: Vec::new(),
        }
    }

    /// Attach the free-text, comma-separated phone number list.
    pub fn with_user_numbers(mut self, raw: &str) -> Self {
        self.user_numbers = parse_user_numbers(raw);
        self
    }

    /// Query parameters for the upstream room endpoint.
    pub fn query(&self) -> RoomQuery {
        RoomQuery::new(&self.location, &self.room, &self.rdm)
    }
}

/// Split a comma-separated phone list, dropping blanks.
pub fn parse_user_numbers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Configuration for one integration instance.
///
/// Built by the CLI, passed to [`LaundryRoom`](crate::LaundryRoom).
#[derive(Debug, Clone)]
pub struct IntegrationConfig {
    /// Upstream root, e.g. `https://www.laundryview.com`.
    pub base_url: String,
    pub room: RoomConfig,
    /// Poll cadence. `Duration::ZERO` disables the background refresh.
    pub scan_interval: Duration,
    /// Request timeout of the shared HTTP client.
    pub timeout: Duration,
}

impl IntegrationConfig {
    pub fn new(room: RoomConfig) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            room,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_scan_interval(mut self, scan_interval: Duration) -> Self {
        self.scan_interval = scan_interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
