// ── Appliance domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Canonical appliance kind, derived from upstream's one-letter code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ApplianceKind {
    Washer,
    Dryer,
    Unknown,
}

impl ApplianceKind {
    /// `"W"` is a washer, `"D"` a dryer; everything else is unknown.
    pub fn from_code(code: &str) -> Self {
        match code {
            "W" => Self::Washer,
            "D" => Self::Dryer,
            _ => Self::Unknown,
        }
    }

    /// Upper-case display name, as published in the `type` attribute.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Washer => "WASHER",
            Self::Dryer => "DRYER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Lower-case word used in entity names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Washer => "washer",
            Self::Dryer => "dryer",
            Self::Unknown => "unknown",
        }
    }
}

/// One washer or dryer as of a single refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceRecord {
    /// Upstream status token ("available", "inuse", ...), verbatim.
    pub state: String,
    pub kind: ApplianceKind,
    /// Label distinguishing same-kind appliances within a room.
    pub channel: String,
    /// Minutes, as reported upstream.
    pub time_remaining: u32,
    /// Stable upstream id of the physical machine.
    pub identity_key: String,
}

impl ApplianceRecord {
    /// `"<kind> <channel>"`, e.g. `"washer 3"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.kind.label(), self.channel)
    }
}
