// ── Domain model ──
//
// Canonical representation of a laundry room as of one refresh.

pub mod appliance;
pub mod snapshot;

pub use appliance::{ApplianceKind, ApplianceRecord};
pub use snapshot::Snapshot;
