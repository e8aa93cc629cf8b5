// ── Appliance sensor entities ──
//
// One sensor per physical appliance, bound to its identity key. A sensor
// holds no data of its own: every render re-reads the scheduler's latest
// snapshot.

use serde::Serialize;
use tokio::sync::watch;

use crate::model::{ApplianceKind, ApplianceRecord};
use crate::scheduler::UpdateState;

/// Entity-id domain prefix.
const ENTITY_DOMAIN: &str = "sensor";

/// A sensor entity for one washer or dryer.
#[derive(Debug, Clone)]
pub struct ApplianceSensor {
    unique_id: String,
    updates: watch::Receiver<UpdateState>,
}

/// Attributes published next to the primary state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorAttributes {
    pub time_remaining: u32,
    #[serde(rename = "type")]
    pub kind: ApplianceKind,
}

/// A rendered sensor, as published to the host's state bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    /// `sensor.<kind>_<channel>`, absent until the key has been seen.
    pub entity_id: Option<String>,
    /// `"<kind> <channel>"`; kept from the last good snapshot while
    /// unavailable.
    pub name: Option<String>,
    pub available: bool,
    /// Upstream status token. `None` while unavailable.
    pub state: Option<String>,
    /// `None` while unavailable.
    pub attributes: Option<SensorAttributes>,
}

impl ApplianceSensor {
    pub(crate) fn new(unique_id: String, updates: watch::Receiver<UpdateState>) -> Self {
        Self { unique_id, updates }
    }

    /// The appliance identity key.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// This appliance's record in the latest good snapshot.
    pub fn record(&self) -> Option<ApplianceRecord> {
        let state = self.updates.borrow();
        state
            .data
            .as_ref()
            .and_then(|snap| snap.get(&self.unique_id))
            .cloned()
    }

    /// Available when the last refresh succeeded and still lists this
    /// appliance.
    pub fn available(&self) -> bool {
        let state = self.updates.borrow();
        state.last_update_success
            && state
                .data
                .as_ref()
                .is_some_and(|snap| snap.contains(&self.unique_id))
    }

    pub fn name(&self) -> Option<String> {
        self.record().map(|r| r.display_name())
    }

    pub fn entity_id(&self) -> Option<String> {
        self.record().map(|r| entity_id_for(&r))
    }

    /// Render the sensor from the latest snapshot.
    pub fn render(&self) -> SensorState {
        let record = self.record();
        let available = self.available();

        SensorState {
            unique_id: self.unique_id.clone(),
            entity_id: record.as_ref().map(entity_id_for),
            name: record.as_ref().map(ApplianceRecord::display_name),
            available,
            state: record
                .as_ref()
                .filter(|_| available)
                .map(|r| r.state.clone()),
            attributes: record
                .as_ref()
                .filter(|_| available)
                .map(|r| SensorAttributes {
                    time_remaining: r.time_remaining,
                    kind: r.kind,
                }),
        }
    }
}

/// `sensor.<kind>_<channel>` with the channel slugified.
pub fn entity_id_for(record: &ApplianceRecord) -> String {
    format!(
        "{ENTITY_DOMAIN}.{}_{}",
        record.kind.label(),
        slugify(&record.channel)
    )
}

/// Lower-case ASCII alphanumerics; runs of anything else become one `_`.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "unnamed".into()
    } else {
        trimmed.to_owned()
    }
}
