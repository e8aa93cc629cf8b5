// ── Refresh coordinator ──
//
// Fetch one room, map every record, and hand back a complete snapshot or
// nothing. Scheduling, retries and state fan-out belong to the
// `UpdateScheduler`; this module only supplies the fetch function.

use std::future::Future;

use laundryview_api::{RoomClient, RoomQuery};
use tracing::{debug, warn};

use crate::config::RoomConfig;
use crate::convert::map_record;
use crate::error::CoreError;
use crate::model::{ApplianceRecord, Snapshot};

/// Anything that can produce a fresh [`Snapshot`] on demand.
///
/// This is the seam between the scheduler and the data source: the
/// scheduler owns timing and state, the source owns I/O and mapping.
pub trait RefreshSource: Send + Sync + 'static {
    fn refresh(&self) -> impl Future<Output = Result<Snapshot, CoreError>> + Send;
}

/// Polls a single laundry room.
///
/// Borrows a shared [`RoomClient`]; timeouts come from that client.
#[derive(Debug, Clone)]
pub struct RefreshCoordinator {
    client: RoomClient,
    query: RoomQuery,
    notification_targets: Vec<String>,
}

impl RefreshCoordinator {
    pub fn new(client: RoomClient, room: &RoomConfig) -> Self {
        Self {
            client,
            query: room.query(),
            notification_targets: room.user_numbers.clone(),
        }
    }

    pub fn query(&self) -> &RoomQuery {
        &self.query
    }

    /// Fetch and map the room's appliance list.
    ///
    /// Fail-atomic: a single unmappable record aborts the whole refresh.
    pub async fn refresh(&self) -> Result<Snapshot, CoreError> {
        if !self.notification_targets.is_empty() {
            debug!(
                targets = self.notification_targets.len(),
                "notification targets configured but not dispatched"
            );
        }

        let raw = self.client.fetch_room(&self.query).await.map_err(|e| {
            debug!(
                transient = e.is_transient(),
                status = ?e.status(),
                error = %e,
                "room fetch failed"
            );
            CoreError::from(e)
        })?;

        let records = raw
            .iter()
            .enumerate()
            .map(|(index, value)| {
                map_record(value).map_err(|source| {
                    warn!(index, error = %source, "malformed appliance record");
                    CoreError::MalformedRecord { index, source }
                })
            })
            .collect::<Result<Vec<ApplianceRecord>, CoreError>>()?;

        let snapshot = Snapshot::from_records(records)
            .map_err(|(index, source)| CoreError::MalformedRecord { index, source })?;

        debug!(
            location = %self.query.location,
            room = %self.query.room,
            appliances = snapshot.len(),
            "room refresh mapped"
        );

        Ok(snapshot)
    }
}

impl RefreshSource for RefreshCoordinator {
    fn refresh(&self) -> impl Future<Output = Result<Snapshot, CoreError>> + Send {
        RefreshCoordinator::refresh(self)
    }
}
