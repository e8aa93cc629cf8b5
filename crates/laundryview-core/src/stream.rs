// ── Sensor set subscriptions ──
//
// Push-based view of the registry for hosts that add and remove entities
// as the room's appliance list changes.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::EntitySet;

/// A subscription to the registered sensor set.
///
/// Holds the set seen last; `changed()` waits for the next
/// reconciliation that actually added or removed a sensor.
pub struct SensorStream {
    current: Arc<EntitySet>,
    receiver: watch::Receiver<Arc<EntitySet>>,
}

impl SensorStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<EntitySet>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The set captured at subscription time or at the last `changed()`.
    pub fn current(&self) -> &Arc<EntitySet> {
        &self.current
    }

    /// The registry's set right now.
    pub fn latest(&self) -> Arc<EntitySet> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next entity set change.
    /// Returns `None` once the registry has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<EntitySet>> {
        self.receiver.changed().await.ok()?;
        self.current = self.receiver.borrow_and_update().clone();
        Some(Arc::clone(&self.current))
    }

    /// Yields the current set first, then every subsequent change.
    pub fn into_stream(self) -> WatchStream<Arc<EntitySet>> {
        WatchStream::new(self.receiver)
    }
}
