// ── Entity registry ──
//
// Sensor entities keyed by appliance identity key. The entity set follows
// the keys in each successful snapshot: new keys get a sensor, vanished
// keys lose theirs. Failed refreshes never touch the registry.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::info;

use crate::model::Snapshot;
use crate::scheduler::UpdateState;
use crate::sensor::ApplianceSensor;
use crate::stream::SensorStream;

/// Keys added and removed by one [`EntityRegistry::sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryChange {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl RegistryChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Point-in-time view of the registered sensors, ordered by identity key.
#[derive(Debug, Default)]
pub struct EntitySet {
    generation: u64,
    sensors: Vec<Arc<ApplianceSensor>>,
}

impl EntitySet {
    /// Bumped every time a reconciliation adds or removes a sensor.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ApplianceSensor>> {
        self.sensors.iter()
    }

    pub fn get(&self, unique_id: &str) -> Option<&Arc<ApplianceSensor>> {
        self.sensors
            .binary_search_by(|s| s.unique_id().cmp(unique_id))
            .ok()
            .and_then(|i| self.sensors.get(i))
    }
}

pub struct EntityRegistry {
    by_key: DashMap<String, Arc<ApplianceSensor>>,
    published: watch::Sender<Arc<EntitySet>>,
    updates: watch::Receiver<UpdateState>,
}

impl EntityRegistry {
    /// New, empty registry whose sensors will read from `updates`.
    pub fn new(updates: watch::Receiver<UpdateState>) -> Self {
        let (published, _) = watch::channel(Arc::new(EntitySet::default()));
        Self {
            by_key: DashMap::new(),
            published,
            updates,
        }
    }

    /// Reconcile the entity set with a successful snapshot.
    ///
    /// Runs under the publish lock, so concurrent syncs apply one at a
    /// time and subscribers are woken once per effective change.
    pub fn sync(&self, snapshot: &Snapshot) -> RegistryChange {
        let mut change = RegistryChange::default();

        self.published.send_if_modified(|set| {
            for key in snapshot.keys() {
                if !self.by_key.contains_key(key) {
                    let sensor = ApplianceSensor::new(key.to_owned(), self.updates.clone());
                    self.by_key.insert(key.to_owned(), Arc::new(sensor));
                    change.added.push(key.to_owned());
                }
            }

            let mut vanished: Vec<String> = self
                .by_key
                .iter()
                .filter(|entry| !snapshot.contains(entry.key()))
                .map(|entry| entry.key().clone())
                .collect();
            vanished.sort_unstable();
            for key in vanished {
                if self.by_key.remove(&key).is_some() {
                    change.removed.push(key);
                }
            }

            if change.is_empty() {
                return false;
            }

            let mut sensors: Vec<Arc<ApplianceSensor>> =
                self.by_key.iter().map(|e| Arc::clone(e.value())).collect();
            sensors.sort_unstable_by(|a, b| a.unique_id().cmp(b.unique_id()));
            *set = Arc::new(EntitySet {
                generation: set.generation + 1,
                sensors,
            });
            true
        });

        if !change.is_empty() {
            info!(
                added = change.added.len(),
                removed = change.removed.len(),
                total = self.by_key.len(),
                "entity set changed"
            );
        }

        change
    }

    /// All sensors, ordered by identity key.
    pub fn sensors(&self) -> Arc<EntitySet> {
        self.published.borrow().clone()
    }

    pub fn get(&self, unique_id: &str) -> Option<Arc<ApplianceSensor>> {
        self.by_key.get(unique_id).map(|r| Arc::clone(r.value()))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Subscribe to entity set changes (additions and removals).
    pub fn subscribe(&self) -> SensorStream {
        SensorStream::new(self.published.subscribe())
    }
}
