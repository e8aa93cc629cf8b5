// ── LaundryRoom integration ──
//
// Full lifecycle of one configured room: first refresh gating setup,
// keyed entity registration, background refresh, and shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use laundryview_api::{RoomClient, TransportConfig};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::IntegrationConfig;
use crate::coordinator::RefreshCoordinator;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::scheduler::{UpdateScheduler, UpdateState};
use crate::sensor::{ApplianceSensor, SensorState};
use crate::store::{EntityRegistry, EntitySet, RegistryChange};
use crate::stream::SensorStream;

// ── SetupState ───────────────────────────────────────────────────

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupState {
    NotLoaded,
    SetupInProgress,
    Loaded,
    /// First refresh failed; no entities exist. Setup may be retried.
    NotReady { reason: String },
    Unloaded,
}

// ── LaundryRoom ──────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<LaundryRoomInner>`.
#[derive(Clone)]
pub struct LaundryRoom {
    inner: Arc<LaundryRoomInner>,
}

struct LaundryRoomInner {
    config: IntegrationConfig,
    scheduler: UpdateScheduler<RefreshCoordinator>,
    registry: EntityRegistry,
    setup_state: watch::Sender<SetupState>,
    tasks: Mutex<BackgroundTasks>,
}

/// Background refresh tasks of the current setup, with the token that
/// stops them. A fresh token is issued when setup runs after shutdown.
#[derive(Default)]
struct BackgroundTasks {
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl LaundryRoom {
    /// Build the shared HTTP client and coordinator. Does NOT fetch --
    /// call [`setup()`](Self::setup) for that.
    pub fn new(config: IntegrationConfig) -> Result<Self, CoreError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| CoreError::Config {
            message: format!("invalid base URL {:?}: {e}", config.base_url),
        })?;
        let transport = TransportConfig::with_timeout(config.timeout);
        let client = RoomClient::new(base_url, &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Use a host-owned [`RoomClient`] instead of building one.
    pub fn with_client(config: IntegrationConfig, client: RoomClient) -> Self {
        let coordinator = RefreshCoordinator::new(client, &config.room);
        let scheduler = UpdateScheduler::new(coordinator, config.scan_interval);
        let registry = EntityRegistry::new(scheduler.subscribe());
        let (setup_state, _) = watch::channel(SetupState::NotLoaded);

        Self {
            inner: Arc::new(LaundryRoomInner {
                config,
                scheduler,
                registry,
                setup_state,
                tasks: Mutex::new(BackgroundTasks::default()),
            }),
        }
    }

    pub fn config(&self) -> &IntegrationConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Set the integration up.
    ///
    /// Runs the first refresh; if it fails, returns [`CoreError::NotReady`]
    /// and creates no entities. Otherwise registers one sensor per
    /// appliance and spawns the periodic refresh task. Concurrent calls are
    /// serialised; setting up again after [`shutdown()`](Self::shutdown)
    /// starts a new refresh task.
    pub async fn setup(&self) -> Result<(), CoreError> {
        let mut tasks = self.inner.tasks.lock().await;
        if *self.inner.setup_state.borrow() == SetupState::Loaded {
            return Ok(());
        }
        if tasks.cancel.is_cancelled() {
            tasks.cancel = CancellationToken::new();
        }
        self.inner.setup_state.send_replace(SetupState::SetupInProgress);

        let snapshot = match self.inner.scheduler.first_refresh().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "first refresh failed; integration not ready");
                self.inner.setup_state.send_replace(SetupState::NotReady {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };

        self.inner.registry.sync(&snapshot);

        let interval = self.inner.scheduler.interval();
        if !interval.is_zero() {
            let room = self.clone();
            let cancel = tasks.cancel.clone();
            tasks
                .handles
                .push(tokio::spawn(refresh_task(room, interval, cancel)));
        }

        // Published before the lock is released so the task's first tick
        // already sees the integration as loaded.
        self.inner.setup_state.send_replace(SetupState::Loaded);
        info!(
            location = %self.inner.config.room.location,
            room = %self.inner.config.room.room,
            entities = self.inner.registry.len(),
            "laundry room set up"
        );
        Ok(())
    }

    /// Stop the background refresh and mark the integration unloaded.
    pub async fn shutdown(&self) {
        let mut tasks = self.inner.tasks.lock().await;
        tasks.cancel.cancel();
        for handle in tasks.handles.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "refresh task ended abnormally");
            }
        }

        self.inner.setup_state.send_replace(SetupState::Unloaded);
        debug!("laundry room unloaded");
    }

    /// Refresh now, outside the schedule.
    ///
    /// On success the entity set is reconciled with the new snapshot. On
    /// failure existing entities stay registered and render unavailable.
    pub async fn refresh_now(&self) -> Result<RegistryChange, CoreError> {
        if *self.inner.setup_state.borrow() != SetupState::Loaded {
            return Err(CoreError::NotSetUp);
        }
        let snapshot = self.inner.scheduler.refresh().await?;
        // Reconcile against whatever is newest, in case another refresh
        // published after this one.
        let latest = self.inner.scheduler.data().unwrap_or(snapshot);
        Ok(self.inner.registry.sync(&latest))
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: set up without a background task, run closure, shut down.
    pub async fn oneshot<F, Fut, T>(config: IntegrationConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(LaundryRoom) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let config = IntegrationConfig {
            scan_interval: Duration::ZERO,
            ..config
        };
        let room = LaundryRoom::new(config)?;
        room.setup().await?;
        let result = f(room.clone()).await;
        room.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    pub fn setup_state(&self) -> SetupState {
        self.inner.setup_state.borrow().clone()
    }

    pub fn subscribe_setup_state(&self) -> watch::Receiver<SetupState> {
        self.inner.setup_state.subscribe()
    }

    /// Latest scheduler state.
    pub fn state(&self) -> UpdateState {
        self.inner.scheduler.state()
    }

    /// Subscribe to refresh outcomes.
    pub fn subscribe_state(&self) -> watch::Receiver<UpdateState> {
        self.inner.scheduler.subscribe()
    }

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.scheduler.data()
    }

    // ── Entities ─────────────────────────────────────────────────

    pub fn entities(&self) -> Arc<EntitySet> {
        self.inner.registry.sensors()
    }

    pub fn entity(&self, unique_id: &str) -> Option<Arc<ApplianceSensor>> {
        self.inner.registry.get(unique_id)
    }

    pub fn entity_count(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn subscribe_entities(&self) -> SensorStream {
        self.inner.registry.subscribe()
    }

    /// Render every sensor, in upstream list order.
    pub fn render_all(&self) -> Vec<SensorState> {
        let snapshot = self.snapshot();
        let position = |id: &str| {
            snapshot
                .as_ref()
                .and_then(|s| s.position(id))
                .unwrap_or(usize::MAX)
        };

        let mut sensors: Vec<Arc<ApplianceSensor>> = self.entities().iter().cloned().collect();
        sensors.sort_by_key(|s| position(s.unique_id()));
        sensors.iter().map(|s| s.render()).collect()
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh until cancelled.
async fn refresh_task(room: LaundryRoom, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                match room.refresh_now().await {
                    // Already reported by the scheduler; entities render unavailable.
                    Err(e) if e.is_refresh_failure() => debug!(error = %e, "periodic refresh failed"),
                    Err(e) => warn!(error = %e, "periodic refresh skipped"),
                    Ok(_) => {}
                }
            }
        }
    }
}
