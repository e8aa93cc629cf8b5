// ── Update scheduler ──
//
// Minimal host-side polling primitive: serialised refreshes, a cached
// last-good snapshot, and `watch`-based fan-out of the update state.
// No retries or backoff; the next tick is the retry.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use crate::coordinator::RefreshSource;
use crate::error::CoreError;
use crate::model::Snapshot;

/// What subscribers see after every refresh attempt.
#[derive(Debug, Clone, Default)]
pub struct UpdateState {
    /// Last successfully fetched snapshot. Kept across failed refreshes.
    pub data: Option<Arc<Snapshot>>,
    /// Whether the most recent attempt succeeded.
    pub last_update_success: bool,
    /// Display text of the most recent failure, cleared on success.
    pub last_error: Option<String>,
    /// When the most recent attempt finished.
    pub last_attempt: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl UpdateState {
    /// `true` once at least one refresh succeeded and the latest did too.
    pub fn is_available(&self) -> bool {
        self.last_update_success && self.data.is_some()
    }
}

/// Runs a [`RefreshSource`] and caches its results.
pub struct UpdateScheduler<S: RefreshSource> {
    source: S,
    interval: Duration,
    state: watch::Sender<UpdateState>,
    in_flight: Mutex<()>,
}

impl<S: RefreshSource> UpdateScheduler<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        let (state, _) = watch::channel(UpdateState::default());
        Self {
            source,
            interval,
            state,
            in_flight: Mutex::new(()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current update state (cheap clone: the snapshot is behind an `Arc`).
    pub fn state(&self) -> UpdateState {
        self.state.borrow().clone()
    }

    /// Subscribe to update state changes.
    pub fn subscribe(&self) -> watch::Receiver<UpdateState> {
        self.state.subscribe()
    }

    /// Latest good snapshot, if any.
    pub fn data(&self) -> Option<Arc<Snapshot>> {
        self.state.borrow().data.clone()
    }

    /// The refresh that gates setup.
    ///
    /// Any failure is wrapped in [`CoreError::NotReady`] so callers can
    /// tell it apart from a failure after entities already exist.
    pub async fn first_refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.refresh().await.map_err(|e| CoreError::NotReady {
            source: Box::new(e),
        })
    }

    /// Run one refresh and publish the outcome.
    ///
    /// Concurrent callers queue behind the one in flight. On failure the
    /// previous snapshot stays cached but the state is marked failed.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _guard = self.in_flight.lock().await;

        match self.source.refresh().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                let published = Arc::clone(&snapshot);
                self.state.send_modify(|state| {
                    state.data = Some(published);
                    state.last_update_success = true;
                    state.last_error = None;
                    state.last_attempt = Some(Utc::now());
                    state.consecutive_failures = 0;
                });
                debug!(
                    appliances = snapshot.len(),
                    fetched_at = %snapshot.fetched_at(),
                    "refresh published"
                );
                Ok(snapshot)
            }
            Err(e) => {
                let message = e.to_string();
                self.state.send_modify(|state| {
                    state.last_update_success = false;
                    state.last_error = Some(message);
                    state.last_attempt = Some(Utc::now());
                    state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                });
                warn!(
                    error = %e,
                    failures = self.state.borrow().consecutive_failures,
                    "refresh failed"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::error::UnavailableCause;
    use crate::model::{ApplianceKind, ApplianceRecord};

    /// Replays a scripted sequence of outcomes.
    struct Scripted {
        outcomes: StdMutex<Vec<Result<Vec<&'static str>, u16>>>,
    }

    impl Scripted {
        fn new(mut outcomes: Vec<Result<Vec<&'static str>, u16>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: StdMutex::new(outcomes),
            }
        }
    }

    impl RefreshSource for Scripted {
        async fn refresh(&self) -> Result<Snapshot, CoreError> {
            let next = self.outcomes.lock().unwrap().pop().unwrap();
            match next {
                Ok(keys) => Ok(Snapshot::from_records(
                    keys.into_iter()
                        .map(|k| ApplianceRecord {
                            state: "available".into(),
                            kind: ApplianceKind::Washer,
                            channel: k.into(),
                            time_remaining: 0,
                            identity_key: k.into(),
                        })
                        .collect(),
                )
                .unwrap()),
                Err(status) => Err(CoreError::UpstreamUnavailable {
                    cause: UnavailableCause::Status(status),
                }),
            }
        }
    }

    #[tokio::test]
    async fn first_refresh_failure_is_not_ready() {
        let scheduler = UpdateScheduler::new(Scripted::new(vec![Err(500)]), Duration::ZERO);
        let err = scheduler.first_refresh().await.unwrap_err();
        assert!(matches!(err, CoreError::NotReady { .. }));
        assert!(scheduler.data().is_none());
        assert!(!scheduler.state().is_available());
    }

    #[tokio::test]
    async fn failure_keeps_last_good_snapshot() {
        let scheduler = UpdateScheduler::new(
            Scripted::new(vec![Ok(vec!["a", "b"]), Err(503)]),
            Duration::ZERO,
        );
        scheduler.first_refresh().await.unwrap();
        assert!(scheduler.refresh().await.is_err());

        let state = scheduler.state();
        assert!(!state.last_update_success);
        assert_eq!(state.consecutive_failures, 1);
        assert_eq!(state.data.unwrap().len(), 2);
        assert!(state.last_error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn success_clears_failure_state() {
        let scheduler = UpdateScheduler::new(
            Scripted::new(vec![Err(500), Err(500), Ok(vec!["a"])]),
            Duration::ZERO,
        );
        let _ = scheduler.refresh().await;
        let _ = scheduler.refresh().await;
        assert_eq!(scheduler.state().consecutive_failures, 2);

        scheduler.refresh().await.unwrap();
        let state = scheduler.state();
        assert!(state.is_available());
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn subscribers_observe_each_attempt() {
        let scheduler = UpdateScheduler::new(
            Scripted::new(vec![Ok(vec!["a"]), Err(500)]),
            Duration::ZERO,
        );
        let mut rx = scheduler.subscribe();

        scheduler.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().last_update_success);

        let _ = scheduler.refresh().await;
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().last_update_success);
    }
}
