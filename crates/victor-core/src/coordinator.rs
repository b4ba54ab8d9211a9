// ── Polling coordinator ──
//
// Owns the refresh cycle: fetch the trap list, diff the id set against
// the previous snapshot, publish the new snapshot, and classify
// failures into the two external signals. One poll in flight at a time;
// the API session is held behind a mutex for the duration of a cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use victor_api::{VictorApi, VictorClient};

use crate::config::PollerConfig;
use crate::error::{CoreError, UpdateError};
use crate::snapshot::TrapSnapshot;

const EVENT_CHANNEL_SIZE: usize = 64;

/// Coordinator lifecycle state.
///
/// `Idle` until the first successful poll, `HasData` after it,
/// `Closed` terminally once [`Coordinator::close`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    HasData,
    Closed,
}

/// Signals raised by the coordinator.
///
/// `DataUpdated` fires after every successful refresh. `TrapListChanged`
/// fires only when the sorted id set differs from the previous poll --
/// it is the trigger for a full host-side reconfiguration, which is why
/// it is distinct from the routine data notification.
#[derive(Debug, Clone)]
pub enum CoordinatorEvent {
    DataUpdated { snapshot: TrapSnapshot },
    TrapListChanged {
        previous_ids: Vec<i64>,
        current_ids: Vec<i64>,
    },
    AuthFailed { error: UpdateError },
    UpdateFailed { error: UpdateError },
}

/// The polling coordinator.
///
/// Cheaply cloneable via `Arc`. Owns its API session exclusively; the
/// session is dropped exactly once when the coordinator closes.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: PollerConfig,
    /// `None` once closed. The guard is held across a fetch cycle, so
    /// polls are serialized and close waits for an in-flight poll.
    api: Mutex<Option<VictorApi>>,
    data_tx: watch::Sender<Option<TrapSnapshot>>,
    event_tx: broadcast::Sender<CoordinatorEvent>,
    cancel: CancellationToken,
    poll_handle: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl Coordinator {
    /// Create a coordinator with its own API session.
    ///
    /// Validates the configuration and constructs the session up front --
    /// empty credentials fail here, not on the first poll.
    pub fn new(config: PollerConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let password = config.password.clone();
        let client = match &config.base_url {
            Some(url) => VictorClient::with_base_url(&config.username, password, url.clone()),
            None => VictorClient::new(&config.username, password),
        }
        .map_err(|e| CoreError::Config {
            message: e.to_string(),
        })?;

        Self::with_api(config, VictorApi::new(client))
    }

    /// Create a coordinator around a pre-built API handle (custom
    /// unknown-field policy, shared test fixtures).
    pub fn with_api(config: PollerConfig, api: VictorApi) -> Result<Self, CoreError> {
        config.validate()?;

        let (data_tx, _) = watch::channel(None);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                api: Mutex::new(Some(api)),
                data_tx,
                event_tx,
                cancel: CancellationToken::new(),
                poll_handle: Mutex::new(None),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// The configuration this coordinator runs with.
    pub fn config(&self) -> &PollerConfig {
        &self.inner.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoordinatorState {
        if self.inner.closed.load(Ordering::SeqCst) {
            CoordinatorState::Closed
        } else if self.inner.data_tx.borrow().is_some() {
            CoordinatorState::HasData
        } else {
            CoordinatorState::Idle
        }
    }

    /// The snapshot from the last successful poll, if any.
    ///
    /// Retained across failed polls so consumers keep serving
    /// stale-but-valid data through a transient outage.
    pub fn snapshot(&self) -> Option<TrapSnapshot> {
        self.inner.data_tx.borrow().clone()
    }

    /// Subscribe to the current snapshot. Updated after every
    /// successful refresh, whether or not the trap list changed.
    pub fn data(&self) -> watch::Receiver<Option<TrapSnapshot>> {
        self.inner.data_tx.subscribe()
    }

    /// Subscribe to coordinator events.
    pub fn events(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.inner.event_tx.subscribe()
    }

    // ── Refresh cycle ────────────────────────────────────────────────

    /// Run one fetch cycle. No-op once closed.
    ///
    /// A cycle either fully replaces the snapshot or leaves the prior
    /// snapshot untouched -- there is no partial-refresh state.
    pub async fn refresh(&self) -> Result<(), UpdateError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            debug!("refresh requested after close, ignoring");
            return Ok(());
        }

        let guard = self.inner.api.lock().await;
        let Some(api) = guard.as_ref() else {
            // Closed while we waited for the lock.
            return Ok(());
        };
        let result = api.traps().await;
        drop(guard);

        match result {
            Ok(traps) => {
                self.apply(TrapSnapshot::new(traps));
                Ok(())
            }
            Err(e) => {
                let error = UpdateError::from(e);
                let event = match &error {
                    UpdateError::AuthFailed { .. } => {
                        warn!(error = %error, "credentials rejected, host must re-authenticate");
                        CoordinatorEvent::AuthFailed {
                            error: error.clone(),
                        }
                    }
                    UpdateError::UpdateFailed { .. } => {
                        warn!(error = %error, "refresh failed, keeping previous snapshot");
                        CoordinatorEvent::UpdateFailed {
                            error: error.clone(),
                        }
                    }
                };
                let _ = self.inner.event_tx.send(event);
                Err(error)
            }
        }
    }

    fn apply(&self, snapshot: TrapSnapshot) {
        let current_ids = snapshot.sorted_ids();
        debug!(ids = ?current_ids, "received traps from the API");

        let previous = self.inner.data_tx.borrow().clone();
        if let Some(previous) = previous {
            let previous_ids = previous.sorted_ids();
            if previous_ids != current_ids {
                info!(?previous_ids, ?current_ids, "trap list has changed");
                let _ = self.inner.event_tx.send(CoordinatorEvent::TrapListChanged {
                    previous_ids,
                    current_ids,
                });
            }
        }

        let _ = self.inner.data_tx.send(Some(snapshot.clone()));
        let _ = self
            .inner
            .event_tx
            .send(CoordinatorEvent::DataUpdated { snapshot });
    }

    // ── Background polling ───────────────────────────────────────────

    /// Spawn the periodic refresh task at the configured interval.
    ///
    /// Does nothing if polling is already running or the coordinator is
    /// closed. The task runs one poll at a time; a slow poll delays the
    /// next tick rather than overlapping it.
    pub async fn start(&self) {
        if self.inner.closed.load(Ordering::SeqCst) {
            return;
        }

        let mut handle = self.inner.poll_handle.lock().await;
        if handle.is_some() {
            return;
        }

        let coordinator = self.clone();
        let period = self.inner.config.update_interval();
        let cancel = self.inner.cancel.clone();
        *handle = Some(tokio::spawn(poll_task(coordinator, period, cancel)));
    }

    /// Close the coordinator. Idempotent.
    ///
    /// Cancels the polling task, waits for any in-flight poll, and drops
    /// the API session exactly once. Further refresh requests are no-ops.
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        self.inner.cancel.cancel();

        if let Some(handle) = self.inner.poll_handle.lock().await.take() {
            let _ = handle.await;
        }

        // Waits on the lock, so an in-flight poll finishes first.
        *self.inner.api.lock().await = None;
        debug!("coordinator closed");
    }
}

/// Periodically refresh until cancelled.
async fn poll_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
