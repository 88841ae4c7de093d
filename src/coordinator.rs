// src/coordinator.rs - Fixed-interval poll loop and state reconciliation
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api_client::ApiClient;
use crate::error::CommandError;
use crate::types::DashboardState;

pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch data. Retrying...";
pub const TOGGLE_ERROR_MESSAGE: &str = "Failed to toggle auto-trading";

struct Inner {
    client: ApiClient,
    state: watch::Sender<DashboardState>,
    /// Bumped on teardown. Results issued under an older epoch are
    /// discarded instead of merged.
    epoch: AtomicU64,
}

/// Owns the canonical `DashboardState` and keeps it eventually consistent
/// with the backend. The first cycle runs immediately on spawn; after that
/// one cycle runs per interval. Cycles are strictly sequential: the next
/// one is scheduled only after the previous fan-in resolves, so a slow
/// backend delays polling instead of stacking cycles.
pub struct PollCoordinator {
    inner: Arc<Inner>,
    poll_task: JoinHandle<()>,
}

impl PollCoordinator {
    pub fn spawn(client: ApiClient, interval: Duration) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        let inner = Arc::new(Inner {
            client,
            state,
            epoch: AtomicU64::new(0),
        });

        let poll_inner = Arc::clone(&inner);
        let poll_task = tokio::spawn(async move {
            loop {
                run_cycle(&poll_inner).await;
                tokio::time::sleep(interval).await;
            }
        });

        Self { inner, poll_task }
    }

    /// Views subscribe here and receive immutable snapshots.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    /// Flip the backend's running flag. Independent of the poll cycle: a
    /// success merges only `bot_running`, immediately. Concurrent calls are
    /// not deduplicated; each one issues its own request.
    pub async fn toggle_auto_trading(&self) -> Result<bool, CommandError> {
        let issued_epoch = self.inner.epoch.load(Ordering::SeqCst);

        match self.inner.client.toggle_auto_trading().await {
            Ok(payload) => {
                if self.inner.epoch.load(Ordering::SeqCst) == issued_epoch {
                    info!("auto-trading toggled: running={}", payload.running);
                    self.inner
                        .state
                        .send_modify(|state| state.bot_running = payload.running);
                }
                Ok(payload.running)
            }
            Err(err) => {
                warn!("toggle auto-trading failed: {}", err);
                if self.inner.epoch.load(Ordering::SeqCst) == issued_epoch {
                    self.inner.state.send_modify(|state| {
                        state.error_message = Some(TOGGLE_ERROR_MESSAGE.to_string());
                    });
                }
                Err(CommandError(err))
            }
        }
    }

    /// Tear down the coordinator: cancel the poll timer and invalidate any
    /// result still in flight. No network calls or state mutations happen
    /// after this returns.
    pub fn shutdown(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.poll_task.abort();
    }
}

impl Drop for PollCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One poll cycle: fan out the five reads, fan in, then merge all five
/// payloads or none of them. A single failing resource aborts the whole
/// merge; previously held data stays visible and only the error changes.
async fn run_cycle(inner: &Inner) {
    let issued_epoch = inner.epoch.load(Ordering::SeqCst);

    let result = tokio::try_join!(
        inner.client.fetch_status(),
        inner.client.fetch_analytics(),
        inner.client.fetch_trade_history(),
        inner.client.fetch_market_data(),
        inner.client.fetch_performance_metrics(),
    );

    // Torn down while this cycle was in flight: discard the result.
    if inner.epoch.load(Ordering::SeqCst) != issued_epoch {
        return;
    }

    match result {
        Ok((status, analytics, history, market, performance)) => {
            inner.state.send_modify(|state| {
                state.apply_status(status);
                state.analytics = analytics;
                state.trade_history = history.trades;
                state.market_data = market;
                state.performance_metrics = performance;
                state.error_message = None;
                state.last_update = Some(Utc::now());
                state.update_count += 1;
            });
            debug!("poll cycle merged");
        }
        Err(err) => {
            warn!("poll cycle failed: {}", err);
            inner.state.send_modify(|state| {
                state.error_message = Some(FETCH_ERROR_MESSAGE.to_string());
            });
        }
    }
}
