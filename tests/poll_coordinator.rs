// tests/poll_coordinator.rs - Poll cycle and toggle behavior against a mock backend
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::watch;

use trading_dashboard::api_client::ApiClient;
use trading_dashboard::coordinator::{
    PollCoordinator, FETCH_ERROR_MESSAGE, TOGGLE_ERROR_MESSAGE,
};
use trading_dashboard::types::DashboardState;

#[derive(Default)]
struct MockBackend {
    fail_all: AtomicBool,
    fail_trade_history: AtomicBool,
    fail_toggle: AtomicBool,
    running: AtomicBool,
    request_count: AtomicUsize,
    toggle_count: AtomicUsize,
}

impl MockBackend {
    fn should_fail(&self) -> bool {
        self.fail_all.load(Ordering::SeqCst)
    }
}

type Mock = Arc<MockBackend>;

async fn status_handler(State(mock): State<Mock>) -> Result<Json<Value>, StatusCode> {
    mock.request_count.fetch_add(1, Ordering::SeqCst);
    if mock.should_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "bot_running": mock.running.load(Ordering::SeqCst),
        "price": 42000.5,
        "active_positions": 1,
        "total_trades": 10,
        "winning_trades": 6,
        "win_rate": 60.0,
        "total_pnl": 1250.75,
        "today_pnl": 85.25,
        "avg_profit": 2.4,
        "avg_loss": -1.1,
        "recent_trades": [
            {
                "entry_price": 41000.0,
                "exit_price": 42000.0,
                "quantity": 0.05,
                "entry_time": "2024-05-01T10:00:00+00:00",
                "exit_time": "2024-05-01T11:30:00+00:00",
                "pnl": 50.0,
                "action": "BUY",
                "status": "CLOSED"
            }
        ]
    })))
}

async fn analytics_handler(State(mock): State<Mock>) -> Result<Json<Value>, StatusCode> {
    mock.request_count.fetch_add(1, Ordering::SeqCst);
    if mock.should_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "total_trades": 10,
        "winning_trades": 6,
        "win_rate": 60.0,
        "total_pnl": 1250.75,
        "trades_30_days": 4,
        "wins_30_days": 3,
        "win_rate_30": 75.0,
        "pnl_30_days": 310.0,
        "win_loss_data": {"wins": 6, "losses": 3, "breaks": 1},
        "daily_stats": [
            {
                "date": "2024-05-01",
                "total_trades": 2,
                "winning_trades": 1,
                "losing_trades": 1,
                "win_rate": 50.0,
                "daily_pnl": 12.5
            }
        ]
    })))
}

async fn trade_history_handler(State(mock): State<Mock>) -> Result<Json<Value>, StatusCode> {
    mock.request_count.fetch_add(1, Ordering::SeqCst);
    if mock.should_fail() || mock.fail_trade_history.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "trades": [
            {
                "symbol": "BTCUSDT",
                "type": "BUY",
                "entry_price": 41000.0,
                "exit_price": 42000.0,
                "quantity": 0.05,
                "entry_time": "2024-05-01T10:00:00+00:00",
                "exit_time": "2024-05-01T11:30:00+00:00",
                "status": "CLOSED"
            },
            {
                "symbol": "BTCUSDT",
                "type": "SELL",
                "entry_price": 42500.0,
                "exit_price": null,
                "quantity": 0.02,
                "entry_time": "2024-05-02T09:00:00+00:00",
                "exit_time": "",
                "status": "OPEN"
            }
        ]
    })))
}

async fn market_data_handler(State(mock): State<Mock>) -> Result<Json<Value>, StatusCode> {
    mock.request_count.fetch_add(1, Ordering::SeqCst);
    if mock.should_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "price": 42000.5,
        "rsi": 54.2,
        "ema_fast": 41980.0,
        "ema_slow": 41500.0,
        "atr": 320.0,
        "volume": 1250000.0,
        "avg_volume": 1100000.0,
        "volume_ratio": 1.14,
        "trend": "UPTREND",
        "timestamp": "2024-05-02T09:00:00+00:00"
    })))
}

async fn performance_handler(State(mock): State<Mock>) -> Result<Json<Value>, StatusCode> {
    mock.request_count.fetch_add(1, Ordering::SeqCst);
    if mock.should_fail() {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "sharpe_ratio": 1.8,
        "max_drawdown": -4.2,
        "profit_factor": 2.1,
        "roi": 12.5,
        "monthly_stats": [
            {
                "month": "2024-04",
                "total_trades": 8,
                "win_rate": 62.5,
                "monthly_pnl": 940.5,
                "avg_pnl": 117.56,
                "monthly_return": 9.4
            }
        ]
    })))
}

async fn toggle_handler(State(mock): State<Mock>) -> Result<Json<Value>, StatusCode> {
    mock.request_count.fetch_add(1, Ordering::SeqCst);
    mock.toggle_count.fetch_add(1, Ordering::SeqCst);
    if mock.fail_toggle.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let was_running = mock.running.fetch_xor(true, Ordering::SeqCst);
    Ok(Json(json!({ "running": !was_running, "status": "success" })))
}

/// Serve the mock on an ephemeral port and return the `/api` base URL.
async fn spawn_backend(mock: Mock) -> String {
    let router = Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/analytics", get(analytics_handler))
        .route("/api/trade-history", get(trade_history_handler))
        .route("/api/market-data", get(market_data_handler))
        .route("/api/performance", get(performance_handler))
        .route("/api/toggle-auto", post(toggle_handler))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}/api", addr)
}

async fn wait_until(
    rx: &mut watch::Receiver<DashboardState>,
    predicate: impl FnMut(&DashboardState) -> bool,
) -> DashboardState {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for dashboard state")
        .expect("state channel closed")
        .clone()
}

#[tokio::test]
async fn first_cycle_populates_state_from_backend() {
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let coordinator = PollCoordinator::spawn(ApiClient::new(base_url), Duration::from_secs(60));
    let mut rx = coordinator.subscribe();
    let state = wait_until(&mut rx, |s| s.update_count >= 1).await;

    // Backend-sourced aggregates pass through unmodified.
    assert_eq!(state.total_trades, 10);
    assert_eq!(state.winning_trades, 6);
    assert_eq!(state.win_rate, 60.0);
    assert!(state.winning_trades <= state.total_trades);

    assert_eq!(state.price, 42000.5);
    assert_eq!(state.recent_trades.len(), 1);
    assert_eq!(state.trade_history.len(), 2);
    assert_eq!(state.analytics.win_loss_data.wins, 6);
    assert_eq!(state.analytics.daily_stats.len(), 1);
    assert_eq!(state.market_data.trend, "UPTREND");
    assert_eq!(state.performance_metrics.sharpe_ratio, Some(1.8));
    assert_eq!(state.error_message, None);
    assert!(state.last_update.is_some());

    coordinator.shutdown();
}

#[tokio::test]
async fn failing_resource_aborts_whole_merge() {
    let mock = Arc::new(MockBackend::default());
    mock.fail_trade_history.store(true, Ordering::SeqCst);
    mock.running.store(true, Ordering::SeqCst);
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let coordinator =
        PollCoordinator::spawn(ApiClient::new(base_url), Duration::from_millis(50));
    let mut rx = coordinator.subscribe();

    let state = wait_until(&mut rx, |s| s.error_message.is_some()).await;
    assert_eq!(state.error_message.as_deref(), Some(FETCH_ERROR_MESSAGE));

    // Status succeeded, but nothing from the cycle may be merged.
    assert_eq!(state.update_count, 0);
    assert!(!state.bot_running);
    assert_eq!(state.price, 0.0);
    assert!(state.trade_history.is_empty());
    assert!(state.last_update.is_none());

    // Recovery: the next cycle replaces all five resources and clears the error.
    mock.fail_trade_history.store(false, Ordering::SeqCst);
    let state = wait_until(&mut rx, |s| s.update_count >= 1).await;
    assert_eq!(state.error_message, None);
    assert!(state.bot_running);
    assert_eq!(state.trade_history.len(), 2);
    assert_eq!(state.market_data.trend, "UPTREND");

    coordinator.shutdown();
}

#[tokio::test]
async fn failed_cycles_preserve_previous_data() {
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let coordinator =
        PollCoordinator::spawn(ApiClient::new(base_url), Duration::from_millis(30));
    let mut rx = coordinator.subscribe();

    let populated = wait_until(&mut rx, |s| s.update_count >= 1).await;
    assert_eq!(populated.error_message, None);

    mock.fail_all.store(true, Ordering::SeqCst);

    // Cycles are sequential, so once a failure is visible no older
    // successful cycle can still be in flight.
    let before = wait_until(&mut rx, |s| s.error_message.is_some()).await;
    assert!(before.update_count >= 1);

    // Let several more failing cycles run.
    let seen = mock.request_count.load(Ordering::SeqCst);
    tokio::time::timeout(Duration::from_secs(5), async {
        while mock.request_count.load(Ordering::SeqCst) < seen + 10 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("backend stopped receiving poll requests");

    let after = coordinator.snapshot();
    assert_eq!(after.error_message.as_deref(), Some(FETCH_ERROR_MESSAGE));

    // Every field, data and bookkeeping alike, is exactly what it was
    // when the failures began.
    assert_eq!(after, before);

    coordinator.shutdown();
}

#[tokio::test]
async fn toggle_merges_only_bot_running() {
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let coordinator = PollCoordinator::spawn(ApiClient::new(base_url), Duration::from_secs(60));
    let mut rx = coordinator.subscribe();
    let before = wait_until(&mut rx, |s| s.update_count >= 1).await;
    assert!(!before.bot_running);

    let running = coordinator.toggle_auto_trading().await.unwrap();
    assert!(running);

    let after = wait_until(&mut rx, |s| s.bot_running).await;

    // Only the running flag may differ from the pre-toggle snapshot.
    let mut masked = after.clone();
    masked.bot_running = before.bot_running;
    assert_eq!(masked, before);

    coordinator.shutdown();
}

#[tokio::test]
async fn toggle_failure_records_error_and_leaves_flag() {
    let mock = Arc::new(MockBackend::default());
    mock.fail_toggle.store(true, Ordering::SeqCst);
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let coordinator = PollCoordinator::spawn(ApiClient::new(base_url), Duration::from_secs(60));
    let mut rx = coordinator.subscribe();
    wait_until(&mut rx, |s| s.update_count >= 1).await;

    let result = coordinator.toggle_auto_trading().await;
    assert!(result.is_err());

    let state = coordinator.snapshot();
    assert!(!state.bot_running);
    assert_eq!(state.error_message.as_deref(), Some(TOGGLE_ERROR_MESSAGE));

    coordinator.shutdown();
}

#[tokio::test]
async fn concurrent_toggles_each_issue_a_request() {
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let coordinator = PollCoordinator::spawn(ApiClient::new(base_url), Duration::from_secs(60));
    let mut rx = coordinator.subscribe();
    wait_until(&mut rx, |s| s.update_count >= 1).await;

    // No single-flight guard: both commands go out independently.
    let (first, second) = tokio::join!(
        coordinator.toggle_auto_trading(),
        coordinator.toggle_auto_trading()
    );
    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(mock.toggle_count.load(Ordering::SeqCst), 2);

    coordinator.shutdown();
}

#[tokio::test]
async fn shutdown_stops_all_network_traffic() {
    let mock = Arc::new(MockBackend::default());
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let coordinator =
        PollCoordinator::spawn(ApiClient::new(base_url), Duration::from_millis(30));
    let mut rx = coordinator.subscribe();
    wait_until(&mut rx, |s| s.update_count >= 2).await;

    coordinator.shutdown();
    tokio::time::sleep(Duration::from_millis(60)).await;

    let after_shutdown = mock.request_count.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(mock.request_count.load(Ordering::SeqCst), after_shutdown);
}

#[tokio::test]
async fn unreachable_backend_sets_error_and_keeps_defaults() {
    // Nothing listens here; every cycle fails at the transport layer.
    let coordinator = PollCoordinator::spawn(
        ApiClient::new("http://127.0.0.1:9/api"),
        Duration::from_millis(50),
    );
    let mut rx = coordinator.subscribe();

    let state = wait_until(&mut rx, |s| s.error_message.is_some()).await;
    let expected = DashboardState {
        error_message: Some(FETCH_ERROR_MESSAGE.to_string()),
        ..DashboardState::default()
    };
    assert_eq!(state, expected);

    coordinator.shutdown();
}

#[tokio::test]
async fn transport_error_names_the_failing_resource() {
    let mock = Arc::new(MockBackend::default());
    mock.fail_trade_history.store(true, Ordering::SeqCst);
    let base_url = spawn_backend(Arc::clone(&mock)).await;

    let client = ApiClient::new(base_url);
    let err = client.fetch_trade_history().await.unwrap_err();
    assert_eq!(err.resource(), "trade-history");
    assert!(err.to_string().contains("trade-history"));

    // The other resources still succeed on their own.
    assert!(client.fetch_status().await.is_ok());
    assert!(client.fetch_performance_metrics().await.is_ok());
}
