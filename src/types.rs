// src/types.rs - Dashboard state and backend payload types
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Trade direction as reported by the backend.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeDirection {
    #[serde(rename = "BUY")]
    #[default]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD")]
    Hold,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "BUY",
            TradeDirection::Sell => "SELL",
            TradeDirection::Hold => "HOLD",
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TradeStatus {
    #[serde(rename = "OPEN")]
    #[default]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "OPEN",
            TradeStatus::Closed => "CLOSED",
        }
    }
}

/// One executed or open position record. The backend emits partially
/// populated records for open positions, so everything defaults.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Trade {
    pub id: Option<String>,
    pub symbol: String,
    #[serde(rename = "type", alias = "action")]
    pub direction: TradeDirection,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub entry_time: String,
    pub exit_time: Option<String>,
    pub status: TradeStatus,
    /// Backend-supplied realized P&L, when it sends one.
    pub pnl: Option<f64>,
}

impl Trade {
    /// Realized P&L from raw fields. Zero while the position is open.
    pub fn realized_pnl(&self) -> f64 {
        match self.exit_price {
            Some(exit) => (exit - self.entry_price) * self.quantity,
            None => 0.0,
        }
    }

    /// Return on entry notional, in percent.
    pub fn return_pct(&self) -> f64 {
        let notional = self.entry_price * self.quantity;
        if notional == 0.0 {
            return 0.0;
        }
        (self.realized_pnl() / notional) * 100.0
    }

    /// Whole minutes between entry and exit, if both timestamps parse.
    pub fn duration_minutes(&self) -> Option<i64> {
        let exit = self.exit_time.as_deref().filter(|s| !s.is_empty())?;
        let entry = DateTime::parse_from_rfc3339(&self.entry_time).ok()?;
        let exit = DateTime::parse_from_rfc3339(exit).ok()?;
        Some((exit - entry).num_minutes())
    }
}

/// Flat payload of `GET /status`, merged into the state root.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct StatusPayload {
    pub bot_running: bool,
    pub price: f64,
    pub active_positions: u32,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub today_pnl: f64,
    pub avg_profit: f64,
    pub avg_loss: f64,
    pub recent_trades: Vec<Trade>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TradeHistoryPayload {
    pub trades: Vec<Trade>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TogglePayload {
    pub running: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct WinLossBreakdown {
    pub wins: u32,
    pub losses: u32,
    pub breaks: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DailyStat {
    pub date: String,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub losing_trades: u32,
    pub win_rate: f64,
    pub daily_pnl: f64,
}

/// Aggregate of `GET /analytics`.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AnalyticsSnapshot {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub trades_30_days: u32,
    pub wins_30_days: u32,
    pub win_rate_30: f64,
    pub pnl_30_days: f64,
    pub win_loss_data: WinLossBreakdown,
    pub daily_stats: Vec<DailyStat>,
}

/// Indicators and trend from `GET /market-data`.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MarketSnapshot {
    pub price: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub atr: Option<f64>,
    pub volume: Option<f64>,
    pub avg_volume: Option<f64>,
    pub volume_ratio: Option<f64>,
    pub trend: String,
    pub signal: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct MonthlyStat {
    pub month: String,
    pub total_trades: u32,
    pub win_rate: f64,
    pub monthly_pnl: f64,
    pub avg_pnl: f64,
    pub monthly_return: f64,
}

/// Ratios and monthly stats from `GET /performance`.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PerformanceSnapshot {
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub profit_factor: Option<f64>,
    pub roi: Option<f64>,
    pub daily_goal: Option<f64>,
    pub monthly_goal: Option<f64>,
    pub monthly_stats: Vec<MonthlyStat>,
}

/// Single source of truth rendered by every view. Mutated only by the
/// poll coordinator; views get snapshots through a watch channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub bot_running: bool,
    pub price: f64,
    pub active_positions: u32,
    pub total_trades: u32,
    pub winning_trades: u32,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub today_pnl: f64,
    pub avg_profit: f64,
    pub avg_loss: f64,
    pub recent_trades: Vec<Trade>,
    pub trade_history: Vec<Trade>,
    pub analytics: AnalyticsSnapshot,
    pub market_data: MarketSnapshot,
    pub performance_metrics: PerformanceSnapshot,

    /// Set when the most recent poll cycle or toggle command failed.
    /// A successful cycle clears it unconditionally.
    pub error_message: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub update_count: u64,
}

impl DashboardState {
    /// Merge the flat status payload into the state root.
    pub fn apply_status(&mut self, status: StatusPayload) {
        self.bot_running = status.bot_running;
        self.price = status.price;
        self.active_positions = status.active_positions;
        self.total_trades = status.total_trades;
        self.winning_trades = status.winning_trades;
        self.win_rate = status.win_rate;
        self.total_pnl = status.total_pnl;
        self.today_pnl = status.today_pnl;
        self.avg_profit = status.avg_profit;
        self.avg_loss = status.avg_loss;
        self.recent_trades = status.recent_trades;
    }
}
