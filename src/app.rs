// src/app.rs - App state for the terminal UI
use tokio::sync::watch;

use crate::coordinator::PollCoordinator;
use crate::types::DashboardState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTab {
    Overview,
    Chart,
    Analytics,
    Journal,
    Performance,
}

impl AppTab {
    pub const ALL: [AppTab; 5] = [
        AppTab::Overview,
        AppTab::Chart,
        AppTab::Analytics,
        AppTab::Journal,
        AppTab::Performance,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Overview => "Overview",
            AppTab::Chart => "Chart",
            AppTab::Analytics => "Analytics",
            AppTab::Journal => "Journal",
            AppTab::Performance => "Performance",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }
}

/// UI-side application handle: the coordinator plus which tab is showing.
/// All dashboard data comes from watch-channel snapshots; the UI never
/// mutates `DashboardState` directly.
pub struct App {
    coordinator: PollCoordinator,
    state_rx: watch::Receiver<DashboardState>,
    pub current_tab: AppTab,
    pub api_base_url: String,
}

impl App {
    pub fn new(coordinator: PollCoordinator, api_base_url: String) -> Self {
        let state_rx = coordinator.subscribe();
        Self {
            coordinator,
            state_rx,
            current_tab: AppTab::Overview,
            api_base_url,
        }
    }

    /// Immutable snapshot of the current state for one render pass.
    pub fn snapshot(&self) -> DashboardState {
        self.state_rx.borrow().clone()
    }

    pub fn switch_tab(&mut self, tab: AppTab) {
        self.current_tab = tab;
    }

    pub fn next_tab(&mut self) {
        let next = (self.current_tab.index() + 1) % AppTab::ALL.len();
        self.current_tab = AppTab::ALL[next];
    }

    pub fn previous_tab(&mut self) {
        let len = AppTab::ALL.len();
        let prev = (self.current_tab.index() + len - 1) % len;
        self.current_tab = AppTab::ALL[prev];
    }

    /// Start/stop the bot. A failure surfaces through the state's error
    /// message, so the key handler can ignore the result.
    pub async fn toggle_auto_trading(&self) {
        let _ = self.coordinator.toggle_auto_trading().await;
    }

    pub fn shutdown(&self) {
        self.coordinator.shutdown();
    }
}
