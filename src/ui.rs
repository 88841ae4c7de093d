// src/ui.rs - Rendering for every dashboard tab
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table, Tabs, Wrap},
    Frame,
};

use crate::app::{App, AppTab};
use crate::format::{
    direction_color, format_currency, format_date, format_percent, format_quantity, profit_color,
    status_color,
};
use crate::types::DashboardState;

pub fn ui(f: &mut Frame, app: &App) {
    let state = app.snapshot();
    let size = f.size();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Tabs
            Constraint::Length(if state.error_message.is_some() { 3 } else { 0 }),
            Constraint::Min(5), // Active tab
            Constraint::Length(1), // Key hints
        ])
        .split(size);

    render_header(f, app, &state, outer[0]);
    render_tabs(f, app, outer[1]);
    if state.error_message.is_some() {
        render_error_banner(f, &state, outer[2]);
    }

    match app.current_tab {
        AppTab::Overview => render_overview(f, &state, outer[3]),
        AppTab::Chart => render_chart(f, &state, outer[3]),
        AppTab::Analytics => render_analytics(f, &state, outer[3]),
        AppTab::Journal => render_journal(f, &state, outer[3]),
        AppTab::Performance => render_performance(f, &state, outer[3]),
    }

    render_help(f, outer[4]);
}

fn render_header(f: &mut Frame, app: &App, state: &DashboardState, area: Rect) {
    let header_block = Block::default()
        .borders(Borders::ALL)
        .title("🤖 AI Trading Bot Dashboard")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan));

    let bot_status = if state.bot_running { "🟢 RUNNING" } else { "🔴 STOPPED" };
    let last_update = match state.last_update {
        Some(ts) => format!("{}s ago", (Utc::now() - ts).num_seconds().max(0)),
        None => "never".to_string(),
    };

    let header_text = format!(
        "API: {} | Bot: {} | Updates: {} | Last: {} | Time: {}",
        app.api_base_url,
        bot_status,
        state.update_count,
        last_update,
        Utc::now().format("%H:%M:%S"),
    );

    let header = Paragraph::new(header_text)
        .block(header_block)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));

    f.render_widget(header, area);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = AppTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("[{}] {}", i + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.current_tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn render_error_banner(f: &mut Frame, state: &DashboardState, area: Rect) {
    let message = state.error_message.as_deref().unwrap_or("");
    let banner = Paragraph::new(message)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });

    f.render_widget(banner, area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new("1-5/Tab: switch view | t: start/stop bot | q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, area);
}

fn stat_card(f: &mut Frame, area: Rect, label: &str, value: String, value_color: Color) {
    let card = Paragraph::new(vec![
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            value,
            Style::default().fg(value_color).add_modifier(Modifier::BOLD),
        )),
    ])
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);

    f.render_widget(card, area);
}

fn split_row(area: Rect, count: usize) -> std::rc::Rc<[Rect]> {
    let constraints: Vec<Constraint> =
        (0..count).map(|_| Constraint::Ratio(1, count as u32)).collect();
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
}

// --- Overview ---

fn render_overview(f: &mut Frame, state: &DashboardState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Bot status
            Constraint::Length(4), // Stats row 1
            Constraint::Length(4), // Stats row 2
            Constraint::Min(5),    // Recent trades
        ])
        .split(area);

    let status_line = Line::from(vec![
        Span::styled("Bot Status: ", Style::default().fg(Color::Gray)),
        Span::styled(
            if state.bot_running { "🟢 Running" } else { "🔴 Stopped" },
            Style::default()
                .fg(status_color(state.bot_running))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            if state.bot_running { "  [t] STOP" } else { "  [t] START" },
            Style::default().fg(Color::Cyan),
        ),
    ]);
    let status = Paragraph::new(status_line)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[0]);

    let row1 = split_row(chunks[1], 4);
    stat_card(f, row1[0], "Current Price", format_currency(state.price), Color::White);
    stat_card(
        f,
        row1[1],
        "Active Positions",
        state.active_positions.to_string(),
        Color::White,
    );
    stat_card(f, row1[2], "Total Trades", state.total_trades.to_string(), Color::White);
    stat_card(
        f,
        row1[3],
        "Win Rate",
        format_percent(state.win_rate),
        if state.win_rate >= 50.0 { Color::Green } else { Color::Red },
    );

    let row2 = split_row(chunks[2], 4);
    stat_card(
        f,
        row2[0],
        "Total P&L",
        format_currency(state.total_pnl),
        profit_color(state.total_pnl),
    );
    stat_card(
        f,
        row2[1],
        "Today P&L",
        format_currency(state.today_pnl),
        profit_color(state.today_pnl),
    );
    stat_card(f, row2[2], "Avg Profit", format_percent(state.avg_profit), Color::Green);
    stat_card(f, row2[3], "Avg Loss", format_percent(state.avg_loss), Color::Red);

    render_recent_trades(f, state, chunks[3]);
}

fn render_recent_trades(f: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Recent Trades")
        .border_style(Style::default().fg(Color::Blue));

    if state.recent_trades.is_empty() {
        let empty = Paragraph::new("📭 No trades yet")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Entry Time", "Type", "Price", "Quantity", "P&L", "Status"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .recent_trades
        .iter()
        .map(|trade| {
            let pnl = trade.pnl.unwrap_or_else(|| trade.realized_pnl());
            Row::new(vec![
                Cell::from(format_date(&trade.entry_time)),
                Cell::from(trade.direction.as_str())
                    .style(Style::default().fg(direction_color(trade.direction.as_str()))),
                Cell::from(format_currency(trade.entry_price)),
                Cell::from(format_quantity(trade.quantity, 4)),
                Cell::from(format_currency(pnl)).style(Style::default().fg(profit_color(pnl))),
                Cell::from(trade.status.as_str()),
            ])
        })
        .collect();

    let table = Table::new(rows).header(header).block(block).widths(&[
        Constraint::Length(20),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(8),
    ]);

    f.render_widget(table, area);
}

// --- Chart ---

fn render_chart(f: &mut Frame, state: &DashboardState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Indicator cards
            Constraint::Length(3), // Trend / signal
            Constraint::Min(5),    // Daily P&L sparkline
        ])
        .split(area);

    let market = &state.market_data;
    let cards = split_row(chunks[0], 4);
    stat_card(f, cards[0], "Price", format_currency(state.price), Color::White);
    stat_card(
        f,
        cards[1],
        "RSI (14)",
        market.rsi.map_or("N/A".to_string(), |v| format!("{:.2}", v)),
        Color::White,
    );
    stat_card(
        f,
        cards[2],
        "MACD",
        market.macd.map_or("N/A".to_string(), |v| format!("{:.4}", v)),
        Color::White,
    );
    stat_card(
        f,
        cards[3],
        "Volume",
        market
            .volume
            .map_or("N/A".to_string(), |v| format!("{:.2} M", v / 1_000_000.0)),
        Color::White,
    );

    let trend_line = Line::from(vec![
        Span::styled("Trend: ", Style::default().fg(Color::Gray)),
        Span::styled(
            if market.trend.is_empty() { "N/A" } else { market.trend.as_str() },
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Signal: ", Style::default().fg(Color::Gray)),
        Span::styled(
            market.signal.as_deref().unwrap_or("N/A"),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    let trend = Paragraph::new(trend_line)
        .block(Block::default().borders(Borders::ALL).title("Market"));
    f.render_widget(trend, chunks[1]);

    render_daily_pnl_sparkline(f, state, chunks[2]);
}

fn render_daily_pnl_sparkline(f: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Daily P&L (30d)")
        .border_style(Style::default().fg(Color::Blue));

    let daily = &state.analytics.daily_stats;
    if daily.is_empty() {
        let empty = Paragraph::new("No analytics data available")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(empty, area);
        return;
    }

    // Sparklines are unsigned; shift the series so the minimum sits at zero.
    let min = daily.iter().map(|s| s.daily_pnl).fold(f64::INFINITY, f64::min);
    let data: Vec<u64> = daily
        .iter()
        .map(|s| (s.daily_pnl - min).max(0.0).round() as u64)
        .collect();

    let sparkline = Sparkline::default()
        .block(block)
        .data(&data)
        .style(Style::default().fg(Color::Cyan));

    f.render_widget(sparkline, area);
}

// --- Analytics ---

fn render_analytics(f: &mut Frame, state: &DashboardState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Aggregate cards
            Constraint::Length(4), // 30-day cards
            Constraint::Min(5),    // Daily stats table
        ])
        .split(area);

    let analytics = &state.analytics;
    let losing = analytics.total_trades.saturating_sub(analytics.winning_trades);

    let row1 = split_row(chunks[0], 4);
    stat_card(
        f,
        row1[0],
        "Winning Trades",
        analytics.winning_trades.to_string(),
        Color::Green,
    );
    stat_card(f, row1[1], "Losing Trades", losing.to_string(), Color::Red);
    stat_card(
        f,
        row1[2],
        "Win Rate",
        format_percent(analytics.win_rate),
        if analytics.win_rate >= 50.0 { Color::Green } else { Color::Red },
    );
    stat_card(
        f,
        row1[3],
        "Total P&L",
        format_currency(analytics.total_pnl),
        profit_color(analytics.total_pnl),
    );

    let row2 = split_row(chunks[1], 4);
    stat_card(
        f,
        row2[0],
        "Trades (30d)",
        analytics.trades_30_days.to_string(),
        Color::White,
    );
    stat_card(f, row2[1], "Wins (30d)", analytics.wins_30_days.to_string(), Color::Green);
    stat_card(
        f,
        row2[2],
        "Win Rate (30d)",
        format_percent(analytics.win_rate_30),
        Color::White,
    );
    stat_card(
        f,
        row2[3],
        "P&L (30d)",
        format_currency(analytics.pnl_30_days),
        profit_color(analytics.pnl_30_days),
    );

    render_daily_stats_table(f, state, chunks[2]);
}

fn render_daily_stats_table(f: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Daily Statistics")
        .border_style(Style::default().fg(Color::Blue));

    let daily = &state.analytics.daily_stats;
    if daily.is_empty() {
        let empty = Paragraph::new("No analytics data available")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Date", "Trades", "Winners", "Losers", "Win Rate", "P&L"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = daily
        .iter()
        .map(|stat| {
            Row::new(vec![
                Cell::from(stat.date.clone()),
                Cell::from(stat.total_trades.to_string()),
                Cell::from(stat.winning_trades.to_string())
                    .style(Style::default().fg(Color::Green)),
                Cell::from(stat.losing_trades.to_string()).style(Style::default().fg(Color::Red)),
                Cell::from(format_percent(stat.win_rate)),
                Cell::from(format_currency(stat.daily_pnl))
                    .style(Style::default().fg(profit_color(stat.daily_pnl))),
            ])
        })
        .collect();

    let table = Table::new(rows).header(header).block(block).widths(&[
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(14),
    ]);

    f.render_widget(table, area);
}

// --- Journal ---

fn render_journal(f: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("📓 Trade Journal")
        .border_style(Style::default().fg(Color::Blue));

    if state.trade_history.is_empty() {
        let empty = Paragraph::new("📭 No trades in journal yet")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        "Entry Time", "Symbol", "Type", "Entry", "Exit", "Qty", "P&L", "Return", "Status",
        "Duration",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .trade_history
        .iter()
        .map(|trade| {
            // Derived at render time from raw trade fields.
            let pnl = trade.realized_pnl();
            let return_pct = trade.return_pct();
            let duration = trade
                .duration_minutes()
                .map_or("Open".to_string(), |m| format!("{} min", m));

            Row::new(vec![
                Cell::from(format_date(&trade.entry_time)),
                Cell::from(trade.symbol.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(trade.direction.as_str())
                    .style(Style::default().fg(direction_color(trade.direction.as_str()))),
                Cell::from(format_currency(trade.entry_price)),
                Cell::from(
                    trade
                        .exit_price
                        .map_or("N/A".to_string(), format_currency),
                ),
                Cell::from(format_quantity(trade.quantity, 6)),
                Cell::from(format_currency(pnl)).style(Style::default().fg(profit_color(pnl))),
                Cell::from(format!("{:.2}%", return_pct))
                    .style(Style::default().fg(profit_color(return_pct))),
                Cell::from(trade.status.as_str()).style(Style::default().fg(
                    match trade.status.as_str() {
                        "CLOSED" => Color::Green,
                        _ => Color::Yellow,
                    },
                )),
                Cell::from(duration),
            ])
        })
        .collect();

    let table = Table::new(rows).header(header).block(block).widths(&[
        Constraint::Length(20),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(9),
    ]);

    f.render_widget(table, area);
}

// --- Performance ---

fn render_performance(f: &mut Frame, state: &DashboardState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Ratio cards
            Constraint::Min(5),    // Monthly stats
            Constraint::Length(4), // Goals
        ])
        .split(area);

    let metrics = &state.performance_metrics;

    let cards = split_row(chunks[0], 4);
    stat_card(
        f,
        cards[0],
        "Sharpe Ratio",
        metrics.sharpe_ratio.map_or("N/A".to_string(), |v| format!("{:.2}", v)),
        Color::White,
    );
    stat_card(
        f,
        cards[1],
        "Max Drawdown",
        metrics.max_drawdown.map_or("N/A".to_string(), format_percent),
        Color::Red,
    );
    stat_card(
        f,
        cards[2],
        "Profit Factor",
        metrics.profit_factor.map_or("N/A".to_string(), |v| format!("{:.2}", v)),
        Color::White,
    );
    stat_card(
        f,
        cards[3],
        "ROI",
        metrics.roi.map_or("N/A".to_string(), format_percent),
        profit_color(metrics.roi.unwrap_or(0.0)),
    );

    render_monthly_stats_table(f, state, chunks[1]);

    let goals = split_row(chunks[2], 2);
    stat_card(
        f,
        goals[0],
        "💰 Daily Goal",
        format_currency(metrics.daily_goal.unwrap_or(100.0)),
        Color::Green,
    );
    stat_card(
        f,
        goals[1],
        "📈 Monthly Goal",
        format!("{} (2.5%)", format_currency(metrics.monthly_goal.unwrap_or(2500.0))),
        Color::Cyan,
    );
}

fn render_monthly_stats_table(f: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Monthly Performance")
        .border_style(Style::default().fg(Color::Blue));

    let monthly = &state.performance_metrics.monthly_stats;
    if monthly.is_empty() {
        let empty = Paragraph::new("No monthly data available yet")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        "Month", "Trades", "Win Rate", "Total P&L", "Avg P&L", "Return %",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = monthly
        .iter()
        .map(|stat| {
            Row::new(vec![
                Cell::from(stat.month.clone()),
                Cell::from(stat.total_trades.to_string()),
                Cell::from(format_percent(stat.win_rate)),
                Cell::from(format_currency(stat.monthly_pnl))
                    .style(Style::default().fg(profit_color(stat.monthly_pnl))),
                Cell::from(format_currency(stat.avg_pnl))
                    .style(Style::default().fg(profit_color(stat.avg_pnl))),
                Cell::from(format_percent(stat.monthly_return))
                    .style(Style::default().fg(profit_color(stat.monthly_return))),
            ])
        })
        .collect();

    let table = Table::new(rows).header(header).block(block).widths(&[
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(10),
    ]);

    f.render_widget(table, area);
}
