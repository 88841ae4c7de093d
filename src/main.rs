// src/main.rs - Terminal dashboard entry point
use std::io;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::{Duration, Instant};

use trading_dashboard::api_client::ApiClient;
use trading_dashboard::app::{App, AppTab};
use trading_dashboard::config::{Config, POLL_INTERVAL};
use trading_dashboard::coordinator::PollCoordinator;
use trading_dashboard::ui::ui;

#[derive(Parser, Debug)]
#[command(about = "Terminal dashboard for the trading bot backend")]
struct Args {
    /// Backend base URL (falls back to API_BASE_URL, then the default)
    #[arg(long)]
    api_base_url: Option<String>,
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, &app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => {
                        app.shutdown();
                        return Ok(());
                    }
                    KeyCode::Char('t') => {
                        app.toggle_auto_trading().await;
                    }
                    KeyCode::Char('1') => app.switch_tab(AppTab::Overview),
                    KeyCode::Char('2') => app.switch_tab(AppTab::Chart),
                    KeyCode::Char('3') => app.switch_tab(AppTab::Analytics),
                    KeyCode::Char('4') => app.switch_tab(AppTab::Journal),
                    KeyCode::Char('5') => app.switch_tab(AppTab::Performance),
                    KeyCode::Tab => app.next_tab(),
                    KeyCode::BackTab => app.previous_tab(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let config = Config::resolve(args.api_base_url);

    let client = ApiClient::new(config.api_base_url.clone());
    let coordinator = PollCoordinator::spawn(client, POLL_INTERVAL);
    let app = App::new(coordinator, config.api_base_url);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}
