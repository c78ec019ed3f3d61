use ctw::api::client::HttpApi;
use ctw::app::{AppState, PAGE_SCROLL_LINES};
use ctw::cli::{Cli, LogMode};
use ctw::dashboard::{Dashboard, DashboardConfig};
use ctw::events::{AppEvent, Control, EventHandler};
use ctw::input::{self, Action, InputContext};
use ctw::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "ctw v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn state_dir() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("ctw")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("ctw")
    } else {
        std::env::temp_dir().join("ctw")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let api = HttpApi::new(&args.url, Duration::from_secs(args.timeout.max(1)))?;
    let config = DashboardConfig {
        status_interval: Duration::from_secs(args.status_interval.max(1)),
        log_interval: Duration::from_secs(args.log_interval.max(1)),
        log_mode: args.logs,
        redact: args.redact,
    };

    let mut state = AppState::new(args.url.clone(), args.logs);
    state.desktop_notify = !args.no_notify;
    if args.no_stick {
        state.logs.stick_to_bottom = false;
    }

    // Setup terminal with panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Failed to disable raw mode during panic: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, SetTitle("")) {
            eprintln!("Failed to leave alternate screen during panic: {e}");
        }
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("ctw"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let events = EventHandler::new(Duration::from_millis(100));
    let mut dashboard = Dashboard::new(Arc::new(api), events.sender(), config);

    let result = run_app(&mut terminal, &mut state, &mut dashboard, events).await;

    dashboard.dispose();

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    dashboard: &mut Dashboard,
    mut events: EventHandler,
) -> Result<()> {
    let mut last_tick = Instant::now();

    let height = terminal.size()?.height;
    state
        .logs
        .set_viewport_height(tui::render::log_viewport_height(height));
    dashboard.start(state);

    loop {
        terminal.draw(|f| tui::render::render(f, state))?;

        state.prune_notifications();
        state.prune_error();

        let Some(event) = events.next().await else {
            return Ok(());
        };

        // Keep scroll math in line with the current terminal size
        if let Ok(size) = terminal.size() {
            state
                .logs
                .set_viewport_height(tui::render::log_viewport_height(size.height));
        }

        match event {
            AppEvent::Key(key) => {
                let ctx = InputContext {
                    has_error: state.error.is_some(),
                    start_enabled: state.buttons.start_enabled,
                    stop_enabled: state.buttons.stop_enabled,
                    streaming: state.config.log_mode == LogMode::Stream,
                };
                match input::map_key(key, &ctx) {
                    Action::Quit => state.should_quit = true,
                    Action::DismissError => state.clear_error(),
                    Action::Start => dashboard.start_container(state),
                    Action::Stop => dashboard.stop_container(state),
                    Action::FocusNext => state.focus_next(),
                    Action::Activate => match state.focused_control() {
                        Some(Control::Start) => dashboard.start_container(state),
                        Some(Control::Stop) => dashboard.stop_container(state),
                        None => {}
                    },
                    Action::ToggleStick => state.toggle_stick_to_bottom(),
                    Action::RefreshStatus => dashboard.refresh_status(state),
                    Action::ScrollUp => state.logs.scroll_up(1),
                    Action::ScrollDown => state.logs.scroll_down(1),
                    Action::PageUp => state.logs.scroll_up(PAGE_SCROLL_LINES),
                    Action::PageDown => state.logs.scroll_down(PAGE_SCROLL_LINES),
                    Action::ScrollToTop => state.logs.scroll_to_top(),
                    Action::ScrollToBottom => state.logs.scroll_to_bottom(),
                    Action::None => {}
                }
            }
            AppEvent::Tick => {
                if last_tick.elapsed() >= Duration::from_millis(100) {
                    state.advance_spinner();
                    last_tick = Instant::now();
                }
            }
            other => dashboard.handle_event(state, other),
        }

        if state.should_quit {
            events.stop();
            return Ok(());
        }
    }
}
