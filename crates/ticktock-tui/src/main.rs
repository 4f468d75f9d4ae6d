mod app;
mod ui;

use anyhow::Result;
use app::{App, AppView, InputMode};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use ticktock_core::models::PomodoroPhase;
use ticktock_core::storage::{init_data_dir, FileStore, STORE_FILENAME};
use ticktock_engine::{
    AudioSink, PlaybackError, TimerEvent, TimerEventType, TimerKind, TimerSuite, TokioClock,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn setup_logging(level: &str) -> Result<()> {
    let mut log_path = std::env::temp_dir();
    log_path.push("ticktock-tui.log");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "ticktock_tui={level},ticktock_engine={level}",
            level = level
        ))
    });

    let log_file = std::fs::File::create(log_path)?;
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);

        tracing::error!(?panic_info, "Application panicked");

        eprintln!("A fatal error occurred: {}", panic_info);

        original_hook(panic_info);
    }));
}

#[derive(Parser, Debug)]
#[command(name = "ticktock")]
#[command(about = "TickTock - stopwatch, Pomodoro and countdown timers", long_about = None)]
struct Args {
    /// Directory holding store.json
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Where lap CSVs and settings exports are written
    #[arg(short, long, default_value = ".")]
    export_dir: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// View shown on startup
    #[arg(short, long, value_enum, default_value_t = AppView::Stopwatch)]
    view: AppView,
}

/// Rings the terminal bell. A bell has no length, so looped alarms ring
/// once.
struct BellSink;

impl AudioSink for BellSink {
    fn play(&self, volume: f32, _looped: bool) -> Result<(), PlaybackError> {
        if volume <= 0.0 {
            return Ok(());
        }
        print!("\x07");
        std::io::Write::flush(&mut std::io::stdout()).map_err(|e| PlaybackError(e.to_string()))
    }

    fn stop(&self) {}
}

/// Terminals that export `COLORFGBG` ("fg;bg") tell us their background.
fn terminal_prefers_dark() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| value.rsplit(';').next().and_then(|bg| bg.parse::<u8>().ok()))
        .map(|bg| bg < 7 || bg == 8)
        .unwrap_or(false)
}

fn send_os_notification(title: &str, body: &str) {
    if let Err(e) = notify_rust::Notification::new()
        .appname("ticktock")
        .summary(title)
        .body(body)
        .icon("clock")
        .timeout(notify_rust::Timeout::Milliseconds(5000))
        .show()
    {
        tracing::error!("Failed to send notification: {}", e);
    }
}

fn send_urgent_notification(title: &str, body: &str) {
    let mut notification = notify_rust::Notification::new();
    notification
        .appname("ticktock")
        .summary(title)
        .body(body)
        .icon("alarm-clock")
        .timeout(notify_rust::Timeout::Milliseconds(10000));

    #[cfg(all(unix, not(target_os = "macos")))]
    notification.urgency(notify_rust::Urgency::Critical);

    if let Err(e) = notification.show() {
        tracing::error!("Failed to send urgent notification: {}", e);
    }
}

fn handle_timer_event(app: &mut App, event: TimerEvent) {
    let notify = app.settings.notifications;

    match (&event.event_type, event.timer) {
        (TimerEventType::CountdownCompleted, TimerKind::Custom) => {
            app.status_message = "Time's up!".to_string();
            if notify {
                send_urgent_notification("Time's up!", "Your countdown has finished");
            }
        }
        (
            TimerEventType::PhaseCompleted {
                phase: PomodoroPhase::Work,
                session_number,
            },
            _,
        ) => {
            app.input_mode = InputMode::PomodoroFinished;
            app.status_message = format!("Session {} complete", session_number);
            if notify {
                send_urgent_notification(
                    "Pomodoro complete",
                    "Time for a break! Press [b] for a break or [a] for another session",
                );
            }
        }
        (TimerEventType::PhaseCompleted { phase, .. }, _) => {
            app.status_message = format!("{} over, back to work", phase.as_str());
            if notify {
                send_os_notification("Break over", "Ready for the next session?");
            }
        }
        (TimerEventType::LapRecorded { number, .. }, _) if app.stopwatch.auto_lap => {
            app.status_message = format!("Lap {} recorded", number);
        }
        _ => {}
    }
}

async fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    if app.show_help {
        app.show_help = false;
        return Ok(());
    }

    app.status_message.clear();

    if app.input_mode.is_text_entry() {
        match code {
            KeyCode::Enter => app.submit_input().await,
            KeyCode::Esc => app.cancel_input(),
            KeyCode::Backspace => {
                app.input_buffer.pop();
            }
            KeyCode::Char(c) => app.input_buffer.push(c),
            _ => {}
        }
        return Ok(());
    }

    if app.stopwatch.pending.is_some() {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Err(e) = app.confirm_lap_action().await {
                    app.status_message = e.to_string();
                }
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                app.cancel_lap_action().await;
            }
            _ => {}
        }
        return Ok(());
    }

    if app.input_mode == InputMode::ConfirmResetSettings {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.reset_settings().await;
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                app.input_mode = InputMode::Normal;
            }
            _ => {}
        }
        return Ok(());
    }

    if app.input_mode == InputMode::PomodoroFinished {
        match code {
            KeyCode::Char('b') | KeyCode::Char('B') | KeyCode::Enter => {
                app.start_break().await;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => app.start_another().await,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                app.stop_alarm().await;
                app.input_mode = InputMode::Normal;
            }
            _ => {}
        }
        return Ok(());
    }

    if app.custom.alarm_active {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => app.stop_alarm().await,
            KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
            _ => {}
        }
        return Ok(());
    }

    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Tab => app.next_view(),
        KeyCode::Char('1') => app.current_view = AppView::Stopwatch,
        KeyCode::Char('2') => app.current_view = AppView::Pomodoro,
        KeyCode::Char('3') => app.current_view = AppView::Custom,
        KeyCode::Char('4') => app.current_view = AppView::Settings,
        KeyCode::Char('k') | KeyCode::Char('K') => app.toggle_sound(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_volume(true),
        KeyCode::Char('-') => app.adjust_volume(false),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_theme(),
        KeyCode::Esc => app.stop_alarm().await,
        _ => match app.current_view {
            AppView::Stopwatch => handle_stopwatch_key(app, code).await,
            AppView::Pomodoro => handle_pomodoro_key(app, code).await,
            AppView::Custom => handle_custom_key(app, code).await,
            AppView::Settings => handle_settings_key(app, code).await,
        },
    }

    Ok(())
}

async fn handle_stopwatch_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_current().await,
        KeyCode::Backspace | KeyCode::Char('r') | KeyCode::Char('R') => app.reset_current().await,
        KeyCode::Enter => app.add_lap().await,
        KeyCode::Char('0') => app.request_clear_laps().await,
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.request_delete_selected_lap().await
        }
        KeyCode::Char('e') | KeyCode::Char('E') => app.export_laps().await,
        KeyCode::Up => app.list_previous(),
        KeyCode::Down => app.list_next(),
        _ => {}
    }
}

async fn handle_pomodoro_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_current().await,
        KeyCode::Backspace | KeyCode::Char('r') | KeyCode::Char('R') => app.reset_current().await,
        KeyCode::Char('b') | KeyCode::Char('B') => app.start_break().await,
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_another().await,
        KeyCode::Char('s') | KeyCode::Char('S') => app.begin_input(InputMode::SetPomodoroMinutes),
        KeyCode::Up => app.adjust_pomodoro_minutes(1).await,
        KeyCode::Down => app.adjust_pomodoro_minutes(-1).await,
        _ => {}
    }
}

async fn handle_custom_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_current().await,
        KeyCode::Backspace | KeyCode::Char('r') | KeyCode::Char('R') => app.reset_current().await,
        KeyCode::Char('s') | KeyCode::Char('S') => app.begin_input(InputMode::SetCustomTime),
        KeyCode::Enter => app.load_selected_preset().await,
        KeyCode::Up => app.list_previous(),
        KeyCode::Down => app.list_next(),
        _ => {}
    }
}

async fn handle_settings_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up => app.list_previous(),
        KeyCode::Down => app.list_next(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => {
            app.change_selected_setting(1).await
        }
        KeyCode::Left | KeyCode::Char('h') => app.change_selected_setting(-1).await,
        KeyCode::Char('x') | KeyCode::Char('X') => app.export_settings().await,
        KeyCode::Char('i') | KeyCode::Char('I') => app.begin_input(InputMode::ImportSettings),
        KeyCode::Char('z') | KeyCode::Char('Z') => app.input_mode = InputMode::ConfirmResetSettings,
        _ => {}
    }
}

fn open_store(data_dir: Option<PathBuf>) -> Result<FileStore> {
    let data_dir = init_data_dir(data_dir)?;
    let path = data_dir.join(STORE_FILENAME);

    let store = match FileStore::open(&path) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Failed to read {}, starting empty: {}", path.display(), e);
            FileStore::empty(&path)
        }
    };
    info!("Using store {}", store.path().display());
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level)?;
    setup_panic_hook();
    info!("TickTock TUI starting up");

    let store = open_store(args.data_dir)?;
    let suite = TimerSuite::new(
        Arc::new(store),
        Arc::new(TokioClock::new()),
        Arc::new(BellSink),
        terminal_prefers_dark(),
    )
    .await;
    let mut events = suite.subscribe();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(suite, args.export_dir, args.view).await;

    loop {
        app.refresh().await;
        terminal.draw(|f| ui::draw(f, &app))?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            received = events.recv() => match received {
                Ok(event) => handle_timer_event(&mut app, event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} timer events", skipped);
                }
                Err(RecvError::Closed) => app.should_quit = true,
            },
            _ = tokio::time::sleep(Duration::from_millis(16)) => {
                if event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            handle_key_event(&mut app, key.code, key.modifiers).await?;
                        }
                    }
                }
            }
        }
    }

    app.suite.shutdown().await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("TickTock TUI shut down");
    Ok(())
}
