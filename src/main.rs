use std::{
    io::{self, Write},
    panic,
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::DisableMouseCapture,
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tracing::info;
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use pomodoro_todo::{
    app::{App, AppOptions},
    logging::{init_logging, print_log_location},
    notification::NotificationBackend,
    realm::{RootId, apply_message, init_application, should_quit},
    settings::Settings,
    theme::ThemePreset,
    timer::AutoAdvance,
};

#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-todo",
    about = "Terminal Pomodoro timer with a single-focus to-do list",
    long_about = "A TUI Pomodoro timer that alternates 25 minute focus sessions with 5 minute breaks, \
                  showing the first unfinished task from a small to-do list.",
    version = env!("POMODORO_TODO_BUILD_VERSION"),
    author
)]
struct Cli {
    /// Theme preset: default, light, high-contrast, mono
    #[arg(long, value_name = "PRESET")]
    theme: Option<String>,

    /// Completion notification backend: none, log, bell, system, both
    #[arg(long, value_name = "BACKEND")]
    notify: Option<String>,

    /// Auto-advances allowed before the timer waits for you; reset restores the budget
    #[arg(long, value_name = "N")]
    cycles: Option<u32>,

    /// Log level for the session log: trace, debug, info, warn, error
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_session = match init_logging(cli.log_level.as_deref()) {
        Ok(session) => Some(session),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err:#}");
            None
        }
    };
    if let Some(session) = log_session.as_ref() {
        install_panic_hook_with_log(session.path().to_path_buf());
    }

    let result = run_app(cli);
    if let Some(session) = log_session.as_ref() {
        print_log_location(session);
    }
    result
}

fn run_app(cli: Cli) -> Result<()> {
    let settings = Settings::load();
    let options = build_options(&cli)?;
    let tick_interval = Duration::from_millis(settings.tick_poll_ms);

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::new(settings, options)));
    let mut realm = init_application(Arc::clone(&app), tick_interval)?;

    let mut redraw = true;
    while !should_quit(&app)? {
        if redraw {
            terminal
                .draw(|frame| realm.view(&RootId::Root, frame, frame.area()))
                .context("failed to render frame")?;
            redraw = false;
        }

        let messages = realm
            .tick(PollStrategy::Once)
            .context("failed to process tui-realm tick")?;

        if !messages.is_empty() {
            redraw = true;
        }

        for message in messages {
            apply_message(&app, message)?;
        }
    }

    info!("shutting down");

    let _ = terminal.disable_mouse_capture();
    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    Ok(())
}

fn build_options(cli: &Cli) -> Result<AppOptions> {
    let theme = cli
        .theme
        .as_deref()
        .map(|value| {
            ThemePreset::from_str(value).map_err(|()| {
                anyhow!(
                    "unknown theme preset '{value}' (expected one of: {})",
                    choices(ThemePreset::ALL.iter().map(|preset| preset.as_str()))
                )
            })
        })
        .transpose()?;
    let notification_backend = cli
        .notify
        .as_deref()
        .map(|value| {
            NotificationBackend::from_settings_value(value)
                .ok_or_else(|| {
                    anyhow!(
                        "unknown notification backend '{value}' (expected one of: {})",
                        choices(NotificationBackend::ALL.iter().map(|backend| backend.as_str()))
                    )
                })
        })
        .transpose()?;
    let auto_advance = cli
        .cycles
        .map(AutoAdvance::Limited)
        .unwrap_or_default();

    Ok(AppOptions {
        theme,
        notification_backend,
        auto_advance,
        settings_path: Settings::config_path(),
    })
}

fn choices<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;
    terminal
        .enable_mouse_capture()
        .context("failed to enable mouse capture")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("═══════════════════════════════════════════════════════════════");
        eprintln!("  Log file: {}", log_path.display());
        eprintln!("═══════════════════════════════════════════════════════════════");
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(
        stderr,
        LeaveAlternateScreen,
        DisableMouseCapture,
        Show,
        ResetColor
    );
    let _ = stderr.write_all(
        b"\x1b[?1049l\x1b[?1000l\x1b[?1002l\x1b[?1003l\x1b[?1006l\x1b[?25h\x1b[0m\x1b[2J\x1b[H",
    );
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}
