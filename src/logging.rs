use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_LEVEL_ENV: &str = "POMODORO_TODO_LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "warn";
const SESSION_LOG_PREFIX: &str = "session-";
const SESSION_LOG_SUFFIX: &str = ".log";

/// Session logs kept on disk, including the one being written.
pub const MAX_SESSION_LOGS: usize = 10;

/// One timer session's log file. Dropping it flushes buffered lines.
pub struct LogSession {
    path: PathBuf,
    _guard: WorkerGuard,
}

impl LogSession {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Installs the file subscriber for this run. `cli_level` wins over
/// `POMODORO_TODO_LOG_LEVEL`.
pub fn init_logging(cli_level: Option<&str>) -> Result<LogSession> {
    let log_dir = log_directory()?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory '{}'", log_dir.display()))?;

    let pruned = prune_session_logs(&log_dir, MAX_SESSION_LOGS - 1).unwrap_or(0);

    let path = log_dir.join(session_log_name(Local::now()));
    let file = fs::File::create(&path)
        .with_context(|| format!("failed to create log file '{}'", path.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = resolve_level(cli_level, env_level.as_deref());

    tracing_subscriber::registry()
        .with(EnvFilter::new(format!("{level},pomodoro_todo={level}")))
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    tracing::info!(
        version = env!("POMODORO_TODO_BUILD_VERSION"),
        level,
        pruned,
        "pomodoro session log started"
    );

    Ok(LogSession {
        path,
        _guard: guard,
    })
}

fn resolve_level(cli: Option<&str>, env: Option<&str>) -> &'static str {
    cli.and_then(normalize_log_level)
        .or_else(|| env.and_then(normalize_log_level))
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

fn normalize_log_level(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

pub fn log_directory() -> Result<PathBuf> {
    let data_dir =
        dirs::data_local_dir().ok_or_else(|| anyhow!("failed to determine local data directory"))?;
    Ok(data_dir.join("pomodoro-todo").join("logs"))
}

fn session_log_name(started: DateTime<Local>) -> String {
    format!(
        "{SESSION_LOG_PREFIX}{}{SESSION_LOG_SUFFIX}",
        started.format("%Y-%m-%d_%H-%M-%S")
    )
}

fn is_session_log(name: &str) -> bool {
    name.starts_with(SESSION_LOG_PREFIX) && name.ends_with(SESSION_LOG_SUFFIX)
}

/// Deletes the oldest session logs until at most `keep` remain. Timestamped
/// names sort chronologically. Returns how many files were removed.
pub fn prune_session_logs(log_dir: &Path, keep: usize) -> Result<usize> {
    let mut names: Vec<String> = fs::read_dir(log_dir)
        .with_context(|| format!("failed to read log directory '{}'", log_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_session_log(name))
        .collect();

    if names.len() <= keep {
        return Ok(0);
    }

    names.sort();
    let excess = names.len() - keep;
    let mut removed = 0;
    for name in names.into_iter().take(excess) {
        if fs::remove_file(log_dir.join(&name)).is_ok() {
            removed += 1;
        }
    }
    Ok(removed)
}

pub fn print_log_location(session: &LogSession) {
    println!("pomodoro-todo session log: {}", session.path().display());
}
