//! Notification backends fired when a countdown reaches zero

use std::io::{self, Write};
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::timer::{Completion, Mode};

/// Notification backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationBackend {
    /// No notifications
    None,
    /// Log line only
    #[default]
    Log,
    /// Terminal bell
    Bell,
    /// Desktop notification (via notify-rust)
    System,
    /// Terminal bell and desktop notification
    Both,
}

impl NotificationBackend {
    pub const ALL: [Self; 5] = [Self::None, Self::Log, Self::Bell, Self::System, Self::Both];

    /// Parse backend from settings value (case-insensitive)
    pub fn from_settings_value(s: &str) -> Option<Self> {
        Self::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Log => "log",
            Self::Bell => "bell",
            Self::System => "system",
            Self::Both => "both",
        }
    }

    /// Cycling order: log -> bell -> system -> both -> none -> log
    pub fn next(&self) -> Self {
        match self {
            Self::Log => Self::Bell,
            Self::Bell => Self::System,
            Self::System => Self::Both,
            Self::Both => Self::None,
            Self::None => Self::Log,
        }
    }
}

impl FromStr for NotificationBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "log" => Ok(Self::Log),
            "bell" | "beep" => Ok(Self::Bell),
            "system" | "desktop" => Ok(Self::System),
            "both" => Ok(Self::Both),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct Targets {
    log: bool,
    bell: bool,
    system: bool,
}

fn backend_targets(backend: NotificationBackend) -> Targets {
    match backend {
        NotificationBackend::None => Targets {
            log: false,
            bell: false,
            system: false,
        },
        NotificationBackend::Log => Targets {
            log: true,
            bell: false,
            system: false,
        },
        NotificationBackend::Bell => Targets {
            log: true,
            bell: true,
            system: false,
        },
        NotificationBackend::System => Targets {
            log: true,
            bell: false,
            system: true,
        },
        NotificationBackend::Both => Targets {
            log: true,
            bell: true,
            system: true,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notifier {
    pub backend: NotificationBackend,
    pub display_duration_ms: u64,
}

impl Notifier {
    pub fn new(backend: NotificationBackend, display_duration_ms: u64) -> Self {
        Self {
            backend,
            display_duration_ms,
        }
    }

    /// Send session completion notification via configured backend(s)
    pub fn notify_session_complete(&self, completion: Completion, plan: Option<&str>) {
        let targets = backend_targets(self.backend);
        if !targets.log && !targets.bell && !targets.system {
            debug!(mode = %completion.finished, "notification skipped (backend is none)");
            return;
        }

        let message = completion_message(completion, plan);

        if targets.log {
            info!(mode = %completion.finished, message = %message, "Time's up!");
        }

        if targets.bell {
            ring_bell();
        }

        if targets.system {
            send_system_notification(message, self.display_duration_ms);
        }
    }
}

pub fn completion_message(completion: Completion, plan: Option<&str>) -> String {
    let headline = match (completion.finished, completion.advanced) {
        (Mode::Focus, true) => "Focus session done | break started",
        (Mode::Focus, false) => "Focus session done",
        (Mode::Break, true) => "Break over | focus started",
        (Mode::Break, false) => "Break over",
    };
    match plan {
        Some(plan) if completion.finished == Mode::Break => format!("{headline} | next: {plan}"),
        _ => headline.to_string(),
    }
}

fn ring_bell() {
    let mut stdout = io::stdout();
    if let Err(err) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
        warn!(error = %err, "failed to ring terminal bell");
    }
}

fn send_system_notification(message: String, display_duration_ms: u64) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(move || show_system_notification(&message, display_duration_ms));
        }
        Err(_) => show_system_notification(&message, display_duration_ms),
    }
}

fn show_system_notification(message: &str, display_duration_ms: u64) {
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        let timeout_ms = display_duration_ms.min(u32::MAX as u64) as u32;
        debug!(message = %message, timeout_ms, "sending system notification");

        let notification_result = notify_rust::Notification::new()
            .summary("Pomodoro")
            .body(message)
            .icon("alarm-clock")
            .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
            .show();

        match notification_result {
            Ok(_) => debug!("system notification sent successfully"),
            Err(err) => warn!(error = %err, "failed to send system notification"),
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        let _ = display_duration_ms;
        debug!(message = %message, "system notifications not supported on this OS");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_backend_from_str() {
        assert_eq!(
            NotificationBackend::from_settings_value("Log"),
            Some(NotificationBackend::Log)
        );
        assert_eq!(
            NotificationBackend::from_settings_value("BEEP"),
            Some(NotificationBackend::Bell)
        );
        assert_eq!(
            NotificationBackend::from_settings_value("desktop"),
            Some(NotificationBackend::System)
        );
        assert_eq!(
            NotificationBackend::from_settings_value(" off "),
            Some(NotificationBackend::None)
        );
        assert_eq!(NotificationBackend::from_settings_value("invalid"), None);
        assert_eq!(NotificationBackend::from_settings_value(""), None);
    }

    #[test]
    fn test_notification_backend_roundtrip() {
        for backend in NotificationBackend::ALL {
            let parsed = NotificationBackend::from_settings_value(backend.as_str());
            assert_eq!(parsed, Some(backend), "roundtrip failed for {}", backend.as_str());
        }
    }

    #[test]
    fn test_notification_backend_next_visits_all() {
        let mut backend = NotificationBackend::default();
        let mut seen = Vec::new();
        for _ in 0..NotificationBackend::ALL.len() {
            seen.push(backend);
            backend = backend.next();
        }
        assert_eq!(backend, NotificationBackend::default());
        for candidate in NotificationBackend::ALL {
            assert!(seen.contains(&candidate));
        }
    }

    #[test]
    fn test_backend_targets() {
        assert!(!backend_targets(NotificationBackend::None).log);
        assert_eq!(
            backend_targets(NotificationBackend::Both),
            Targets {
                log: true,
                bell: true,
                system: true
            }
        );
        assert!(!backend_targets(NotificationBackend::Bell).system);
    }

    #[test]
    fn test_completion_message() {
        let focus_done = Completion {
            finished: Mode::Focus,
            advanced: true,
        };
        assert_eq!(
            completion_message(focus_done, Some("ignored")),
            "Focus session done | break started"
        );

        let break_done = Completion {
            finished: Mode::Break,
            advanced: true,
        };
        assert_eq!(
            completion_message(break_done, Some("write tests")),
            "Break over | focus started | next: write tests"
        );
        assert_eq!(completion_message(break_done, None), "Break over | focus started");
    }
}
