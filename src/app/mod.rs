pub mod interaction;
pub mod messages;

mod input;
mod update;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

pub use self::interaction::{InteractionKind, InteractionLayer, InteractionMap};
pub use self::messages::Message;

use crate::keybindings::{KeyContext, Keybindings};
use crate::notification::{NotificationBackend, Notifier, completion_message};
use crate::settings::Settings;
use crate::theme::{Theme, ThemePreset};
use crate::timer::{AutoAdvance, Completion, TimerController};
use crate::todo::{TodoId, TodoList};
use crate::view::{self, PlanView, TimerView, TodoListView};

/// How long a footer notice replaces the key hints.
pub const NOTICE_TTL: Duration = Duration::from_secs(10);

/// Which part of the screen receives key presses.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Focus {
    #[default]
    Timer,
    Input,
    List,
}

impl Focus {
    /// Tab order. The input and rows are only reachable while the list is open.
    pub fn next(self, list_open: bool) -> Self {
        if !list_open {
            return Self::Timer;
        }
        match self {
            Self::Timer => Self::Input,
            Self::Input => Self::List,
            Self::List => Self::Timer,
        }
    }

    pub(crate) fn key_contexts(self) -> &'static [KeyContext] {
        match self {
            Self::Timer => &[KeyContext::Timer, KeyContext::Global],
            Self::List => &[KeyContext::List, KeyContext::Timer, KeyContext::Global],
            Self::Input => &[],
        }
    }
}

/// Startup overrides layered on top of the loaded settings.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub theme: Option<ThemePreset>,
    pub notification_backend: Option<NotificationBackend>,
    pub auto_advance: AutoAdvance,
    /// Where theme changes are persisted; `None` keeps them in memory.
    pub settings_path: Option<PathBuf>,
}

pub struct App {
    pub timer: TimerController,
    pub todos: TodoList,
    pub theme: Theme,
    pub keybindings: Keybindings,
    pub notifier: Notifier,
    pub focus: Focus,
    pub todo_input: String,
    pub selected_row: usize,
    pub show_help: bool,
    pub footer_notice: Option<String>,
    pub interaction_map: InteractionMap,
    pub hovered_message: Option<Message>,
    pub completed_sessions: u32,
    notice_expires_at: Option<Instant>,
    settings: Settings,
    settings_path: Option<PathBuf>,
    should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Settings::default(), AppOptions::default())
    }
}

impl App {
    pub fn new(settings: Settings, options: AppOptions) -> Self {
        let preset = options.theme.unwrap_or_else(|| settings.theme_preset());
        let backend = options
            .notification_backend
            .unwrap_or_else(|| settings.notification_backend());

        info!(
            theme = preset.as_str(),
            notifications = backend.as_str(),
            auto_advance = ?options.auto_advance,
            "app initialized"
        );

        Self {
            timer: TimerController::new().with_auto_advance(options.auto_advance),
            todos: TodoList::new(),
            theme: Theme::from_preset(preset),
            keybindings: Keybindings::from_config(&settings.keybindings),
            notifier: Notifier::new(backend, settings.notification_timeout_ms),
            focus: Focus::default(),
            todo_input: String::new(),
            selected_row: 0,
            show_help: false,
            footer_notice: None,
            interaction_map: InteractionMap::default(),
            hovered_message: None,
            completed_sessions: 0,
            notice_expires_at: None,
            settings,
            settings_path: options.settings_path,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer_view(&self) -> TimerView {
        view::timer_view(&self.timer)
    }

    pub fn plan_view(&self) -> PlanView {
        view::plan_view(&self.todos)
    }

    pub fn todo_list_view(&self) -> TodoListView {
        view::todo_list_view(&self.todos)
    }

    pub fn selected_todo(&self) -> Option<TodoId> {
        self.todos.items().get(self.selected_row).map(|item| item.id)
    }

    /// Whether the event loop has anything to advance: a live countdown or a
    /// notice waiting to expire.
    pub fn needs_tick(&self) -> bool {
        self.timer.is_running() || self.notice_expires_at.is_some()
    }

    /// Advances the countdown to `now` and reacts to any completions.
    pub fn tick_at(&mut self, now: Instant) {
        if self.notice_expires_at.is_some_and(|deadline| now >= deadline) {
            self.clear_notice();
        }
        let completions = self.timer.poll(now);
        for completion in completions {
            self.on_completion(completion, now);
        }
    }

    fn show_notice(&mut self, text: String, now: Instant) {
        self.footer_notice = Some(text);
        self.notice_expires_at = Some(now + NOTICE_TTL);
    }

    fn clear_notice(&mut self) {
        self.footer_notice = None;
        self.notice_expires_at = None;
    }

    fn on_completion(&mut self, completion: Completion, now: Instant) {
        self.completed_sessions = self.completed_sessions.saturating_add(1);
        let plan = self
            .todos
            .next_pending()
            .map(|item| item.text.clone());
        self.notifier
            .notify_session_complete(completion, plan.as_deref());
        self.show_notice(completion_message(completion, plan.as_deref()), now);
    }

    fn clamp_selection(&mut self) {
        let len = self.todos.len();
        if len == 0 {
            self.selected_row = 0;
            if self.focus == Focus::List {
                self.focus = Focus::Input;
            }
        } else if self.selected_row >= len {
            self.selected_row = len - 1;
        }
    }

    fn cycle_theme(&mut self) {
        let preset = self.theme.preset.next();
        self.theme = Theme::from_preset(preset);
        self.settings.theme = preset.as_str().to_string();
        self.show_notice(
            format!("theme: {} ({})", preset.as_str(), preset.description()),
            Instant::now(),
        );
        self.persist_settings("theme");
    }

    fn cycle_notifications(&mut self) {
        let backend = self.notifier.backend.next();
        self.notifier.backend = backend;
        self.settings.notification_backend = backend.as_str().to_string();
        self.show_notice(format!("notifications: {}", backend.as_str()), Instant::now());
        self.persist_settings("notification backend");
    }

    fn persist_settings(&self, changed: &str) {
        if let Some(path) = self.settings_path.as_deref()
            && let Err(err) = self.settings.save_to_path(path)
        {
            warn!(error = %err, changed, "failed to persist settings change");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{FOCUS_DURATION, Mode, Phase};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn quiet_app() -> App {
        App::new(
            Settings::default(),
            AppOptions {
                notification_backend: Some(NotificationBackend::None),
                ..AppOptions::default()
            },
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Message::Key(KeyEvent::new(code, KeyModifiers::empty())))
            .expect("key handled");
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    #[test]
    fn focus_cycle_depends_on_list_visibility() {
        assert_eq!(Focus::Timer.next(false), Focus::Timer);
        assert_eq!(Focus::Input.next(false), Focus::Timer);
        assert_eq!(Focus::Timer.next(true), Focus::Input);
        assert_eq!(Focus::Input.next(true), Focus::List);
        assert_eq!(Focus::List.next(true), Focus::Timer);
    }

    #[test]
    fn timer_keys_drive_the_controller() {
        let mut app = quiet_app();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.timer.phase(), Phase::RunningFocus);

        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.timer.phase(), Phase::RunningBreak);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.timer.phase(), Phase::IdleFocus);
        assert_eq!(app.timer.time_left(), FOCUS_DURATION);
    }

    #[test]
    fn opening_list_focuses_input() {
        let mut app = quiet_app();
        press(&mut app, KeyCode::Char('e'));
        assert!(app.todos.is_open());
        assert_eq!(app.focus, Focus::Input);

        app.update(Message::ToggleTodoList).expect("toggle");
        assert!(!app.todos.is_open());
        assert_eq!(app.focus, Focus::Timer);
    }

    #[test]
    fn typing_in_input_does_not_trigger_shortcuts() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        type_text(&mut app, "  buy milk ");
        assert_eq!(app.timer.phase(), Phase::IdleFocus);
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.todos.plan_text(), "buy milk");
        assert!(app.todo_input.is_empty());
    }

    #[test]
    fn blank_submission_is_ignored() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        type_text(&mut app, "   ");
        app.update(Message::SubmitTodo).expect("submit");
        assert!(app.todos.is_empty());
        assert_eq!(app.todo_input, "   ");
    }

    #[test]
    fn backspace_edits_input() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        type_text(&mut app, "tea");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.todo_input, "te");
    }

    #[test]
    fn list_keys_toggle_and_delete_selected_row() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        for text in ["a", "b"] {
            type_text(&mut app, text);
            press(&mut app, KeyCode::Enter);
        }
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::List);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.todos.plan_text(), "b");

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.selected_row, 0);
        assert!(!app.todos.has_task());
    }

    #[test]
    fn deleting_last_row_moves_focus_to_input() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        type_text(&mut app, "only");
        press(&mut app, KeyCode::Enter);
        let id = app.todos.items()[0].id;

        app.update(Message::SelectTodo(id)).expect("select");
        assert_eq!(app.focus, Focus::List);
        app.update(Message::DeleteTodo(id)).expect("delete");
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = quiet_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.timer.phase(), Phase::IdleFocus);

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }

    #[test]
    fn quit_key_sets_flag() {
        let mut app = quiet_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn cycle_theme_updates_settings_without_path() {
        let mut app = quiet_app();
        app.update(Message::CycleTheme).expect("cycle");
        assert_eq!(app.theme.preset, ThemePreset::Light);
        assert_eq!(app.settings().theme, "light");
    }

    #[test]
    fn cycle_theme_persists_when_path_given() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.toml");
        let mut app = App::new(
            Settings::default(),
            AppOptions {
                notification_backend: Some(NotificationBackend::None),
                settings_path: Some(path.clone()),
                ..AppOptions::default()
            },
        );

        app.update(Message::CycleTheme).expect("cycle");
        let saved = Settings::load_from_path(&path);
        assert_eq!(saved.theme, "light");
    }

    #[test]
    fn completion_sets_footer_notice() {
        let mut app = quiet_app();
        app.update(Message::ToggleTodoList).expect("open");
        type_text(&mut app, "write tests");
        press(&mut app, KeyCode::Enter);

        app.update(Message::SwitchToBreak).expect("break");
        app.tick_at(Instant::now() + Duration::from_secs(600));

        assert_eq!(app.completed_sessions, 1);
        assert_eq!(app.timer.mode(), Mode::Focus);
        assert!(app.timer.is_running());
        assert_eq!(
            app.footer_notice.as_deref(),
            Some("Break over | focus started | next: write tests")
        );
    }

    #[test]
    fn completion_notice_expires_after_ttl() {
        let mut app = quiet_app();
        app.update(Message::SwitchToBreak).expect("break");
        let finished_at = Instant::now() + Duration::from_secs(600);
        app.tick_at(finished_at);
        assert!(app.footer_notice.is_some());

        app.tick_at(finished_at + NOTICE_TTL / 2);
        assert!(app.footer_notice.is_some(), "notice still fresh");

        app.tick_at(finished_at + NOTICE_TTL);
        assert_eq!(app.footer_notice, None);
        assert!(app.needs_tick(), "focus countdown keeps ticking");
    }

    #[test]
    fn timer_command_clears_notice() {
        let mut app = quiet_app();
        app.update(Message::SwitchToBreak).expect("break");
        app.tick_at(Instant::now() + Duration::from_secs(600));
        assert!(app.footer_notice.is_some());

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.footer_notice, None);
        assert!(!app.needs_tick());
    }

    #[test]
    fn idle_app_without_notice_needs_no_ticks() {
        let mut app = quiet_app();
        assert!(!app.needs_tick());

        press(&mut app, KeyCode::Char(' '));
        assert!(app.needs_tick());

        press(&mut app, KeyCode::Char(' '));
        assert!(!app.needs_tick());

        app.update(Message::CycleTheme).expect("cycle");
        assert!(app.needs_tick(), "theme notice waits to expire");
    }

    #[test]
    fn notification_key_cycles_and_persists_backend() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.toml");
        let mut app = App::new(
            Settings::default(),
            AppOptions {
                settings_path: Some(path.clone()),
                ..AppOptions::default()
            },
        );
        assert_eq!(app.notifier.backend, NotificationBackend::Log);

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.notifier.backend, NotificationBackend::Bell);
        assert_eq!(app.footer_notice.as_deref(), Some("notifications: bell"));
        assert_eq!(Settings::load_from_path(&path).notification_backend, "bell");

        for _ in 0..4 {
            app.update(Message::CycleNotifications).expect("cycle");
        }
        assert_eq!(app.notifier.backend, NotificationBackend::Log);
    }
}
