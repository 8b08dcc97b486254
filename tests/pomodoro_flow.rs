use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::TempDir;
use tuirealm::ratatui::{Terminal, backend::TestBackend};

use pomodoro_todo::app::{App, AppOptions, Focus, Message};
use pomodoro_todo::notification::NotificationBackend;
use pomodoro_todo::settings::Settings;
use pomodoro_todo::timer::{AutoAdvance, BREAK_DURATION, FOCUS_DURATION, Mode, Phase};
use pomodoro_todo::ui;

fn app_with(auto_advance: AutoAdvance) -> App {
    App::new(
        Settings::default(),
        AppOptions {
            notification_backend: Some(NotificationBackend::None),
            auto_advance,
            ..AppOptions::default()
        },
    )
}

fn key(app: &mut App, code: KeyCode) -> Result<()> {
    app.update(Message::Key(KeyEvent::new(code, KeyModifiers::empty())))
}

fn add_task(app: &mut App, text: &str) -> Result<()> {
    if app.focus != Focus::Input {
        app.update(Message::FocusInput)?;
    }
    for ch in text.chars() {
        key(app, KeyCode::Char(ch))?;
    }
    key(app, KeyCode::Enter)
}

/// Lets a whole countdown elapse in one poll.
fn finish_countdown(app: &mut App) {
    app.tick_at(Instant::now() + Duration::from_secs(u64::from(FOCUS_DURATION) + 5));
}

#[test]
fn focus_break_focus_chain() -> Result<()> {
    let mut app = app_with(AutoAdvance::Unlimited);

    app.update(Message::SwitchToFocus)?;
    assert_eq!(app.timer.phase(), Phase::RunningFocus);

    finish_countdown(&mut app);
    assert_eq!(app.timer.phase(), Phase::RunningBreak);
    assert_eq!(app.timer.time_left(), BREAK_DURATION);
    assert_eq!(app.completed_sessions, 1);

    finish_countdown(&mut app);
    assert_eq!(app.timer.phase(), Phase::RunningFocus);
    assert_eq!(app.timer.time_left(), FOCUS_DURATION);
    assert_eq!(app.completed_sessions, 2);
    Ok(())
}

#[test]
fn cycle_limit_leaves_timer_idle_at_zero() -> Result<()> {
    let mut app = app_with(AutoAdvance::Limited(1));

    app.update(Message::ToggleTimer)?;
    finish_countdown(&mut app);
    assert_eq!(app.timer.phase(), Phase::RunningBreak);

    finish_countdown(&mut app);
    assert_eq!(app.timer.phase(), Phase::IdleBreak);
    assert_eq!(app.timer.time_left(), 0);
    assert_eq!(app.timer_view().minutes, "00");

    app.update(Message::ToggleTimer)?;
    assert!(!app.timer.is_running(), "nothing left to count down");

    app.update(Message::ResetTimer)?;
    assert_eq!(app.timer.phase(), Phase::IdleFocus);
    assert_eq!(app.timer.time_left(), FOCUS_DURATION);

    app.update(Message::ToggleTimer)?;
    finish_countdown(&mut app);
    assert_eq!(
        app.timer.phase(),
        Phase::RunningBreak,
        "reset gives the chain a fresh budget"
    );
    Ok(())
}

#[test]
fn paused_timer_ignores_elapsed_time() -> Result<()> {
    let mut app = app_with(AutoAdvance::Unlimited);

    key(&mut app, KeyCode::Char(' '))?;
    key(&mut app, KeyCode::Char(' '))?;
    app.tick_at(Instant::now() + Duration::from_secs(120));

    assert_eq!(app.timer.time_left(), FOCUS_DURATION);
    assert_eq!(app.timer.phase(), Phase::IdleFocus);
    Ok(())
}

#[test]
fn plan_label_follows_first_pending_task() -> Result<()> {
    let mut app = app_with(AutoAdvance::Unlimited);
    assert_eq!(app.plan_view().text, "Plans for today?");

    key(&mut app, KeyCode::Char('e'))?;
    add_task(&mut app, "a")?;
    add_task(&mut app, "b")?;
    assert_eq!(app.plan_view().text, "a");
    assert!(app.plan_view().has_task);

    let first = app.todos.items()[0].id;
    app.update(Message::ToggleTodo(first))?;
    assert_eq!(app.plan_view().text, "b");

    let second = app.todos.items()[1].id;
    app.update(Message::DeleteTodo(second))?;
    assert_eq!(app.plan_view().text, "Plans for today?");
    assert!(!app.plan_view().has_task);

    app.update(Message::DeleteTodo(second))?;
    assert_eq!(app.todos.len(), 1);
    Ok(())
}

#[test]
fn switching_modes_from_keyboard() -> Result<()> {
    let mut app = app_with(AutoAdvance::Unlimited);

    key(&mut app, KeyCode::Char('b'))?;
    assert_eq!(app.timer.mode(), Mode::Break);
    assert!(app.timer.is_running());

    key(&mut app, KeyCode::Char('b'))?;
    assert_eq!(app.timer.phase(), Phase::IdleBreak);

    key(&mut app, KeyCode::Char('f'))?;
    assert_eq!(app.timer.phase(), Phase::RunningFocus);
    assert_eq!(app.timer.time_left(), FOCUS_DURATION);
    Ok(())
}

#[test]
fn rendered_frame_reflects_state() -> Result<()> {
    let mut app = app_with(AutoAdvance::Unlimited);
    key(&mut app, KeyCode::Char('e'))?;
    add_task(&mut app, "ship release")?;
    key(&mut app, KeyCode::Esc)?;
    key(&mut app, KeyCode::Char('b'))?;

    let mut terminal = Terminal::new(TestBackend::new(80, 30))?;
    terminal.draw(|frame| ui::render(frame, &mut app))?;
    let buffer = terminal.backend().buffer();
    let screen: String = buffer
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();

    assert!(screen.contains("05:00"));
    assert!(screen.contains("PAUSE"));
    assert!(screen.contains("FOCUS"));
    assert!(screen.contains("[ ] ship release"));
    Ok(())
}

#[test]
fn theme_changes_persist_to_settings_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pomodoro-todo").join("settings.toml");
    let mut app = App::new(
        Settings::default(),
        AppOptions {
            notification_backend: Some(NotificationBackend::None),
            settings_path: Some(path.clone()),
            ..AppOptions::default()
        },
    );

    key(&mut app, KeyCode::Char('t'))?;
    key(&mut app, KeyCode::Char('t'))?;

    let saved = Settings::load_from_path(&path);
    assert_eq!(saved.theme, "high-contrast");
    Ok(())
}
