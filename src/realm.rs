//! tui-realm glue. A single root component owns the shared [`App`], renders
//! it, and turns terminal events into [`Message`]s.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::error;
use tuirealm::{
    Application, AttrValue, Attribute, Component, Event, EventListenerCfg, Frame, MockComponent,
    NoUserEvent, Props, State,
    command::{Cmd, CmdResult},
    event::{
        Key as RealmKey, KeyEvent as RealmKeyEvent, KeyModifiers as RealmKeyModifiers,
        MouseButton as RealmMouseButton, MouseEvent as RealmMouseEvent,
        MouseEventKind as RealmMouseEventKind,
    },
    ratatui::layout::Rect,
};

use crate::{
    app::{App, Message},
    ui,
};

pub type SharedApp = Arc<Mutex<App>>;

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum RootId {
    Root,
}

/// Mounts the root component. `poll_interval` is how often a running
/// countdown is polled, not the countdown period itself.
pub fn init_application(
    app: SharedApp,
    poll_interval: Duration,
) -> Result<Application<RootId, Message, NoUserEvent>> {
    let mut application: Application<RootId, Message, NoUserEvent> = Application::init(
        EventListenerCfg::default()
            .crossterm_input_listener(Duration::from_millis(20), 3)
            .poll_timeout(Duration::from_millis(10))
            .tick_interval(poll_interval),
    );

    application
        .mount(RootId::Root, Box::new(RootComponent::new(app)), Vec::new())
        .context("failed to mount pomodoro root component")?;
    application
        .active(&RootId::Root)
        .context("failed to activate pomodoro root component")?;

    Ok(application)
}

pub fn apply_message(shared_app: &SharedApp, message: Message) -> Result<()> {
    lock_app(shared_app)?.update(message)
}

pub fn should_quit(shared_app: &SharedApp) -> Result<bool> {
    Ok(lock_app(shared_app)?.should_quit())
}

fn lock_app(shared_app: &SharedApp) -> Result<MutexGuard<'_, App>> {
    shared_app
        .lock()
        .map_err(|_| anyhow!("pomodoro app state lock poisoned"))
}

struct RootComponent {
    props: Props,
    app: SharedApp,
    lock_poisoned: bool,
}

impl RootComponent {
    fn new(app: SharedApp) -> Self {
        Self {
            props: Props::default(),
            app,
            lock_poisoned: false,
        }
    }

    /// Ticks only matter while a countdown runs or a notice is waiting to
    /// expire; otherwise the frame would not change.
    fn wants_tick(&mut self) -> bool {
        let needs_tick = self.app.lock().map(|app| app.needs_tick()).ok();
        if needs_tick.is_none() {
            self.report_poisoned();
        }
        needs_tick.unwrap_or(false)
    }

    fn report_poisoned(&mut self) {
        if !self.lock_poisoned {
            error!("app state lock poisoned; the timer can no longer be drawn or advanced");
            self.lock_poisoned = true;
        }
    }
}

impl MockComponent for RootComponent {
    fn view(&mut self, frame: &mut Frame, _area: Rect) {
        let rendered = match self.app.lock() {
            Ok(mut app) => {
                ui::render(frame, &mut app);
                true
            }
            Err(_) => false,
        };
        if !rendered {
            self.report_poisoned();
        }
    }

    fn query(&self, attr: Attribute) -> Option<AttrValue> {
        self.props.get(attr)
    }

    fn attr(&mut self, attr: Attribute, value: AttrValue) {
        self.props.set(attr, value);
    }

    fn state(&self) -> State {
        State::None
    }

    fn perform(&mut self, _cmd: Cmd) -> CmdResult {
        CmdResult::None
    }
}

impl Component<Message, NoUserEvent> for RootComponent {
    fn on(&mut self, ev: Event<NoUserEvent>) -> Option<Message> {
        match ev {
            Event::Keyboard(key) => key_message(key),
            Event::Mouse(mouse) => mouse_message(mouse),
            Event::WindowResize(width, height) => Some(Message::Resize(width, height)),
            Event::Tick => self.wants_tick().then_some(Message::Tick),
            _ => None,
        }
    }
}

/// Keys outside what a keybinding or the task input can use never reach the app.
fn key_message(key: RealmKeyEvent) -> Option<Message> {
    let code = match key.code {
        RealmKey::Char(ch) => KeyCode::Char(ch),
        RealmKey::Function(index) => KeyCode::F(index),
        RealmKey::Enter => KeyCode::Enter,
        RealmKey::Esc => KeyCode::Esc,
        RealmKey::Tab => KeyCode::Tab,
        RealmKey::BackTab => KeyCode::BackTab,
        RealmKey::Backspace => KeyCode::Backspace,
        RealmKey::Delete => KeyCode::Delete,
        RealmKey::Up => KeyCode::Up,
        RealmKey::Down => KeyCode::Down,
        RealmKey::Left => KeyCode::Left,
        RealmKey::Right => KeyCode::Right,
        RealmKey::Home => KeyCode::Home,
        RealmKey::End => KeyCode::End,
        _ => return None,
    };
    Some(Message::Key(KeyEvent::new(code, modifiers(key.modifiers))))
}

const MODIFIERS: [(RealmKeyModifiers, KeyModifiers); 3] = [
    (RealmKeyModifiers::SHIFT, KeyModifiers::SHIFT),
    (RealmKeyModifiers::CONTROL, KeyModifiers::CONTROL),
    (RealmKeyModifiers::ALT, KeyModifiers::ALT),
];

fn modifiers(realm: RealmKeyModifiers) -> KeyModifiers {
    MODIFIERS
        .iter()
        .filter(|(from, _)| realm.contains(*from))
        .fold(KeyModifiers::empty(), |acc, (_, to)| acc | *to)
}

/// Left clicks, hover and vertical scroll are the only gestures the screen
/// reacts to.
fn mouse_message(mouse: RealmMouseEvent) -> Option<Message> {
    let kind = match mouse.kind {
        RealmMouseEventKind::Down(RealmMouseButton::Left) => MouseEventKind::Down(MouseButton::Left),
        RealmMouseEventKind::Moved => MouseEventKind::Moved,
        RealmMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        RealmMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        _ => return None,
    };
    Some(Message::Mouse(MouseEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
        modifiers: modifiers(mouse.modifiers),
    }))
}
