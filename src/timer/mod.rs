//! Pomodoro countdown state machine.
//!
//! Transitions are described by [`step`], a table from `(state, input)` to a
//! list of [`Command`]s. [`TimerController`] owns the single [`TimerState`] and
//! applies those commands against a [`TickSource`]. Completion chains
//! (focus -> break -> focus) are queued as follow-up inputs instead of nested
//! calls, and can be capped with [`AutoAdvance::Limited`].

pub mod ticker;

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use tracing::{debug, trace};

pub use self::ticker::{IntervalTicker, TICK_PERIOD, TickHandle, TickSource};

pub const FOCUS_DURATION: u32 = 25 * 60;
pub const BREAK_DURATION: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Mode {
    #[default]
    Focus,
    Break,
}

impl Mode {
    pub const fn duration(self) -> u32 {
        match self {
            Self::Focus => FOCUS_DURATION,
            Self::Break => BREAK_DURATION,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Focus => Self::Break,
            Self::Break => Self::Focus,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Break => "break",
        }
    }

    /// Button caption when the mode is not counting down.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Focus => "FOCUS",
            Self::Break => "BREAK",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "focus" | "work" => Ok(Self::Focus),
            "break" | "rest" => Ok(Self::Break),
            _ => Err(()),
        }
    }
}

/// Cross product of mode and running flag.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    IdleFocus,
    RunningFocus,
    IdleBreak,
    RunningBreak,
}

impl Phase {
    pub const fn mode(self) -> Mode {
        match self {
            Self::IdleFocus | Self::RunningFocus => Mode::Focus,
            Self::IdleBreak | Self::RunningBreak => Mode::Break,
        }
    }

    pub const fn is_running(self) -> bool {
        matches!(self, Self::RunningFocus | Self::RunningBreak)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TimerState {
    pub running: bool,
    pub mode: Mode,
    pub time_left: u32,
    pub tick_handle: Option<TickHandle>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            running: false,
            mode: Mode::Focus,
            time_left: FOCUS_DURATION,
            tick_handle: None,
        }
    }
}

impl TimerState {
    pub fn phase(&self) -> Phase {
        match (self.mode, self.running) {
            (Mode::Focus, false) => Phase::IdleFocus,
            (Mode::Focus, true) => Phase::RunningFocus,
            (Mode::Break, false) => Phase::IdleBreak,
            (Mode::Break, true) => Phase::RunningBreak,
        }
    }

    pub fn clock(&self) -> ClockDisplay {
        ClockDisplay::from_seconds(self.time_left)
    }

    /// Caption and active flag for the button controlling `mode`.
    pub fn button(&self, mode: Mode) -> ModeButton {
        let active = self.mode == mode;
        let label = if active && self.running {
            "PAUSE"
        } else {
            mode.label()
        };
        ModeButton { label, active }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ModeButton {
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ClockDisplay {
    pub minutes: u32,
    pub seconds: u32,
}

impl ClockDisplay {
    pub fn from_seconds(total: u32) -> Self {
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    pub fn minutes_text(&self) -> String {
        format!("{:02}", self.minutes)
    }

    pub fn seconds_text(&self) -> String {
        format!("{:02}", self.seconds)
    }
}

impl fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimerInput {
    Start,
    Pause,
    Toggle,
    Reset,
    SwitchTo(Mode),
    Tick,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    RegisterTick,
    CancelTick,
    Complete(Mode),
    Advance(Mode),
}

/// Transition table. Mutates the countdown fields of `state` and returns the
/// side effects the controller must apply, in order.
pub fn step(state: &mut TimerState, input: TimerInput) -> Vec<Command> {
    let mut commands = Vec::new();
    match input {
        TimerInput::Start => launch(state, &mut commands),
        TimerInput::Pause => halt(state, &mut commands),
        TimerInput::Toggle if state.running => halt(state, &mut commands),
        TimerInput::Toggle => launch(state, &mut commands),
        TimerInput::Reset => {
            halt(state, &mut commands);
            state.mode = Mode::Focus;
            state.time_left = FOCUS_DURATION;
        }
        TimerInput::SwitchTo(target) if target == state.mode => {
            if state.running {
                halt(state, &mut commands);
            } else {
                launch(state, &mut commands);
            }
        }
        TimerInput::SwitchTo(target) => {
            halt(state, &mut commands);
            state.mode = target;
            state.time_left = target.duration();
            launch(state, &mut commands);
        }
        TimerInput::Tick if !state.running => {}
        TimerInput::Tick => {
            state.time_left = state.time_left.saturating_sub(1);
            if state.time_left == 0 {
                halt(state, &mut commands);
                commands.push(Command::Complete(state.mode));
                commands.push(Command::Advance(state.mode.other()));
            }
        }
    }
    commands
}

fn launch(state: &mut TimerState, commands: &mut Vec<Command>) {
    if state.running || state.time_left == 0 {
        return;
    }
    state.running = true;
    commands.push(Command::RegisterTick);
}

fn halt(state: &mut TimerState, commands: &mut Vec<Command>) {
    if !state.running {
        return;
    }
    state.running = false;
    commands.push(Command::CancelTick);
}

/// How many completion hand-offs the controller performs on its own before
/// waiting for the user. `reset` restores the full budget.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum AutoAdvance {
    #[default]
    Unlimited,
    Limited(u32),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Completion {
    pub finished: Mode,
    /// Whether the next countdown was started automatically.
    pub advanced: bool,
}

pub struct TimerController<S = IntervalTicker> {
    state: TimerState,
    ticker: S,
    auto_advance: AutoAdvance,
    advances: u32,
}

impl TimerController<IntervalTicker> {
    pub fn new() -> Self {
        Self::with_ticker(IntervalTicker::new())
    }
}

impl Default for TimerController<IntervalTicker> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TickSource> TimerController<S> {
    pub fn with_ticker(ticker: S) -> Self {
        Self {
            state: TimerState::default(),
            ticker,
            auto_advance: AutoAdvance::Unlimited,
            advances: 0,
        }
    }

    pub fn with_auto_advance(mut self, auto_advance: AutoAdvance) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn ticker(&self) -> &S {
        &self.ticker
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn time_left(&self) -> u32 {
        self.state.time_left
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn clock(&self) -> ClockDisplay {
        self.state.clock()
    }

    pub fn button(&self, mode: Mode) -> ModeButton {
        self.state.button(mode)
    }

    pub fn start(&mut self) {
        self.dispatch(TimerInput::Start);
    }

    pub fn pause(&mut self) {
        self.dispatch(TimerInput::Pause);
    }

    pub fn toggle(&mut self) {
        self.dispatch(TimerInput::Toggle);
    }

    pub fn reset(&mut self) {
        self.dispatch(TimerInput::Reset);
    }

    pub fn switch_to_focus(&mut self) {
        self.dispatch(TimerInput::SwitchTo(Mode::Focus));
    }

    pub fn switch_to_break(&mut self) {
        self.dispatch(TimerInput::SwitchTo(Mode::Break));
    }

    pub fn on_tick(&mut self) -> Option<Completion> {
        self.dispatch(TimerInput::Tick).into_iter().next()
    }

    /// Runs one countdown step for every tick the source reports as due.
    ///
    /// Draining stops at a completion: a countdown started by auto-advance
    /// counts from its own registration, never from overdue time.
    pub fn poll(&mut self, now: Instant) -> Vec<Completion> {
        while self.state.running && self.ticker.take_due(now) {
            if let Some(completion) = self.on_tick() {
                return vec![completion];
            }
        }
        Vec::new()
    }

    pub fn dispatch(&mut self, input: TimerInput) -> Vec<Completion> {
        let mut pending = VecDeque::from([input]);
        let mut completions: Vec<Completion> = Vec::new();

        while let Some(input) = pending.pop_front() {
            if input == TimerInput::Reset && self.advances > 0 {
                debug!(spent = self.advances, "auto-advance budget restored");
                self.advances = 0;
            }
            let before = self.state.phase();
            for command in step(&mut self.state, input) {
                match command {
                    Command::RegisterTick => {
                        self.state.tick_handle = Some(self.ticker.register());
                    }
                    Command::CancelTick => {
                        if let Some(handle) = self.state.tick_handle.take() {
                            self.ticker.cancel(handle);
                        }
                    }
                    Command::Complete(mode) => {
                        debug!(mode = %mode, "countdown complete");
                        completions.push(Completion {
                            finished: mode,
                            advanced: false,
                        });
                    }
                    Command::Advance(next) => {
                        if self.take_advance() {
                            if let Some(last) = completions.last_mut() {
                                last.advanced = true;
                            }
                            pending.push_back(TimerInput::SwitchTo(next));
                        } else {
                            debug!(next = %next, "auto-advance limit reached");
                        }
                    }
                }
            }

            if input == TimerInput::Tick {
                trace!(time_left = self.state.time_left, "tick");
            } else {
                debug!(
                    ?input,
                    ?before,
                    after = ?self.state.phase(),
                    time_left = self.state.time_left,
                    "timer transition"
                );
            }
        }

        completions
    }

    fn take_advance(&mut self) -> bool {
        match self.auto_advance {
            AutoAdvance::Unlimited => {
                self.advances = self.advances.saturating_add(1);
                true
            }
            AutoAdvance::Limited(limit) if self.advances < limit => {
                self.advances += 1;
                true
            }
            AutoAdvance::Limited(_) => false,
        }
    }
}
