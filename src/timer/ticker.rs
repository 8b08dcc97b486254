//! Cancellable once-per-second tick registration.
//!
//! The UI loop polls the tick source with the current instant; a tick is only
//! ever produced for the registration that is currently live, so cancelling a
//! registration guarantees no further tick for it.

use std::time::{Duration, Instant};

use tracing::trace;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Opaque identifier of a tick registration.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Source of periodic ticks driving the countdown.
pub trait TickSource {
    /// Starts a new repeating registration, replacing any previous one.
    fn register(&mut self) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
    fn is_live(&self, handle: TickHandle) -> bool;
    /// Returns true once per elapsed period of the live registration.
    fn take_due(&mut self, now: Instant) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Registration {
    handle: TickHandle,
    next_due: Instant,
}

#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    live: Option<Registration>,
    next_handle: u64,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self {
            period: TICK_PERIOD,
            live: None,
            next_handle: 1,
        }
    }

    pub fn register_at(&mut self, now: Instant) -> TickHandle {
        let handle = TickHandle(self.next_handle);
        self.next_handle += 1;
        if let Some(previous) = self.live.replace(Registration {
            handle,
            next_due: now + self.period,
        }) {
            trace!(
                previous = previous.handle.raw(),
                "tick registration replaced"
            );
        }
        handle
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for IntervalTicker {
    fn register(&mut self) -> TickHandle {
        self.register_at(Instant::now())
    }

    fn cancel(&mut self, handle: TickHandle) {
        if self.is_live(handle) {
            self.live = None;
        }
    }

    fn is_live(&self, handle: TickHandle) -> bool {
        self.live
            .is_some_and(|registration| registration.handle == handle)
    }

    fn take_due(&mut self, now: Instant) -> bool {
        let Some(registration) = self.live.as_mut() else {
            return false;
        };
        if now < registration.next_due {
            return false;
        }
        registration.next_due += self.period;
        true
    }
}
