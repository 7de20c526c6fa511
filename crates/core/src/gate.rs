//! Event gate
//!
//! Every raw change event passes through two phases:
//! 1. Throttle: drop it if it falls inside the window of the last accepted event
//! 2. Filter: match the path against the selection mode; run the command on a match
//!
//! The throttle clock advances for every event that clears the window,
//! including events that then fail the filter.

use crate::clock::Clock;
use crate::config::FilterConfig;
use crate::console::Console;
use crate::event::EventKind;
use crate::extension::extract_extension;
use crate::throttle::ThrottleState;
use tracing::debug;

/// Sink for command executions
///
/// `dispatch` must return without waiting for the command to finish.
pub trait Dispatch {
    fn dispatch(&self, command: &str);
}

impl<D: Dispatch + ?Sized> Dispatch for &D {
    fn dispatch(&self, command: &str) {
        (**self).dispatch(command)
    }
}

/// What the gate did with one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Inside the throttle window; dropped without a state update
    Throttled,
    /// Cleared the window but did not match the filter
    Ignored,
    /// Matched; `dispatched` is false when no command is configured
    Matched { dispatched: bool },
}

/// Throttle + filter gate in front of command dispatch
pub struct EventGate<C, D> {
    filter: FilterConfig,
    command: Option<String>,
    throttle: ThrottleState,
    clock: C,
    dispatcher: D,
    console: Console,
}

impl<C: Clock, D: Dispatch> EventGate<C, D> {
    /// Create a gate whose throttle window opens at the clock's current time
    pub fn new(
        filter: FilterConfig,
        command: Option<String>,
        clock: C,
        dispatcher: D,
        console: Console,
    ) -> Self {
        let throttle = ThrottleState::new(clock.now_ms());
        Self {
            filter,
            command,
            throttle,
            clock,
            dispatcher,
            console,
        }
    }

    pub fn throttle(&self) -> &ThrottleState {
        &self.throttle
    }

    /// Evaluate one raw event
    pub fn on_event(&mut self, kind: EventKind, filename: &str) -> GateOutcome {
        let now = self.clock.now_ms();
        if self.throttle.is_throttled(now, self.filter.throttle_ms) {
            return GateOutcome::Throttled;
        }

        let extension = extract_extension(filename);
        let outcome = if self.filter.mode.matches(filename, &extension) {
            debug!(%kind, filename, "Change matched filter");
            self.console.say(&format!("File changed: {}", filename));

            let dispatched = match &self.command {
                Some(command) => {
                    self.console.say(&format!("Executing: {}", command));
                    self.dispatcher.dispatch(command);
                    true
                }
                None => false,
            };
            GateOutcome::Matched { dispatched }
        } else {
            debug!(%kind, filename, "Change did not match filter");
            GateOutcome::Ignored
        };

        self.throttle.accept(now);
        outcome
    }
}
