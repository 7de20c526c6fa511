//! Selection and throttling engine for watchrun
//!
//! This crate provides:
//! - Input resolution (CLI/config values -> `FilterConfig`)
//! - The event gate (throttle window, filter match, command dispatch)
//! - Extension extraction for changed paths
//! - Console output honoring `--silence`

pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod event;
pub mod extension;
pub mod gate;
pub mod resolve;
pub mod throttle;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{FilterConfig, RawInputs, Resolved, SelectionMode, DEFAULT_THROTTLE_MS};
pub use console::{CapturedOutput, Console};
pub use error::ResolveError;
pub use event::EventKind;
pub use gate::{Dispatch, EventGate, GateOutcome};
pub use resolve::resolve;
pub use throttle::ThrottleState;
