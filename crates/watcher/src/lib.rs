//! File system watching for watchrun
//!
//! This crate provides:
//! - A notify-backed event source for one watch root
//! - Per-path debouncing of raw events (`delay_hint`)
//! - Fatal error reporting (watch failure, root removed)

pub mod debounce;
pub mod source;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

pub use debounce::{debounced, Debouncer};
pub use source::FsWatcher;
pub use watchrun_core::EventKind;

/// Items delivered by the watcher, in delivery order
pub type EventStream = mpsc::UnboundedReceiver<Result<WatchEvent, WatchError>>;

/// File system event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Path that changed, relative to the watch root as the user wrote it
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
}

impl WatchEvent {
    pub fn new(kind: EventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Path as passed to the event gate
    pub fn filename(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Watch options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Coalescing window for raw events (0 = deliver as-is)
    pub delay_hint: Duration,
    /// Watch subdirectories
    pub recursive: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            delay_hint: Duration::from_millis(200),
            recursive: false,
        }
    }
}

/// Fatal watcher conditions
#[derive(Debug, Error)]
pub enum WatchError {
    /// Root could not be resolved on disk
    #[error("Cannot watch '{path}': {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// notify refused to register the root
    #[error("Cannot watch '{path}': {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// notify reported an error while watching
    #[error("File watcher failed: {0}")]
    Notify(#[from] notify::Error),

    /// The watched root itself was deleted
    #[error("Watched root '{0}' was removed")]
    RootRemoved(PathBuf),

    /// The event source shut down
    #[error("File watcher stopped delivering events")]
    Closed,
}
