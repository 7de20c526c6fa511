//! notify-backed event source

use crate::{EventStream, WatchError, WatchEvent, WatchOptions};
use notify::event::ModifyKind;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{info, trace, warn};
use watchrun_core::EventKind;

/// Live watch on one root; watching stops when this is dropped
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
}

impl FsWatcher {
    /// Start watching `root` (as the user wrote it)
    ///
    /// Events arrive on the returned stream unbounded and in order. Apply
    /// `debounced` to honor `options.delay_hint`.
    pub fn start(root: &str, options: &WatchOptions) -> Result<(Self, EventStream), WatchError> {
        let canonical = Path::new(root)
            .canonicalize()
            .map_err(|source| WatchError::Root {
                path: PathBuf::from(root),
                source,
            })?;

        let (tx, rx) = mpsc::unbounded_channel();
        let handler_root = canonical.clone();
        let display_root = root.to_string();

        let handler = move |res: notify::Result<Event>| {
            let items = match res {
                Ok(event) => translate(event, &handler_root, &display_root),
                Err(e) => vec![Err(WatchError::Notify(e))],
            };
            for item in items {
                // Receiver gone means the session is shutting down
                if tx.send(item).is_err() {
                    return;
                }
            }
        };

        let mut watcher = RecommendedWatcher::new(handler, Config::default()).map_err(|source| {
            WatchError::Watch {
                path: canonical.clone(),
                source,
            }
        })?;

        let mode = if options.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&canonical, mode)
            .map_err(|source| WatchError::Watch {
                path: canonical.clone(),
                source,
            })?;

        info!(
            "Watching {} ({})",
            canonical.display(),
            if options.recursive { "recursive" } else { "non-recursive" }
        );

        Ok((Self { _watcher: watcher }, rx))
    }
}

/// Convert one notify event into gate-ready events
fn translate(
    event: Event,
    canonical_root: &Path,
    display_root: &str,
) -> Vec<Result<WatchEvent, WatchError>> {
    let kind = match event.kind {
        notify::EventKind::Create(_) => EventKind::Create,
        notify::EventKind::Modify(ModifyKind::Name(_)) => EventKind::Rename,
        notify::EventKind::Modify(_) => EventKind::Modify,
        notify::EventKind::Remove(_) => EventKind::Delete,
        other => {
            trace!(?other, "Dropping notify event");
            return Vec::new();
        }
    };

    let mut items = Vec::with_capacity(event.paths.len());
    for path in event.paths {
        if path == canonical_root {
            if kind == EventKind::Delete {
                warn!("Watched root {} was removed", canonical_root.display());
                items.push(Err(WatchError::RootRemoved(canonical_root.to_path_buf())));
            }
            continue;
        }
        items.push(Ok(WatchEvent::new(
            kind,
            display_path(&path, canonical_root, display_root),
        )));
    }
    items
}

/// Re-root an absolute notify path onto the root string the user gave
fn display_path(path: &Path, canonical_root: &Path, display_root: &str) -> PathBuf {
    match path.strip_prefix(canonical_root) {
        Ok(rel) if display_root == "." || display_root == "./" => rel.to_path_buf(),
        Ok(rel) => Path::new(display_root).join(rel),
        Err(_) => path.to_path_buf(),
    }
}
