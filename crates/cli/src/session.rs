//! Watch session: watcher -> debouncer -> event gate -> shell

use crate::exec::ShellDispatcher;
use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{info, trace, warn};
use watcher::{debounced, EventStream, FsWatcher, WatchError, WatchOptions};
use watchrun_core::{Clock, Console, Dispatch, EventGate, Resolved, SystemClock};

/// Watch until Ctrl-C or a fatal watcher error
pub async fn run(resolved: Resolved) -> Result<()> {
    let Resolved {
        filter,
        command,
        silence,
    } = resolved;

    let options = WatchOptions {
        delay_hint: Duration::from_millis(filter.throttle_ms),
        recursive: filter.recursive,
    };
    let root = filter.root.clone();

    info!(
        root = %root,
        mode = ?filter.mode,
        throttle_ms = filter.throttle_ms,
        command = command.as_deref().unwrap_or("<none>"),
        "Starting watch session"
    );

    let console = Console::stdout(silence);
    let dispatcher = ShellDispatcher::new(console.clone());
    let mut gate = EventGate::new(filter, command, SystemClock, dispatcher, console);

    let (_watcher, raw) = FsWatcher::start(&root, &options)
        .with_context(|| format!("Failed to start watching '{}'", root))?;
    let events = debounced(raw, options.delay_hint);

    drive(&mut gate, events, ctrl_c())
        .await
        .with_context(|| format!("Stopped watching '{}'", root))
}

/// Feed events through the gate until `shutdown` resolves
///
/// Returns the first watcher error, or `WatchError::Closed` if the stream ends.
pub async fn drive<C, D>(
    gate: &mut EventGate<C, D>,
    mut events: EventStream,
    shutdown: impl Future<Output = ()>,
) -> Result<(), WatchError>
where
    C: Clock,
    D: Dispatch,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            item = events.recv() => match item {
                Some(Ok(event)) => {
                    let filename = event.filename();
                    let outcome = gate.on_event(event.kind, &filename);
                    trace!(kind = %event.kind, filename = %filename, ?outcome, "Gate decision");
                }
                Some(Err(e)) => return Err(e),
                None => return Err(WatchError::Closed),
            },
            _ = &mut shutdown => {
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until killed
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
