//! Per-path debouncing logic
//!
//! Editors tend to emit several raw events for one save (truncate, write,
//! chmod, rename-over). Events are held for a fixed window opened by the
//! first one, collapsed by path, and released in first-seen order.

use crate::{EventStream, WatchEvent};
use ahash::AHashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Pure coalescing state; `debounced` drives it from a tokio task
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Vec<WatchEvent>,
    /// Path -> slot in `pending`
    index: AHashMap<PathBuf, usize>,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Vec::new(),
            index: AHashMap::new(),
            deadline: None,
        }
    }

    /// Queue an event; a repeated path keeps its slot and takes the newest kind
    pub fn push(&mut self, event: WatchEvent, now: Instant) {
        match self.index.get(&event.path) {
            Some(&slot) => self.pending[slot].kind = event.kind,
            None => {
                self.index.insert(event.path.clone(), self.pending.len());
                self.pending.push(event);
            }
        }

        if self.deadline.is_none() {
            self.deadline = Some(now + self.delay);
        }
    }

    /// When the current window closes, if one is open
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Release pending events if the window has closed
    pub fn take_ready(&mut self, now: Instant) -> Vec<WatchEvent> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => Vec::new(),
        }
    }

    /// Release everything pending, closing the window
    pub fn flush(&mut self) -> Vec<WatchEvent> {
        self.deadline = None;
        self.index.clear();
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

/// Wrap a raw stream so events are coalesced over `delay`
///
/// Must be called from within a tokio runtime. A zero delay returns the
/// stream unchanged. Errors are forwarded immediately after flushing.
pub fn debounced(mut raw: EventStream, delay: Duration) -> EventStream {
    if delay.is_zero() {
        return raw;
    }

    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut debouncer = Debouncer::new(delay);

        loop {
            let next = match debouncer.deadline() {
                Some(deadline) => tokio::select! {
                    item = raw.recv() => Some(item),
                    _ = sleep_until(deadline) => None,
                },
                None => Some(raw.recv().await),
            };

            match next {
                // Window closed
                None => {
                    let ready = debouncer.take_ready(Instant::now());
                    trace!(count = ready.len(), "Releasing debounced events");
                    for event in ready {
                        if tx.send(Ok(event)).is_err() {
                            return;
                        }
                    }
                }
                Some(Some(Ok(event))) => debouncer.push(event, Instant::now()),
                Some(Some(Err(e))) => {
                    for event in debouncer.flush() {
                        let _ = tx.send(Ok(event));
                    }
                    let _ = tx.send(Err(e));
                    return;
                }
                // Source closed; dropping `tx` closes ours too
                Some(None) => {
                    for event in debouncer.flush() {
                        let _ = tx.send(Ok(event));
                    }
                    return;
                }
            }
        }
    });

    rx
}
