//! Debounced change watcher.
//!
//! A watcher thread waits for the observed subtree to exist, then coalesces
//! bursts of mutation notifications into a single callback once the page has
//! been quiet for the debounce delay.
//!
//! ```text
//! Uninitialized --root found--> Watching --mutation--> DebouncedPending
//!       ^    |                     ^                        |   ^
//!       +----+ retry delay         +------ quiet period ----+   | mutation
//!                                                               +--(restart)
//! ```
//!
//! Each watcher is owned by its [`WatchHandle`]; dropping or stopping the
//! handle ends it.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info};

use crate::config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Waiting for the observed subtree to appear.
    Uninitialized,
    Watching,
    /// A mutation arrived; the callback fires once the debounce delay passes
    /// without another one.
    DebouncedPending,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    pub debounce: Duration,
    pub retry_delay: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce: config::DEFAULT_DEBOUNCE,
            retry_delay: config::DEFAULT_RETRY_DELAY,
        }
    }
}

enum Signal {
    Mutation,
    Stop,
}

/// Owner of a running watcher.
pub struct WatchHandle {
    tx: Sender<Signal>,
    state: Arc<Mutex<WatchState>>,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Report one observed mutation. Returns `false` once the watcher is gone.
    pub fn notify(&self) -> bool {
        self.tx.send(Signal::Mutation).is_ok()
    }

    pub fn state(&self) -> WatchState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A detached way to stop this watcher without owning the handle.
    pub(crate) fn stopper(&self) -> WatchStopper {
        WatchStopper {
            tx: self.tx.clone(),
        }
    }

    /// Stop the watcher and wait for its thread to exit. A callback already
    /// running is allowed to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.tx.send(Signal::Stop);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Stops a watcher owned elsewhere. Does not wait for its thread.
pub(crate) struct WatchStopper {
    tx: Sender<Signal>,
}

impl WatchStopper {
    pub(crate) fn stop(&self) {
        let _ = self.tx.send(Signal::Stop);
    }
}

/// Start a watcher.
///
/// `root_present` is polled every `retry_delay` until it reports the observed
/// subtree exists. `on_settle` runs once on attach and then once per settled
/// burst of mutations. Notifications sent before attach are not observed.
pub fn start<P, F>(config: WatchConfig, root_present: P, on_settle: F) -> WatchHandle
where
    P: FnMut() -> bool + Send + 'static,
    F: FnMut() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let state = Arc::new(Mutex::new(WatchState::Uninitialized));
    let thread_state = state.clone();
    let thread = thread::spawn(move || run(config, rx, thread_state, root_present, on_settle));
    WatchHandle {
        tx,
        state,
        thread: Some(thread),
    }
}

fn run<P, F>(
    config: WatchConfig,
    rx: mpsc::Receiver<Signal>,
    state: Arc<Mutex<WatchState>>,
    mut root_present: P,
    mut on_settle: F,
) where
    P: FnMut() -> bool,
    F: FnMut(),
{
    let set = |next: WatchState| {
        *state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    };

    while !root_present() {
        debug!("Watch root not found; retrying in {:?}", config.retry_delay);
        match rx.recv_timeout(config.retry_delay) {
            Ok(Signal::Mutation) | Err(RecvTimeoutError::Timeout) => {}
            Ok(Signal::Stop) | Err(RecvTimeoutError::Disconnected) => {
                set(WatchState::Stopped);
                return;
            }
        }
    }

    info!("Watching for card preview changes");
    set(WatchState::Watching);
    on_settle();

    'watching: loop {
        match rx.recv() {
            Ok(Signal::Mutation) => {}
            Ok(Signal::Stop) | Err(_) => break,
        }
        set(WatchState::DebouncedPending);
        loop {
            match rx.recv_timeout(config.debounce) {
                Ok(Signal::Mutation) => continue,
                Err(RecvTimeoutError::Timeout) => break,
                Ok(Signal::Stop) | Err(RecvTimeoutError::Disconnected) => break 'watching,
            }
        }
        set(WatchState::Watching);
        on_settle();
    }

    set(WatchState::Stopped);
}
