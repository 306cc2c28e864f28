//! Search input debouncing.
//!
//! State machine with two states:
//!
//! - **Idle**: no search scheduled
//! - **Pending**: a timer is running; when it expires the search fires and
//!   the debouncer returns to Idle
//!
//! Every keystroke cancels the pending timer (its search never fires) and
//! schedules a new one, so at most one search is issued per quiescence
//! window. Only the timer is cancellable: once a search has fired it runs to
//! completion even if newer keystrokes arrive.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiescence window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

/// Observable debouncer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

/// Coalesces bursts of keystrokes into a single search.
#[derive(Debug)]
pub struct SearchDebouncer {
    window: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SearchDebouncer {
    /// Create a debouncer with the given quiescence window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            timer: Mutex::new(None),
        }
    }

    /// The quiescence window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Register a keystroke carrying the full current `text`.
    ///
    /// Cancels any pending timer and schedules `fire(text)` to run once
    /// `window` elapses without another keystroke.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn keystroke<F, Fut>(&self, text: String, fire: F)
    where
        F: FnOnce(String) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let window = self.window;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            debug!(text = %text, "Search input settled");
            // Detached so a later keystroke aborting this timer cannot abort
            // a search that is already in flight.
            tokio::spawn(fire(text));
        });

        if let Some(previous) = self.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(timer) = self.lock().take() {
            timer.abort();
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DebounceState {
        match self.lock().as_ref() {
            Some(timer) if !timer.is_finished() => DebounceState::Pending,
            _ => DebounceState::Idle,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
