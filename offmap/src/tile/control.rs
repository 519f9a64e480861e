//! Shared pause/resume/cancel state for the tile download loop.
//!
//! ```text
//! Idle ──start──► Downloading ◄──resume── Paused
//!                   │    └──────pause─────►  │
//!                   ├──► Completed           │
//!                   ├──► Failed              │
//!                   └──► Cancelled ◄─cancel──┘
//! ```
//!
//! Callers flip the state from any thread; the worker observes it at tile
//! granularity through [`DownloadControl::checkpoint`]. A paused worker sleeps
//! on a condition variable and is woken by `resume` or `cancel`.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde::Serialize;

/// State of the tile download session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DownloadState {
    #[default]
    Idle,
    Downloading,
    Paused,
    Cancelled,
    Completed,
    Failed,
}

impl DownloadState {
    /// A session is active while downloading or paused.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Downloading | Self::Paused)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed | Self::Failed)
    }
}

impl fmt::Display for DownloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Downloading => "downloading",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// What the worker should do after a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Continue,
    Cancelled,
}

/// The single authoritative download state, shared between the worker and
/// its controllers.
#[derive(Debug, Default)]
pub struct DownloadControl {
    state: Mutex<DownloadState>,
    signal: Condvar,
}

impl DownloadControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DownloadState {
        *self.state.lock()
    }

    /// Claims the session for a new run.
    ///
    /// Returns false if a session is already downloading or paused. Terminal
    /// states are acknowledged implicitly.
    pub fn try_begin(&self) -> bool {
        let mut state = self.state.lock();
        if state.is_active() {
            return false;
        }
        *state = DownloadState::Downloading;
        true
    }

    /// Downloading → Paused.
    pub fn pause(&self) -> bool {
        self.transition(DownloadState::Downloading, DownloadState::Paused)
    }

    /// Paused → Downloading; wakes the worker.
    pub fn resume(&self) -> bool {
        self.transition(DownloadState::Paused, DownloadState::Downloading)
    }

    /// Downloading or Paused → Cancelled; wakes the worker.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        if !state.is_active() {
            return false;
        }
        *state = DownloadState::Cancelled;
        self.signal.notify_all();
        true
    }

    /// Records the worker's terminal outcome.
    ///
    /// A cancellation that raced with the end of the loop wins.
    pub fn finish(&self, outcome: DownloadState) -> DownloadState {
        debug_assert!(outcome.is_terminal());
        let mut state = self.state.lock();
        if state.is_active() {
            *state = outcome;
        }
        self.signal.notify_all();
        *state
    }

    /// Resets a terminal state back to Idle.
    pub fn acknowledge(&self) -> bool {
        let mut state = self.state.lock();
        if !state.is_terminal() {
            return false;
        }
        *state = DownloadState::Idle;
        true
    }

    /// Blocks while paused; reports whether the worker may proceed.
    pub fn checkpoint(&self) -> Checkpoint {
        let mut state = self.state.lock();
        while *state == DownloadState::Paused {
            self.signal.wait(&mut state);
        }
        if *state == DownloadState::Cancelled {
            Checkpoint::Cancelled
        } else {
            Checkpoint::Continue
        }
    }

    /// Sleeps for the full `delay`, returning early only on cancellation.
    ///
    /// Pausing during the delay does not shorten it; the following checkpoint
    /// handles the pause.
    pub fn wait(&self, delay: Duration) -> Checkpoint {
        let deadline = Instant::now() + delay;
        let mut state = self.state.lock();
        loop {
            if *state == DownloadState::Cancelled {
                return Checkpoint::Cancelled;
            }
            if self.signal.wait_until(&mut state, deadline).timed_out() {
                return if *state == DownloadState::Cancelled {
                    Checkpoint::Cancelled
                } else {
                    Checkpoint::Continue
                };
            }
        }
    }

    fn transition(&self, from: DownloadState, to: DownloadState) -> bool {
        let mut state = self.state.lock();
        if *state != from {
            return false;
        }
        *state = to;
        self.signal.notify_all();
        true
    }
}
