//! Search limits and cooperative cancellation.
//!
//! The stop flag is the only piece of search state shared with the
//! outside: the controller's caller sets it from another thread, and the
//! search polls it every `check_interval` nodes. Checking the wall clock
//! on every node would cost more than it saves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::MAX_PLY;

/// Shared stop flag, cheap to clone across threads.
#[derive(Clone, Debug, Default)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
}

impl TimeControl {
    pub fn new() -> TimeControl {
        TimeControl {
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ask the running search to stop. It unwinds at the next poll and
    /// reports the best move found so far.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.stopped.store(false, Ordering::SeqCst);
    }
}

/// Per-search limits. Depth, node and time caps are all normal
/// termination conditions, not errors.
#[derive(Clone, Debug)]
pub struct SearchLimits {
    /// Maximum iterative-deepening depth in plies.
    pub depth: i32,
    /// Maximum nodes to search.
    pub nodes: u64,
    /// Wall-clock budget for this move (None = no limit).
    pub move_time: Option<Duration>,
    /// Ignore time and node limits until stopped explicitly.
    pub infinite: bool,
    /// Shared stop flag.
    pub tc: TimeControl,
    /// Nodes between clock polls.
    pub check_interval: u64,
    start_time: Option<Instant>,
}

impl SearchLimits {
    pub fn new() -> SearchLimits {
        SearchLimits {
            depth: MAX_PLY as i32,
            nodes: u64::MAX,
            move_time: None,
            infinite: false,
            tc: TimeControl::new(),
            check_interval: 2048,
            start_time: None,
        }
    }

    pub fn set_depth(&mut self, depth: i32) {
        self.depth = depth.clamp(1, MAX_PLY as i32);
    }

    pub fn set_move_time(&mut self, millis: u64) {
        self.move_time = Some(Duration::from_millis(millis));
    }

    pub fn set_infinite(&mut self, infinite: bool) {
        self.infinite = infinite;
    }

    /// Start the clock and clear the stop flag. Call when search begins.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.tc.reset();
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|s| s.elapsed()).unwrap_or(Duration::ZERO)
    }

    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes % self.check_interval == 0
    }

    /// Poll the wall clock and node budget; sets the stop flag when a
    /// limit has expired. Returns true when the search should stop.
    pub fn check_time(&self, nodes: u64) -> bool {
        if self.tc.is_stopped() {
            return true;
        }
        if self.infinite {
            return false;
        }
        if nodes >= self.nodes {
            self.tc.stop();
            return true;
        }
        if let Some(limit) = self.move_time {
            if self.elapsed() >= limit {
                self.tc.stop();
                return true;
            }
        }
        false
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
