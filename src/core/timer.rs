//! Counters of a state's periodic do-activity.
//!
//! The engine never reads a clock itself. Frame timestamps arrive from the
//! injected scheduler and are folded into a `TimerState` by the pure
//! [`TimerState::step`] function, so timing behavior is fully deterministic
//! under test.

use std::time::Duration;

/// Elapsed time, frame count and invocation count of one timed activation.
///
/// Readings are only meaningful once the first frame has been observed;
/// before that every accessor returns `None`.
///
/// # Example
///
/// ```rust
/// use statechart::core::TimerState;
/// use std::time::Duration;
///
/// let interval = Duration::from_millis(100);
/// let timer = TimerState::armed();
/// assert!(timer.elapsed().is_none());
///
/// let (timer, due) = timer.step(Duration::from_millis(1_000), interval);
/// assert!(!due);
/// let (timer, due) = timer.step(Duration::from_millis(1_100), interval);
/// assert!(due);
///
/// assert_eq!(timer.elapsed(), Some(interval));
/// assert_eq!(timer.frames(), Some(2));
/// assert_eq!(timer.invocations(), Some(1));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimerState {
    started_at: Option<Duration>,
    elapsed: Duration,
    frames: u64,
    invocations: u64,
    boundary: u32,
    running: bool,
}

impl TimerState {
    /// A fresh, running timer waiting for its first frame.
    pub fn armed() -> Self {
        Self {
            boundary: 1,
            running: true,
            ..Self::default()
        }
    }

    /// Same counters with the stop flag raised.
    pub fn stopped(&self) -> Self {
        Self {
            running: false,
            ..self.clone()
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fold one frame into the counters.
    ///
    /// Returns the updated counters and whether the do-activity is due. The
    /// activity is due each time elapsed time crosses the next multiple of
    /// `interval`; at most one invocation is due per frame.
    pub fn step(&self, timestamp: Duration, interval: Duration) -> (Self, bool) {
        let started_at = self.started_at.unwrap_or(timestamp);
        let elapsed = timestamp.saturating_sub(started_at);
        let due = interval
            .checked_mul(self.boundary)
            .is_some_and(|boundary| elapsed >= boundary);

        let next = Self {
            started_at: Some(started_at),
            elapsed,
            frames: self.frames + 1,
            invocations: self.invocations + u64::from(due),
            boundary: if due {
                self.boundary.saturating_add(1)
            } else {
                self.boundary
            },
            running: self.running,
        };
        (next, due)
    }

    pub fn has_run(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|_| self.elapsed)
    }

    pub fn frames(&self) -> Option<u64> {
        self.started_at.map(|_| self.frames)
    }

    pub fn invocations(&self) -> Option<u64> {
        self.started_at.map(|_| self.invocations)
    }
}
