//! Periodic do-activities driven by scheduled frames.

use crate::core::{StateId, TimerState};
use crate::engine::context::Context;
use crate::engine::diagnostics::Level;
use crate::engine::error::{ConfigurationError, Result, UsageError};
use crate::engine::machine::Machine;
use crate::engine::scheduler::FrameHandle;
use std::time::Duration;

impl Machine {
    /// Arm the timer of a freshly entered timed state and request its first frame.
    pub(crate) fn start_timer(&mut self, state: StateId) {
        let handle = self.scheduler.schedule_frame(state);
        let node = &mut self.states[state.index()];
        node.timer = TimerState::armed();
        if let Some(stale) = node.frame.replace(handle) {
            self.scheduler.cancel_frame(stale);
        }
        self.report(
            Level::Info,
            format!("timer of '{}' started", self.label(state)),
        );
    }

    /// Raise the stop flag. The next frame observes it and resets the counters.
    pub(crate) fn stop_timer(&mut self, state: StateId) {
        let node = &mut self.states[state.index()];
        if node.timer.is_running() {
            node.timer = node.timer.stopped();
        }
    }

    /// Deliver one frame to the state named by `handle`.
    ///
    /// Frames for a handle the state no longer waits on are cancelled and
    /// ignored. A stopped timer is reset and requests nothing further. A
    /// running timer folds in `timestamp`, runs the do-activity when an
    /// interval boundary was crossed, and requests the next frame.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp: Duration) -> Result<()> {
        let state = handle.state();
        let node = self
            .states
            .get(state.index())
            .ok_or(ConfigurationError::UnknownState(state))
            .map_err(|e| self.fail(e))?;

        if node.frame != Some(handle) {
            self.scheduler.cancel_frame(handle);
            return Ok(());
        }
        if !node.timer.is_running() {
            self.reset_timer(state);
            return Ok(());
        }

        let (timer, due) = node.timer.step(timestamp, node.config.interval);
        let activity = node.do_activity.clone();
        self.states[state.index()].timer = timer;

        if due {
            if let Some(activity) = activity {
                activity.run(&mut Context::new(self, Some(state)))?;
            }
        }

        let node = &mut self.states[state.index()];
        if node.frame != Some(handle) {
            return Ok(());
        }
        if node.timer.is_running() {
            node.frame = Some(self.scheduler.schedule_frame(state));
        } else {
            self.reset_timer(state);
        }
        Ok(())
    }

    fn reset_timer(&mut self, state: StateId) {
        let node = &mut self.states[state.index()];
        node.timer = TimerState::default();
        node.frame = None;
        self.report(
            Level::Info,
            format!("timer of '{}' stopped", self.label(state)),
        );
    }

    /// Time since the first frame of the current activation.
    pub fn elapsed_active_time(&self, state: StateId) -> Option<Duration> {
        self.timer_reading(state, TimerState::elapsed)
    }

    /// Frames observed during the current activation.
    pub fn activation_frame_count(&self, state: StateId) -> Option<u64> {
        self.timer_reading(state, TimerState::frames)
    }

    /// Do-activity invocations during the current activation.
    pub fn do_activity_invocation_count(&self, state: StateId) -> Option<u64> {
        self.timer_reading(state, TimerState::invocations)
    }

    fn timer_reading<T>(
        &self,
        state: StateId,
        read: impl FnOnce(&TimerState) -> Option<T>,
    ) -> Option<T> {
        let node = self.states.get(state.index())?;
        let reading = read(&node.timer);
        if reading.is_none() {
            self.report_usage(&UsageError::TimerNotStarted {
                state: node.entity.name().to_owned(),
            });
        }
        reading
    }
}
