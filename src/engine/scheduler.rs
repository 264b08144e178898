//! Frame scheduling abstraction for timed do-activities.
//!
//! A timed state asks for "the next frame" and the runtime answers by calling
//! [`Machine::on_frame`] with the handle and a timestamp. This trait abstracts
//! the runtime side:
//! - [`ManualScheduler`] queues requests until a test or driver loop calls
//!   [`ManualScheduler::advance`]
//! - A real-time runtime would map requests onto its own frame or tick source

use crate::core::StateId;
use crate::engine::error::Result;
use crate::engine::machine::Machine;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Identifies one scheduled frame of one state's timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle {
    state: StateId,
    seq: u64,
}

impl FrameHandle {
    pub fn new(state: StateId, seq: u64) -> Self {
        Self { state, seq }
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Abstraction for requesting and cancelling frames.
pub trait FrameScheduler: Send {
    fn schedule_frame(&mut self, state: StateId) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct FrameQueue {
    next_seq: u64,
    pending: Vec<FrameHandle>,
}

/// Deterministic scheduler driven explicitly by the caller.
///
/// Clones share one queue, so a test can keep a clone after handing the
/// scheduler to a machine.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<FrameQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrameQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pending(&self) -> Vec<FrameHandle> {
        self.lock().pending.clone()
    }

    /// Deliver every pending frame at `timestamp`.
    ///
    /// Frames requested while delivering stay queued for the next call.
    /// Returns how many frames were delivered.
    pub fn advance(&self, machine: &mut Machine, timestamp: Duration) -> Result<usize> {
        let due = std::mem::take(&mut self.lock().pending);
        for handle in &due {
            machine.on_frame(*handle, timestamp)?;
        }
        Ok(due.len())
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_frame(&mut self, state: StateId) -> FrameHandle {
        let mut queue = self.lock();
        let handle = FrameHandle::new(state, queue.next_seq);
        queue.next_seq += 1;
        queue.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.lock().pending.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_assigns_increasing_sequence_numbers() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule_frame(StateId(1));
        let b = scheduler.schedule_frame(StateId(1));

        assert_eq!(a.state(), StateId(1));
        assert!(b.seq() > a.seq());
        assert_eq!(scheduler.pending(), vec![a, b]);
    }

    #[test]
    fn cancel_removes_pending_frame() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule_frame(StateId(1));
        let b = scheduler.schedule_frame(StateId(2));

        scheduler.cancel_frame(a);
        assert_eq!(scheduler.pending(), vec![b]);
    }

    #[test]
    fn clones_share_the_queue() {
        let mut scheduler = ManualScheduler::new();
        let observer = scheduler.clone();

        scheduler.schedule_frame(StateId(4));
        assert_eq!(observer.pending().len(), 1);
    }
}
