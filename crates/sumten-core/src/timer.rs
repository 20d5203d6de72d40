//! Countdown scheduling seam.
//!
//! The core never sleeps. It asks a [`Scheduler`] to arm a repeating
//! timer for a seat and gets back a [`TimerHandle`]; whoever implements the
//! scheduler is responsible for calling
//! [`Orchestrator::tick`](crate::Orchestrator::tick) with that handle once
//! per period until the handle is cancelled.
//!
//! Handles are never reused by a scheduler, so a tick that was already in
//! flight when its timer got cancelled carries a handle no session holds
//! any more and is dropped by the orchestrator.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::room_id::RoomId;
use crate::seat::Seat;

/// Opaque identifier of one armed countdown.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Arms and cancels per-seat repeating timers.
pub trait Scheduler {
    /// Start delivering ticks for `(room_id, seat)` every `period`.
    fn arm(&mut self, room_id: &RoomId, seat: Seat, period: Duration) -> TimerHandle;

    /// Stop a timer. Must be safe to call for handles that already fired
    /// their last tick or were cancelled before.
    fn cancel(&mut self, handle: TimerHandle);
}

/// A scheduler that only records what it was asked to do.
///
/// Ticks are driven by hand (`Orchestrator::tick`), which makes it the
/// natural choice for tests and for replaying scripted matches.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    armed: Vec<(RoomId, Seat, TimerHandle)>,
    cancelled: BTreeSet<TimerHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        ManualScheduler::default()
    }

    /// Handles that are armed and not cancelled.
    pub fn live(&self) -> Vec<(RoomId, Seat, TimerHandle)> {
        self.armed
            .iter()
            .filter(|(_, _, h)| !self.cancelled.contains(h))
            .cloned()
            .collect()
    }

    /// The live handle for a seat, if any.
    pub fn live_handle(&self, room_id: &RoomId, seat: Seat) -> Option<TimerHandle> {
        self.live()
            .into_iter()
            .find(|(r, s, _)| r == room_id && *s == seat)
            .map(|(_, _, h)| h)
    }

    pub fn is_cancelled(&self, handle: TimerHandle) -> bool {
        self.cancelled.contains(&handle)
    }

    /// Total number of timers ever armed.
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, room_id: &RoomId, seat: Seat, _period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.armed.push((room_id.clone(), seat, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancelled.insert(handle);
    }
}
