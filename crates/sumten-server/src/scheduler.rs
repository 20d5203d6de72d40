//! Countdown timers backed by tokio tasks.
//!
//! Each armed timer is a small task that feeds `EngineRequest::Tick`
//! into the engine channel once per period. Cancelling aborts the task;
//! a tick it already queued is dropped by the orchestrator's handle check.

use std::collections::HashMap;
use std::time::Duration;

use sumten_core::{RoomId, Scheduler, Seat, TimerHandle};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::types::{EngineRequest, WeakEngineTx};

pub struct TokioScheduler {
    engine_tx: WeakEngineTx,
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(engine_tx: WeakEngineTx) -> Self {
        TokioScheduler {
            engine_tx,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Number of timers currently running.
    pub fn live(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn arm(&mut self, room_id: &RoomId, seat: Seat, period: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);

        let engine_tx = self.engine_tx.clone();
        let room_id = room_id.clone();

        let task = tokio::spawn(async move {
            // First tick one full period after arming, not immediately.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(tx) = engine_tx.upgrade() else {
                    break;
                };
                let tick = EngineRequest::Tick {
                    room_id: room_id.clone(),
                    seat,
                    handle,
                };
                if tx.send(tick).is_err() {
                    break;
                }
            }
        });

        debug!(?handle, %seat, "timer armed");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!(?handle, "timer cancelled");
        }
    }
}
