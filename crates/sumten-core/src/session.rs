//! Per-seat game state.

use crate::board::Board;
use crate::timer::TimerHandle;

/// One seat's view of the current round.
///
/// Lifecycle:
/// - empty when the room is created or reset;
/// - [`PlayerSession::begin`] on an accepted start;
/// - [`PlayerSession::finish`] when the countdown hits zero.
#[derive(Debug, Clone, Default)]
pub struct PlayerSession {
    board: Option<Board>,
    score: u32,
    time_remaining: u32,
    active: bool,
    finished: bool,
    timer: Option<TimerHandle>,
}

impl PlayerSession {
    pub fn new(round_seconds: u32) -> Self {
        PlayerSession {
            time_remaining: round_seconds,
            ..PlayerSession::default()
        }
    }

    /// Start a round on `board`. The caller must have cancelled any previous
    /// timer; the old handle is returned so that can be checked.
    pub(crate) fn begin(
        &mut self,
        board: Board,
        round_seconds: u32,
        timer: TimerHandle,
    ) -> Option<TimerHandle> {
        self.board = Some(board);
        self.score = 0;
        self.time_remaining = round_seconds;
        self.active = true;
        self.finished = false;
        self.timer.replace(timer)
    }

    /// Count down one second. Returns the new remaining time.
    pub(crate) fn tick(&mut self) -> u32 {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.time_remaining
    }

    /// Mark the round over for this seat and hand back its timer.
    pub(crate) fn finish(&mut self) -> Option<TimerHandle> {
        self.active = false;
        self.finished = true;
        self.timer.take()
    }

    pub(crate) fn add_points(&mut self, points: u32) -> u32 {
        self.score += points;
        self.score
    }

    /// Back to the post-create shape, returning the timer (if any) so the
    /// caller can cancel it.
    pub(crate) fn reset(&mut self, round_seconds: u32) -> Option<TimerHandle> {
        let timer = self.timer.take();
        *self = PlayerSession::new(round_seconds);
        timer
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Mutable board access, e.g. to script a position in tests.
    pub fn board_mut(&mut self) -> Option<&mut Board> {
        self.board.as_mut()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }
}
