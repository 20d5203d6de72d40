//! Room orchestrator: the per-room match state machine.
//!
//! - Owns the [`RoomRegistry`] and a [`Scheduler`] for countdowns.
//! - Turns every inbound [`Command`], timer tick, and disconnect into a
//!   list of [`Delivery`]s, already addressed to concrete connections.
//! - Never blocks and never touches the network; the caller is expected
//!   to run all calls for all rooms from a single task, which is what
//!   keeps per-room state free of locks.
//!
//! Phase transitions (see [`RoomPhase`]):
//!
//! ```text
//! create -> Waiting -join-> Ready -start-> InPlay -both expire-> Ended
//!                             ^                                    |
//!                             +-------- both vote play-again ------+
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::{Board, CellPos};
use crate::config::{BoardMode, GameConfig};
use crate::error::GameError;
use crate::messages::{Command, ConnectionId, Delivery, Event, Scores};
use crate::registry::RoomRegistry;
use crate::room::{Room, RoomPhase, MAX_SEATS};
use crate::room_id::RoomId;
use crate::seat::Seat;
use crate::selection::{self, Selection};
use crate::timer::{Scheduler, TimerHandle};

/// Message sent with `game-reset` once both seats agree to a rematch.
pub const RESET_MESSAGE: &str = "New game ready! Click Start Game when ready.";

pub struct Orchestrator<S: Scheduler> {
    config: GameConfig,
    registry: RoomRegistry,
    scheduler: S,
    rng: StdRng,
}

impl<S: Scheduler> Orchestrator<S> {
    /// Create an orchestrator seeded from the OS RNG.
    pub fn new(config: GameConfig, registry: RoomRegistry, scheduler: S) -> Self {
        Self::with_rng(config, registry, scheduler, StdRng::from_os_rng())
    }

    /// Create an orchestrator with an explicit RNG (reproducible boards and
    /// room ids).
    pub fn with_rng(config: GameConfig, registry: RoomRegistry, scheduler: S, rng: StdRng) -> Self {
        Orchestrator {
            config,
            registry,
            scheduler,
            rng,
        }
    }

    /// Process one command from `from` and return the resulting events.
    ///
    /// Failures never escape: they come back as an `Event::Error` addressed
    /// to `from` alone.
    pub fn handle(&mut self, from: ConnectionId, command: Command) -> Vec<Delivery> {
        let op = command.op();

        let result = match command {
            Command::CreateRoom => self.create_room(from),
            Command::JoinRoom { room_id } => self.join_room(from, &room_id),
            Command::StartGame { room_id, seat } => self.start_game(from, &room_id, seat),
            Command::SelectCells {
                room_id,
                seat,
                cells,
            } => self.select_cells(from, &room_id, seat, &cells),
            Command::PlayAgain { room_id, seat } => self.play_again(from, &room_id, seat),
        };

        result.unwrap_or_else(|error| {
            debug!(connection = %from, op = op.as_str(), %error, "command rejected");
            vec![Delivery::new(from, Event::Error { op, error })]
        })
    }

    /// One countdown period elapsed for `(room_id, seat)`.
    ///
    /// Ticks whose handle is not the seat's current timer are ignored: the
    /// timer was cancelled (rematch, disconnect, restart) after the tick was
    /// queued.
    pub fn tick(&mut self, room_id: &RoomId, seat: Seat, handle: TimerHandle) -> Vec<Delivery> {
        let Some(room) = self.registry.room_mut(room_id) else {
            debug!(room = %room_id, %seat, ?handle, "tick for a destroyed room dropped");
            return Vec::new();
        };

        let session = room.session_mut(seat);
        if session.timer() != Some(handle) {
            debug!(room = %room_id, %seat, ?handle, "stale tick dropped");
            return Vec::new();
        }

        let time_remaining = session.tick();
        let mut out = Vec::new();

        let me = room.connection(seat);
        if let Some(me) = me {
            out.push(Delivery::new(
                me,
                Event::TimerUpdate {
                    time_remaining,
                    seat,
                },
            ));
        }

        if time_remaining > 0 {
            return out;
        }

        // Countdown over for this seat.
        let session = room.session_mut(seat);
        if let Some(timer) = session.finish() {
            self.scheduler.cancel(timer);
        }
        let score = session.score();
        info!(room = %room_id, %seat, score, "player finished");

        if let Some(me) = me {
            out.push(Delivery::new(me, Event::PlayerFinished { seat, score }));
        }
        if let Some(other) = room.connection(seat.other()) {
            out.push(Delivery::new(
                other,
                Event::OpponentFinished {
                    opponent_score: score,
                    opponent_seat: seat,
                },
            ));
        }

        if room.phase() == RoomPhase::Ended {
            let scores = Scores {
                one: room.session(Seat::One).score(),
                two: room.session(Seat::Two).score(),
            };
            let winner = scores.winner();
            room.clear_votes();

            info!(room = %room_id, one = scores.one, two = scores.two, ?winner, "game ended");
            broadcast(room, Event::GameEnded { scores, winner }, &mut out);
        }

        out
    }

    /// A connection went away. Cancels its seat's countdown before the seat
    /// is unbound, then destroys the room or tells the remaining seat.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Vec<Delivery> {
        self.leave_current_room(connection)
    }

    /// Detach `connection` from the room it sits in, if any. Used both when
    /// it goes away and when it moves on to another room.
    fn leave_current_room(&mut self, connection: ConnectionId) -> Vec<Delivery> {
        let Some(room_id) = self.registry.binding(connection).map(|(id, _)| id.clone()) else {
            return Vec::new();
        };

        // The match is void for both seats: the survivor goes back to the
        // lobby and a new joiner starts from a clean room.
        if let Some(room) = self.registry.room_mut(&room_id) {
            for seat in Seat::ALL {
                if let Some(timer) = room.session_mut(seat).reset(self.config.round_seconds) {
                    self.scheduler.cancel(timer);
                }
            }
            room.clear_votes();
        }

        let Some(departure) = self.registry.remove_connection(connection) else {
            return Vec::new();
        };

        match departure.remaining {
            Some(remaining) => vec![Delivery::new(remaining, Event::PlayerLeft)],
            None => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Command handlers
    // -------------------------------------------------------------------------

    fn create_room(&mut self, from: ConnectionId) -> Result<Vec<Delivery>, GameError> {
        // Back in the lobby: a seat still held from a finished or abandoned
        // match is given up first.
        let mut out = self.leave_current_room(from);

        let board = self.generate_board();
        let room_id =
            self.registry
                .create_room(from, board, self.config.round_seconds, &mut self.rng)?;

        out.push(Delivery::new(from, Event::RoomCreated { room_id }));
        Ok(out)
    }

    fn join_room(&mut self, from: ConnectionId, raw_room_id: &str) -> Result<Vec<Delivery>, GameError> {
        let room_id = RoomId::parse(raw_room_id)?;

        if let Some((current, seat)) = self.registry.binding(from) {
            if *current == room_id {
                debug!(room = %room_id, %seat, "join ignored, already seated here");
                return Ok(vec![Delivery::new(from, Event::RoomJoined { room_id, seat })]);
            }
        }

        // Check the target before giving up the current seat, so a failed
        // join leaves the connection where it was.
        let target = self.registry.room(&room_id).ok_or(GameError::RoomNotFound)?;
        if target.seat_count() >= MAX_SEATS {
            return Err(GameError::RoomFull);
        }

        let mut out = self.leave_current_room(from);
        let seat = self.registry.join_room(&room_id, from)?;

        let room = self.registry.room(&room_id).ok_or(GameError::RoomNotFound)?;
        out.push(Delivery::new(
            from,
            Event::RoomJoined {
                room_id: room_id.clone(),
                seat,
            },
        ));
        broadcast(
            room,
            Event::PlayerJoined {
                count: room.seat_count(),
            },
            &mut out,
        );

        Ok(out)
    }

    fn start_game(
        &mut self,
        from: ConnectionId,
        raw_room_id: &str,
        raw_seat: u8,
    ) -> Result<Vec<Delivery>, GameError> {
        let (room_id, seat) = self.resolve_seat(from, raw_room_id, raw_seat)?;
        let room = self
            .registry
            .room_mut(&room_id)
            .ok_or(GameError::RoomNotFound)?;

        if room.seat_count() < 2 {
            return Err(GameError::WaitingForOpponent);
        }

        let session = room.session(seat);
        if session.is_active() {
            debug!(room = %room_id, %seat, "start ignored, already playing");
            return Ok(Vec::new());
        }
        let restarting = session.is_finished();
        let old_timer = session.timer();

        // A finished seat may start over; the match is live again, so any
        // rematch votes from the ended round no longer apply.
        if restarting {
            debug!(room = %room_id, %seat, "finished seat starts over");
            room.clear_votes();
        }

        let board = match self.config.board_mode {
            BoardMode::Shared => room.shared_board().clone(),
            BoardMode::Independent => {
                Board::generate(self.config.rows, self.config.cols, &mut self.rng)
            }
        };

        // Never two timers for one seat: cancel first, then arm.
        if let Some(old) = old_timer {
            self.scheduler.cancel(old);
        }
        let timer = self
            .scheduler
            .arm(&room_id, seat, self.config.tick_period);
        room.session_mut(seat)
            .begin(board.clone(), self.config.round_seconds, timer);

        info!(room = %room_id, %seat, "player started");
        Ok(vec![Delivery::new(
            from,
            Event::GameStarted {
                board,
                seat,
                time_remaining: self.config.round_seconds,
            },
        )])
    }

    fn select_cells(
        &mut self,
        from: ConnectionId,
        raw_room_id: &str,
        raw_seat: u8,
        cells: &[CellPos],
    ) -> Result<Vec<Delivery>, GameError> {
        let (room_id, seat) = self.resolve_seat(from, raw_room_id, raw_seat)?;
        let room = self
            .registry
            .room_mut(&room_id)
            .ok_or(GameError::RoomNotFound)?;

        let session = room.session_mut(seat);
        let playing = session.is_active();
        let board = match session.board_mut() {
            Some(board) if playing => board,
            _ => {
                debug!(room = %room_id, %seat, "selection while not playing");
                return Ok(vec![Delivery::new(from, Event::InvalidSelection)]);
            }
        };

        let cleared = match selection::validate(board, cells, self.config.target) {
            Selection::Cleared(cleared) => cleared,
            Selection::Rejected(reason) => {
                debug!(room = %room_id, %seat, ?reason, "selection rejected");
                return Ok(vec![Delivery::new(from, Event::InvalidSelection)]);
            }
        };

        let score = session.add_points(cleared.len() as u32);
        let mut out = vec![Delivery::new(
            from,
            Event::CellsCleared {
                cells: cleared,
                score,
                seat,
            },
        )];
        if let Some(other) = room.connection(seat.other()) {
            out.push(Delivery::new(other, Event::OpponentScore { seat, score }));
        }

        Ok(out)
    }

    fn play_again(
        &mut self,
        from: ConnectionId,
        raw_room_id: &str,
        raw_seat: u8,
    ) -> Result<Vec<Delivery>, GameError> {
        let (room_id, seat) = self.resolve_seat(from, raw_room_id, raw_seat)?;
        let room = self
            .registry
            .room_mut(&room_id)
            .ok_or(GameError::RoomNotFound)?;

        if room.phase() != RoomPhase::Ended {
            return Err(GameError::MatchInProgress);
        }

        let mut out = Vec::new();
        if room.add_vote(seat) {
            if let Some(other) = room.connection(seat.other()) {
                out.push(Delivery::new(other, Event::OpponentWantsPlayAgain));
            }
        }

        if Seat::ALL.iter().all(|s| room.has_voted(*s)) {
            for s in Seat::ALL {
                if let Some(timer) = room.session_mut(s).reset(self.config.round_seconds) {
                    self.scheduler.cancel(timer);
                }
            }
            let board = Board::generate(self.config.rows, self.config.cols, &mut self.rng);
            room.replace_shared_board(board);
            room.clear_votes();

            info!(room = %room_id, "game reset");
            broadcast(
                room,
                Event::GameReset {
                    message: RESET_MESSAGE.to_string(),
                },
                &mut out,
            );
        }

        Ok(out)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Check that `raw_room_id` names a live room and `raw_seat` is the seat
    /// `from` occupies in it.
    fn resolve_seat(
        &self,
        from: ConnectionId,
        raw_room_id: &str,
        raw_seat: u8,
    ) -> Result<(RoomId, Seat), GameError> {
        let room_id = RoomId::parse(raw_room_id)?;
        let room = self.registry.room(&room_id).ok_or(GameError::RoomNotFound)?;
        let seat = Seat::from_number(raw_seat).ok_or(GameError::InvalidSeat(raw_seat))?;

        if room.connection(seat) != Some(from) {
            return Err(GameError::NotYourSeat);
        }
        Ok((room_id, seat))
    }

    fn generate_board(&mut self) -> Board {
        Board::generate(self.config.rows, self.config.cols, &mut self.rng)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Mutable registry access, e.g. to script a board in tests.
    pub fn registry_mut(&mut self) -> &mut RoomRegistry {
        &mut self.registry
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

/// Queue `event` for every connection seated in `room`.
fn broadcast(room: &Room, event: Event, out: &mut Vec<Delivery>) {
    for binding in room.bindings() {
        out.push(Delivery::new(binding.connection, event.clone()));
    }
}
