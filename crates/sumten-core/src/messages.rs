//! Message types used by the core room orchestrator.
//!
//! These are **transport-agnostic** logical messages:
//! - [`Command`]: what a connection asks for.
//! - [`Event`]: what the orchestrator tells a connection.
//! - [`Delivery`]: an event already resolved to the connection that must
//!   receive it, so the network layer never has to know about seats.
//!
//! Note: JSON / text encoders live in the `sumten-protocol` crate; this
//! module is purely logical.

use crate::board::{Board, CellPos};
use crate::error::GameError;
use crate::room_id::RoomId;
use crate::seat::Seat;

/// Identifier for a live connection.
///
/// This is intentionally opaque; the server only guarantees uniqueness over
/// the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request from a connection.
///
/// Room ids and seat numbers arrive exactly as the client sent them; the
/// orchestrator validates and normalises them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateRoom,

    JoinRoom { room_id: String },

    StartGame { room_id: String, seat: u8 },

    SelectCells {
        room_id: String,
        seat: u8,
        cells: Vec<CellPos>,
    },

    PlayAgain { room_id: String, seat: u8 },
}

impl Command {
    /// Which `<op>-error` a failure of this command is reported as.
    pub fn op(&self) -> Op {
        match self {
            Command::CreateRoom => Op::Create,
            Command::JoinRoom { .. } => Op::Join,
            Command::StartGame { .. } => Op::Start,
            Command::SelectCells { .. } => Op::Select,
            Command::PlayAgain { .. } => Op::PlayAgain,
        }
    }
}

/// The operation a failed command was attempting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    Create,
    Join,
    Start,
    Select,
    PlayAgain,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Create => "create",
            Op::Join => "join",
            Op::Start => "start",
            Op::Select => "select",
            Op::PlayAgain => "play-again",
        }
    }
}

/// Final scores for both seats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Scores {
    pub one: u32,
    pub two: u32,
}

impl Scores {
    pub fn get(&self, seat: Seat) -> u32 {
        match seat {
            Seat::One => self.one,
            Seat::Two => self.two,
        }
    }

    /// Seat with the strictly greater score; `None` on a tie.
    pub fn winner(&self) -> Option<Seat> {
        use std::cmp::Ordering;

        match self.one.cmp(&self.two) {
            Ordering::Greater => Some(Seat::One),
            Ordering::Less => Some(Seat::Two),
            Ordering::Equal => None,
        }
    }
}

/// A notification for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RoomCreated { room_id: RoomId },

    RoomJoined { room_id: RoomId, seat: Seat },

    /// Room-wide: number of seats now bound.
    PlayerJoined { count: usize },

    GameStarted {
        board: Board,
        seat: Seat,
        time_remaining: u32,
    },

    TimerUpdate { time_remaining: u32, seat: Seat },

    CellsCleared {
        cells: Vec<CellPos>,
        score: u32,
        seat: Seat,
    },

    InvalidSelection,

    /// Display-only running score of the other seat.
    OpponentScore { seat: Seat, score: u32 },

    PlayerFinished { seat: Seat, score: u32 },

    OpponentFinished {
        opponent_score: u32,
        opponent_seat: Seat,
    },

    GameEnded {
        scores: Scores,
        winner: Option<Seat>,
    },

    OpponentWantsPlayAgain,

    GameReset { message: String },

    PlayerLeft,

    /// A command failed; `op` says which one.
    Error { op: Op, error: GameError },
}

/// An event addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ConnectionId,
    pub event: Event,
}

impl Delivery {
    pub fn new(to: ConnectionId, event: Event) -> Self {
        Delivery { to, event }
    }
}
