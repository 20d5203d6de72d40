//! Wire-level message shapes.
//!
//! Every message is a JSON object tagged by `"type"` (kebab-case event
//! name) with camelCase fields, e.g.
//!
//! ```text
//! {"type":"start-game","roomId":"ABC123","seat":1}
//! {"type":"timer-update","timeRemaining":119,"seat":1}
//! {"type":"game-ended","scores":{"1":5,"2":3},"winner":1}
//! ```
//!
//! Seats travel as `1` / `2`; `winner` is `0` for a tie. Commands also
//! accept `playerNumber` in place of `seat` for older clients.

use serde::{Deserialize, Serialize};

use sumten_core::{Board, CellPos, Command, Event, Op, Seat};

/// Client → server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum WireCommand {
    CreateRoom,

    JoinRoom {
        room_id: String,
    },

    StartGame {
        room_id: String,
        #[serde(alias = "playerNumber")]
        seat: u8,
    },

    SelectCells {
        room_id: String,
        #[serde(alias = "playerNumber")]
        seat: u8,
        cells: Vec<WireCellPos>,
    },

    PlayAgain {
        room_id: String,
        #[serde(alias = "playerNumber")]
        seat: u8,
    },
}

/// Server → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum WireEvent {
    RoomCreated {
        room_id: String,
    },

    RoomJoined {
        room_id: String,
        seat: u8,
    },

    PlayerJoined {
        count: usize,
    },

    GameStarted {
        board: Vec<Vec<WireCell>>,
        seat: u8,
        time_remaining: u32,
    },

    TimerUpdate {
        time_remaining: u32,
        seat: u8,
    },

    CellsCleared {
        cells: Vec<WireCellPos>,
        score: u32,
        seat: u8,
    },

    InvalidSelection,

    OpponentScore {
        seat: u8,
        score: u32,
    },

    PlayerFinished {
        seat: u8,
        score: u32,
    },

    OpponentFinished {
        opponent_score: u32,
        opponent_seat: u8,
    },

    GameEnded {
        scores: WireScores,
        winner: u8,
    },

    OpponentWantsPlayAgain,

    GameReset {
        message: String,
    },

    PlayerLeft,

    CreateError {
        reason: String,
    },

    JoinError {
        reason: String,
    },

    StartError {
        reason: String,
    },

    SelectError {
        reason: String,
    },

    PlayAgainError {
        reason: String,
    },

    /// The server could not decode a line.
    Error {
        reason: String,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCell {
    pub value: u8,
    pub cleared: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCellPos {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireScores {
    #[serde(rename = "1")]
    pub one: u32,
    #[serde(rename = "2")]
    pub two: u32,
}

impl WireEvent {
    /// The kebab-case name carried in `"type"`.
    pub fn name(&self) -> &'static str {
        match self {
            WireEvent::RoomCreated { .. } => "room-created",
            WireEvent::RoomJoined { .. } => "room-joined",
            WireEvent::PlayerJoined { .. } => "player-joined",
            WireEvent::GameStarted { .. } => "game-started",
            WireEvent::TimerUpdate { .. } => "timer-update",
            WireEvent::CellsCleared { .. } => "cells-cleared",
            WireEvent::InvalidSelection => "invalid-selection",
            WireEvent::OpponentScore { .. } => "opponent-score",
            WireEvent::PlayerFinished { .. } => "player-finished",
            WireEvent::OpponentFinished { .. } => "opponent-finished",
            WireEvent::GameEnded { .. } => "game-ended",
            WireEvent::OpponentWantsPlayAgain => "opponent-wants-play-again",
            WireEvent::GameReset { .. } => "game-reset",
            WireEvent::PlayerLeft => "player-left",
            WireEvent::CreateError { .. } => "create-error",
            WireEvent::JoinError { .. } => "join-error",
            WireEvent::StartError { .. } => "start-error",
            WireEvent::SelectError { .. } => "select-error",
            WireEvent::PlayAgainError { .. } => "play-again-error",
            WireEvent::Error { .. } => "error",
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions to / from the logical messages
// -----------------------------------------------------------------------------

impl From<WireCellPos> for CellPos {
    fn from(p: WireCellPos) -> Self {
        CellPos::new(p.row, p.col)
    }
}

impl From<CellPos> for WireCellPos {
    fn from(p: CellPos) -> Self {
        WireCellPos {
            row: p.row,
            col: p.col,
        }
    }
}

/// Row-major list of rows.
pub fn board_to_wire(board: &Board) -> Vec<Vec<WireCell>> {
    board
        .rows()
        .map(|row| {
            row.iter()
                .map(|c| WireCell {
                    value: c.value,
                    cleared: c.cleared,
                })
                .collect()
        })
        .collect()
}

impl From<WireCommand> for Command {
    fn from(w: WireCommand) -> Self {
        match w {
            WireCommand::CreateRoom => Command::CreateRoom,
            WireCommand::JoinRoom { room_id } => Command::JoinRoom { room_id },
            WireCommand::StartGame { room_id, seat } => Command::StartGame { room_id, seat },
            WireCommand::SelectCells {
                room_id,
                seat,
                cells,
            } => Command::SelectCells {
                room_id,
                seat,
                cells: cells.into_iter().map(CellPos::from).collect(),
            },
            WireCommand::PlayAgain { room_id, seat } => Command::PlayAgain { room_id, seat },
        }
    }
}

impl From<&Command> for WireCommand {
    fn from(c: &Command) -> Self {
        match c {
            Command::CreateRoom => WireCommand::CreateRoom,
            Command::JoinRoom { room_id } => WireCommand::JoinRoom {
                room_id: room_id.clone(),
            },
            Command::StartGame { room_id, seat } => WireCommand::StartGame {
                room_id: room_id.clone(),
                seat: *seat,
            },
            Command::SelectCells {
                room_id,
                seat,
                cells,
            } => WireCommand::SelectCells {
                room_id: room_id.clone(),
                seat: *seat,
                cells: cells.iter().copied().map(WireCellPos::from).collect(),
            },
            Command::PlayAgain { room_id, seat } => WireCommand::PlayAgain {
                room_id: room_id.clone(),
                seat: *seat,
            },
        }
    }
}

impl From<&Event> for WireEvent {
    fn from(e: &Event) -> Self {
        match e {
            Event::RoomCreated { room_id } => WireEvent::RoomCreated {
                room_id: room_id.to_string(),
            },
            Event::RoomJoined { room_id, seat } => WireEvent::RoomJoined {
                room_id: room_id.to_string(),
                seat: seat.number(),
            },
            Event::PlayerJoined { count } => WireEvent::PlayerJoined { count: *count },
            Event::GameStarted {
                board,
                seat,
                time_remaining,
            } => WireEvent::GameStarted {
                board: board_to_wire(board),
                seat: seat.number(),
                time_remaining: *time_remaining,
            },
            Event::TimerUpdate {
                time_remaining,
                seat,
            } => WireEvent::TimerUpdate {
                time_remaining: *time_remaining,
                seat: seat.number(),
            },
            Event::CellsCleared { cells, score, seat } => WireEvent::CellsCleared {
                cells: cells.iter().copied().map(WireCellPos::from).collect(),
                score: *score,
                seat: seat.number(),
            },
            Event::InvalidSelection => WireEvent::InvalidSelection,
            Event::OpponentScore { seat, score } => WireEvent::OpponentScore {
                seat: seat.number(),
                score: *score,
            },
            Event::PlayerFinished { seat, score } => WireEvent::PlayerFinished {
                seat: seat.number(),
                score: *score,
            },
            Event::OpponentFinished {
                opponent_score,
                opponent_seat,
            } => WireEvent::OpponentFinished {
                opponent_score: *opponent_score,
                opponent_seat: opponent_seat.number(),
            },
            Event::GameEnded { scores, winner } => WireEvent::GameEnded {
                scores: WireScores {
                    one: scores.one,
                    two: scores.two,
                },
                winner: winner.map(Seat::number).unwrap_or(0),
            },
            Event::OpponentWantsPlayAgain => WireEvent::OpponentWantsPlayAgain,
            Event::GameReset { message } => WireEvent::GameReset {
                message: message.clone(),
            },
            Event::PlayerLeft => WireEvent::PlayerLeft,
            Event::Error { op, error } => {
                let reason = error.to_string();
                match op {
                    Op::Create => WireEvent::CreateError { reason },
                    Op::Join => WireEvent::JoinError { reason },
                    Op::Start => WireEvent::StartError { reason },
                    Op::Select => WireEvent::SelectError { reason },
                    Op::PlayAgain => WireEvent::PlayAgainError { reason },
                }
            }
        }
    }
}
