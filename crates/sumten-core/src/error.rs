//! Error types for room commands.
//!
//! None of these are fatal: the orchestrator turns each one into an
//! `<op>-error` event for the connection that sent the command and the room
//! carries on.

use thiserror::Error;

use crate::room_id::RoomIdError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,

    #[error("Invalid room id: {0}")]
    InvalidRoomId(#[from] RoomIdError),

    #[error("Invalid seat number {0}")]
    InvalidSeat(u8),

    /// The command names a seat the sending connection does not occupy.
    #[error("Not your seat")]
    NotYourSeat,

    #[error("Waiting for an opponent to join")]
    WaitingForOpponent,

    /// The connection already sits in a room.
    #[error("Already seated in a room")]
    AlreadySeated,

    #[error("Match still in progress")]
    MatchInProgress,
}
