//! sumten-core
//!
//! Pure game logic for the two-player "make ten" puzzle:
//! - board generation and the selection rule
//! - per-seat sessions and rooms
//! - the room registry
//! - the orchestrator that runs each room's match state machine
//!
//! Nothing in here does I/O or sleeps; countdowns go through the
//! [`Scheduler`] seam.

pub mod seat;
pub mod board;
pub mod selection;
pub mod room_id;
pub mod config;
pub mod error;
pub mod messages;
pub mod timer;
pub mod session;
pub mod room;
pub mod registry;
pub mod orchestrator;

pub use seat::Seat;
pub use board::{Board, Cell, CellPos, COLS, ROWS};
pub use selection::{validate, RejectReason, Selection, TARGET_SUM};
pub use room_id::{RoomId, RoomIdError};
pub use config::{BoardMode, GameConfig};
pub use error::GameError;

pub use messages::{
    Command,
    ConnectionId,
    Delivery,
    Event,
    Op,
    Scores,
};

pub use timer::{ManualScheduler, Scheduler, TimerHandle};
pub use session::PlayerSession;
pub use room::{Room, RoomPhase, SeatBinding};
pub use registry::{Departure, RoomRegistry};
pub use orchestrator::Orchestrator;
