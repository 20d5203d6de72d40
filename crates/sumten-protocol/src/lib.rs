//! sumten-protocol
//!
//! Wire-level encoding/decoding for the Sum Ten server.
//!
//! This crate is responsible for turning logical messages
//! (`sumten_core::Command` / `Event`) into lines and back again.
//!
//! - [`json_codec`] : JSON lines (browsers, bots, the terminal client)
//! - [`text_codec`] : comma-separated text lines (netcat, scripted matches)

use thiserror::Error;

pub mod wire_types;
pub mod json_codec;
pub mod text_codec;

pub use json_codec::{decode_command, decode_event, encode_command, encode_event};
pub use wire_types::{WireCell, WireCellPos, WireCommand, WireEvent, WireScores};

/// Errors that can arise when encoding/decoding a line.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Blank line where a message was required.
    #[error("Empty message")]
    Empty,

    /// Malformed JSON or a JSON object that is not a known message.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown text command keyword.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field: {0}")]
    InvalidField(&'static str),
}
