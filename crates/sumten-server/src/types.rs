//! Shared types for the game server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - channel aliases between clients, timers and the engine loop
//! - `EngineRequest`: messages flowing into the engine loop
//! - `Outbound`: messages flowing out to one client's writer

use std::collections::HashMap;
use std::sync::Arc;

use sumten_core::{Command, Event, RoomId, Seat, TimerHandle};
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a connected client; the core knows it as a connection.
pub use sumten_core::ConnectionId as ClientId;

/// What a client's writer task sends down the socket.
#[derive(Debug, Clone)]
pub enum Outbound {
    /// An event from the orchestrator.
    Event(Event),
    /// The client sent a line we could not decode.
    Rejected(String),
}

/// Outbound messages to a given client.
pub type OutboundTx = mpsc::UnboundedSender<Outbound>;
pub type OutboundRx = mpsc::UnboundedReceiver<Outbound>;

/// Registry of connected clients and their outbound channels.
///
/// - Key: `ClientId`
/// - Value: `OutboundTx` to send messages to that client.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, OutboundTx>>>;

/// Message flowing into the central engine task.
#[derive(Debug)]
pub enum EngineRequest {
    /// A decoded command from a client.
    Command { client_id: ClientId, command: Command },

    /// The client's connection closed.
    Disconnect { client_id: ClientId },

    /// A countdown period elapsed.
    Tick {
        room_id: RoomId,
        seat: Seat,
        handle: TimerHandle,
    },
}

/// Channel from clients and timers → engine task.
pub type EngineTx = mpsc::UnboundedSender<EngineRequest>;
pub type EngineRx = mpsc::UnboundedReceiver<EngineRequest>;

/// Timers hold a weak sender so they never keep the engine loop alive.
pub type WeakEngineTx = mpsc::WeakUnboundedSender<EngineRequest>;
