//! Central engine loop.
//!
//! This task owns the `Orchestrator` (and with it every room) and
//! processes all `EngineRequest`s: client commands, disconnects and timer
//! ticks. Because it is the only place room state is touched, requests
//! for any one room are applied strictly one after another.
//!
//! Routing is already decided by the orchestrator: every `Delivery` names
//! its target connection, so this loop just forwards it.

use std::collections::HashMap;

use sumten_core::{Delivery, GameConfig, Orchestrator, RoomRegistry};
use tracing::{debug, info};

use crate::scheduler::TokioScheduler;
use crate::types::{
    ClientId, ClientRegistry, EngineRequest, EngineRx, Outbound, OutboundTx, WeakEngineTx,
};

/// Run the central engine processing loop.
///
/// - `engine_rx`: receives requests from all client and timer tasks.
/// - `timer_tx`: handed to the scheduler so timers can feed ticks back in.
/// - `clients`: registry of connected clients and their outbound channels.
pub async fn run_engine_loop(
    mut engine_rx: EngineRx,
    timer_tx: WeakEngineTx,
    clients: ClientRegistry,
    game_config: GameConfig,
) {
    let scheduler = TokioScheduler::new(timer_tx);
    let mut engine = Orchestrator::new(game_config, RoomRegistry::new(), scheduler);

    while let Some(req) = engine_rx.recv().await {
        let deliveries = match req {
            EngineRequest::Command { client_id, command } => {
                debug!(client = %client_id, ?command, "command");
                engine.handle(client_id, command)
            }
            EngineRequest::Disconnect { client_id } => engine.disconnect(client_id),
            EngineRequest::Tick {
                room_id,
                seat,
                handle,
            } => engine.tick(&room_id, seat, handle),
        };

        if deliveries.is_empty() {
            continue;
        }

        let guard = clients.read().await;
        for delivery in deliveries {
            route_output(delivery, &guard);
        }
    }

    info!(
        rooms = engine.registry().len(),
        timers = engine.scheduler().live(),
        "engine loop shutting down (engine_rx closed)"
    );
}

/// Hand one delivery to its client's writer. A client that already went
/// away is skipped; its disconnect request is on its way.
fn route_output(delivery: Delivery, clients: &HashMap<ClientId, OutboundTx>) {
    let Delivery { to, event } = delivery;
    match clients.get(&to) {
        Some(tx) => {
            let _ = tx.send(Outbound::Event(event));
        }
        None => debug!(client = %to, "dropping event for departed client"),
    }
}
