//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ClientId`.
//! - Spawns:
//!   - a per-client task to handle I/O,
//!   - a single central engine task that owns every room.
//!
//! The actual per-client logic and engine loop live in `client`
//! and `engine_task` modules respectively.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

use crate::client;
use crate::config::Config;
use crate::engine_task;
use crate::types::{ClientId, ClientRegistry, EngineRx, EngineTx, OutboundRx, OutboundTx};

/// Counter for assigning unique `ClientId`s.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Bind the configured address and serve until the listener fails.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    serve(listener, config).await
}

/// Serve connections from an already bound listener.
///
/// `config.bind_addr` and `config.port` are ignored here; tests bind
/// port 0 themselves and hand the listener in.
pub async fn serve(listener: TcpListener, config: Config) -> anyhow::Result<()> {
    // Shared registry of clients → outbound channels.
    let clients: ClientRegistry = Arc::new(RwLock::new(Default::default()));

    // Channel from clients and timers → engine task.
    let (engine_tx, engine_rx): (EngineTx, EngineRx) = mpsc::unbounded_channel();

    // Spawn the central engine task.
    {
        let clients_clone = clients.clone();
        let timer_tx = engine_tx.downgrade();
        let game_config = config.game_config();
        tokio::spawn(async move {
            engine_task::run_engine_loop(engine_rx, timer_tx, clients_clone, game_config).await;
        });
    }

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let current_clients = {
            let guard = clients.read().await;
            guard.len()
        };

        if current_clients >= config.max_clients {
            warn!(
                %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: max_clients reached"
            );
            // Dropping the stream closes it.
            continue;
        }

        let client_id = next_client_id();
        info!(client = %client_id, %peer_addr, "accepted connection");

        // Create outbound channel for this client.
        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        // Register client.
        {
            let mut guard = clients.write().await;
            guard.insert(client_id, out_tx.clone());
        }

        // Clone handles to move into the client task.
        let clients_clone = clients.clone();
        let engine_tx_clone = engine_tx.clone();

        tokio::spawn(async move {
            let result =
                client::run_client(client_id, stream, engine_tx_clone, out_tx, out_rx, clients_clone)
                    .await;
            match result {
                Ok(()) => info!(client = %client_id, "client disconnected"),
                Err(e) => warn!(client = %client_id, error = %e, "client error"),
            }
        });
    }
}
