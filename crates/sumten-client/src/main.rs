// crates/sumten-client/src/main.rs

mod app;
mod network;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use sumten_protocol::text_codec;
use sumten_protocol::WireEvent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{App, Input, HELP};
use crate::network::{Received, ServerConnection};

#[derive(Parser)]
#[clap(name = "sumten-client")]
#[clap(about = "Terminal client for the Sum Ten game server")]
struct Cli {
    /// Server address
    #[clap(short, long, default_value = "127.0.0.1:3000")]
    server: String,

    /// Print server messages as raw JSON instead of text lines
    #[clap(short, long)]
    json: bool,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompt output.
    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let connection = ServerConnection::connect(&cli.server).await?;
    println!("connected to {} (type `help`)", connection.server_addr());

    run_repl(connection, cli.json).await
}

async fn run_repl(mut connection: ServerConnection, raw_json: bool) -> Result<()> {
    let mut app = App::new();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                match app.parse_input(&line) {
                    Ok(Input::Send(command)) => connection.send(&command).await?,
                    Ok(Input::ShowBoard) => match app.render_board() {
                        Some(board) => println!("{board}"),
                        None => println!("no board yet"),
                    },
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Quit) => break,
                    Ok(Input::Nothing) => {}
                    Err(msg) => println!("{msg}"),
                }
            }

            received = connection.read_event() => {
                let Some(Received { line, event }) = received? else {
                    warn!("server closed the connection");
                    println!("disconnected");
                    break;
                };
                app.apply(&event);

                let stamp = Local::now().format("%H:%M:%S");
                if raw_json {
                    println!("[{stamp}] {line}");
                } else {
                    println!("[{stamp}] {}", text_codec::format_event_line(&event));
                }

                // Redraw after anything that changes the grid.
                if matches!(event, WireEvent::GameStarted { .. } | WireEvent::CellsCleared { .. }) {
                    if let Some(board) = app.render_board() {
                        println!("{board}");
                    }
                }
            }
        }
    }

    Ok(())
}
