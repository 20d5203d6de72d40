//! Per-connection I/O.
//!
//! Each connection speaks one of two line protocols, picked from its
//! first byte: `{` means JSON lines, anything else the comma separated
//! text form. Replies go out in the same protocol.

use bytes::BytesMut;
use sumten_core::Command;
use sumten_protocol::json_codec;
use sumten_protocol::text_codec;
use sumten_protocol::{ProtocolError, WireEvent};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::types::{
    ClientId, ClientRegistry, EngineRequest, EngineTx, Outbound, OutboundRx, OutboundTx,
};

/// Longest line we buffer before giving up on it.
const MAX_LINE_LEN: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Protocol {
    Json,
    Text,
}

impl Protocol {
    fn detect(first_byte: u8) -> Self {
        if first_byte == b'{' {
            Protocol::Json
        } else {
            Protocol::Text
        }
    }

    fn decode(self, line: &str) -> Result<Option<Command>, ProtocolError> {
        match self {
            Protocol::Json => json_codec::decode_command(line).map(Some),
            Protocol::Text => text_codec::parse_command_line(line),
        }
    }

    fn encode(self, msg: &Outbound) -> Result<String, ProtocolError> {
        let wire = match msg {
            Outbound::Event(event) => WireEvent::from(event),
            Outbound::Rejected(reason) => WireEvent::Error {
                reason: reason.clone(),
            },
        };
        match self {
            Protocol::Json => json_codec::encode_wire_event(&wire),
            Protocol::Text => Ok(text_codec::format_event_line(&wire)),
        }
    }
}

/// Run the client I/O loop for a single connection.
///
/// Returns once the peer closes the connection. The engine is always told
/// about the departure and the client is always removed from the registry.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    engine_tx: EngineTx,
    out_tx: OutboundTx,
    out_rx: OutboundRx,
    clients: ClientRegistry,
) -> anyhow::Result<()> {
    let (mut read_stream, write_stream) = stream.into_split();

    // Nothing is addressed to a client before it sends its first line,
    // so waiting here does not hold up any output.
    let mut first_byte = [0u8; 1];
    let protocol = match read_stream.peek(&mut first_byte).await {
        Ok(n) if n > 0 => Protocol::detect(first_byte[0]),
        _ => Protocol::Text,
    };
    debug!(client = %client_id, ?protocol, "protocol detected");

    let writer = tokio::spawn(run_writer(client_id, protocol, write_stream, out_rx));

    let result = run_reader(client_id, protocol, &mut read_stream, &engine_tx, &out_tx).await;

    if engine_tx.send(EngineRequest::Disconnect { client_id }).is_err() {
        warn!(client = %client_id, "engine channel closed before disconnect");
    }
    {
        let mut guard = clients.write().await;
        guard.remove(&client_id);
    }

    // With the registry entry gone this was the last sender, so the
    // writer drains what is queued and stops.
    drop(out_tx);
    let _ = writer.await;

    result
}

/// Splits the inbound byte stream into lines, dropping any line longer
/// than `max_len` as a whole.
struct LineFramer {
    buffer: BytesMut,
    max_len: usize,
    /// Inside an oversized line; bytes are dropped through the next `\n`.
    discarding: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Framed {
    Line(BytesMut),
    /// Reported once per oversized line.
    TooLong,
}

impl LineFramer {
    fn new(max_len: usize) -> Self {
        LineFramer {
            buffer: BytesMut::with_capacity(4096),
            max_len,
            discarding: false,
        }
    }

    fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }

    fn next_line(&mut self) -> Option<Framed> {
        loop {
            let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') else {
                if self.buffer.len() > self.max_len {
                    self.buffer.clear();
                    if !self.discarding {
                        self.discarding = true;
                        return Some(Framed::TooLong);
                    }
                }
                return None;
            };

            let line = self.buffer.split_to(newline_pos + 1);
            if self.discarding {
                self.discarding = false;
                continue;
            }
            if newline_pos > self.max_len {
                return Some(Framed::TooLong);
            }
            return Some(Framed::Line(line));
        }
    }

    /// At EOF: whatever is left, unless it belongs to an oversized line.
    fn finish(&mut self) -> Option<BytesMut> {
        if self.discarding || self.buffer.is_empty() {
            return None;
        }
        Some(self.buffer.split())
    }
}

async fn run_reader(
    client_id: ClientId,
    protocol: Protocol,
    read_stream: &mut OwnedReadHalf,
    engine_tx: &EngineTx,
    out_tx: &OutboundTx,
) -> anyhow::Result<()> {
    let mut framer = LineFramer::new(MAX_LINE_LEN);

    loop {
        let n = read_stream.read_buf(framer.buffer_mut()).await?;

        while let Some(framed) = framer.next_line() {
            match framed {
                Framed::Line(line) => {
                    if !forward_line(client_id, protocol, &line, engine_tx, out_tx) {
                        return Ok(());
                    }
                }
                Framed::TooLong => {
                    warn!(client = %client_id, "line too long, discarding");
                    let _ = out_tx.send(Outbound::Rejected("Line too long".to_string()));
                }
            }
        }

        if n == 0 {
            // EOF: a final line without a newline still counts.
            if let Some(line) = framer.finish() {
                forward_line(client_id, protocol, &line, engine_tx, out_tx);
            }
            return Ok(());
        }
    }
}

/// Decode one raw line and hand it to the engine. Returns `false` once the
/// engine has gone away.
fn forward_line(
    client_id: ClientId,
    protocol: Protocol,
    raw: &[u8],
    engine_tx: &EngineTx,
    out_tx: &OutboundTx,
) -> bool {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim();
    if line.is_empty() {
        return true;
    }
    debug!(client = %client_id, %line, "recv");

    match protocol.decode(line) {
        Ok(Some(command)) => {
            if engine_tx
                .send(EngineRequest::Command { client_id, command })
                .is_err()
            {
                warn!(client = %client_id, "engine channel closed");
                return false;
            }
        }
        Ok(None) => {}
        Err(err) => {
            warn!(client = %client_id, error = %err, %line, "undecodable line");
            let _ = out_tx.send(Outbound::Rejected(err.to_string()));
        }
    }
    true
}

async fn run_writer(
    client_id: ClientId,
    protocol: Protocol,
    mut write_stream: OwnedWriteHalf,
    mut out_rx: OutboundRx,
) {
    while let Some(msg) = out_rx.recv().await {
        let mut line = match protocol.encode(&msg) {
            Ok(line) => line,
            Err(err) => {
                warn!(client = %client_id, error = %err, "encode error");
                continue;
            }
        };
        debug!(client = %client_id, %line, "send");
        line.push('\n');

        if let Err(err) = write_stream.write_all(line.as_bytes()).await {
            warn!(client = %client_id, error = %err, "write error");
            break;
        }
    }
    let _ = write_stream.shutdown().await;
}
