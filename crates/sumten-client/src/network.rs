// crates/sumten-client/src/network.rs

use anyhow::Result;
use bytes::{BufMut, BytesMut};
use sumten_core::Command;
use sumten_protocol::json_codec;
use sumten_protocol::WireEvent;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// One line from the server: the raw text and its decoded form.
pub struct Received {
    pub line: String,
    pub event: WireEvent,
}

/// JSON-lines connection to a Sum Ten server.
pub struct ServerConnection {
    server_addr: String,
    stream: TcpStream,
    read_buffer: BytesMut,
    write_buffer: BytesMut,
}

impl ServerConnection {
    pub async fn connect(server_addr: &str) -> Result<Self> {
        info!("Connecting to {}...", server_addr);
        let stream = TcpStream::connect(server_addr).await?;
        stream.set_nodelay(true)?;
        info!("Connected");

        Ok(Self {
            server_addr: server_addr.to_string(),
            stream,
            read_buffer: BytesMut::with_capacity(16 * 1024),
            write_buffer: BytesMut::with_capacity(1024),
        })
    }

    pub fn server_addr(&self) -> &str {
        &self.server_addr
    }

    pub async fn send(&mut self, command: &Command) -> Result<()> {
        let line = json_codec::encode_command(command)?;

        self.write_buffer.clear();
        self.write_buffer.put_slice(line.as_bytes());
        self.write_buffer.put_u8(b'\n');

        self.stream.write_all(&self.write_buffer).await?;
        self.stream.flush().await?;

        debug!("Sent: {}", line);
        Ok(())
    }

    /// Next server line, or `None` once the server closes the connection.
    ///
    /// Cancel safe: bytes only enter the buffer when a read completes.
    pub async fn read_event(&mut self) -> Result<Option<Received>> {
        loop {
            if let Some(pos) = self.read_buffer.iter().position(|&b| b == b'\n') {
                let raw = self.read_buffer.split_to(pos + 1);
                let line = String::from_utf8_lossy(&raw).trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let event = json_codec::decode_event(&line)?;
                return Ok(Some(Received { line, event }));
            }

            let n = self.stream.read_buf(&mut self.read_buffer).await?;
            if n == 0 {
                return Ok(None);
            }
        }
    }
}
