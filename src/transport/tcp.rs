use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::{ClientConfig, DEFAULT_TIMEOUT_SECS, MAX_FRAME_SIZE, PROTOCOL_VERSION};
use crate::protocol::{Envelope, Message};
use crate::transport::Transport;

/// Length-prefixed bincode frames over TCP.
///
/// Each frame is a 4-byte big-endian body length followed by a bincode
/// [`Envelope`]. Frames from a different protocol version are rejected.
///
/// `recv` is cancel-safe: partial frames are buffered across calls, so it can
/// sit in a `select!` next to other event sources. It has no timeout of its
/// own; waiting on the authority is unbounded. Sends are bounded by
/// `io_timeout`.
pub struct TcpTransport {
    stream: TcpStream,
    io_timeout: Duration,
    max_frame_size: u32,
    read_buf: Vec<u8>,
}

fn map_io(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        ErrorKind::UnexpectedEof => anyhow::anyhow!("Connection closed by peer"),
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
            anyhow::anyhow!("Connection reset by peer")
        }
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_limits(
            stream,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            MAX_FRAME_SIZE,
        )
    }

    pub fn with_limits(stream: TcpStream, io_timeout: Duration, max_frame_size: u32) -> Self {
        Self {
            stream,
            io_timeout,
            max_frame_size,
            read_buf: Vec::new(),
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    /// Connect using the address and limits of a [`ClientConfig`].
    pub async fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(config.addr.as_str())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to {}: {}", config.addr, e))?;
        Ok(Self::with_limits(
            stream,
            Duration::from_secs(config.timeout_secs),
            config.max_frame_size,
        ))
    }

    async fn write_frame(&mut self, msg: Message) -> anyhow::Result<()> {
        let data = bincode::serialize(&Envelope {
            version: PROTOCOL_VERSION,
            message: msg,
        })
        .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;
        if data.len() as u64 > self.max_frame_size as u64 {
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                data.len(),
                self.max_frame_size
            ));
        }
        let len = (data.len() as u32).to_be_bytes();
        self.stream.write_all(&len).await.map_err(map_io)?;
        self.stream.write_all(&data).await.map_err(map_io)?;
        self.stream.flush().await.map_err(map_io)?;
        Ok(())
    }

    /// Pop one complete frame body off the read buffer, if there is one.
    fn take_frame(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        if self.read_buf.len() < 4 {
            return Ok(None);
        }
        let len = u32::from_be_bytes([
            self.read_buf[0],
            self.read_buf[1],
            self.read_buf[2],
            self.read_buf[3],
        ]);
        if len == 0 {
            // An empty frame is still delimited; skip it so later frames decode.
            self.read_buf.drain(..4);
            return Err(anyhow::anyhow!("Invalid message length: 0"));
        }
        if len > self.max_frame_size {
            // The body is never buffered, so the stream cannot be resynced.
            self.read_buf.clear();
            return Err(anyhow::anyhow!(
                "Message too large: {} bytes (max: {})",
                len,
                self.max_frame_size
            ));
        }
        let end = 4 + len as usize;
        if self.read_buf.len() < end {
            return Ok(None);
        }
        let body = self.read_buf[4..end].to_vec();
        self.read_buf.drain(..end);
        Ok(Some(body))
    }

    async fn read_frame(&mut self) -> anyhow::Result<Message> {
        let body = loop {
            if let Some(body) = self.take_frame()? {
                break body;
            }
            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk).await.map_err(map_io)?;
            if n == 0 {
                return Err(if self.read_buf.is_empty() {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Connection closed mid-frame")
                });
            }
            self.read_buf.extend_from_slice(&chunk[..n]);
        };
        let env: Envelope = bincode::deserialize(&body)
            .map_err(|e| anyhow::anyhow!("Deserialization error: {}", e))?;
        if env.version != PROTOCOL_VERSION {
            return Err(anyhow::anyhow!(
                "Protocol version mismatch: expected {}, got {}",
                PROTOCOL_VERSION,
                env.version
            ));
        }
        Ok(env.message)
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        let limit = self.io_timeout;
        timeout(limit, self.write_frame(msg))
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", limit))?
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        self.read_frame().await
    }
}
