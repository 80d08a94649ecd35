//! MCP transports
//!
//! A transport frames JSON-RPC traffic for the server loop: it yields
//! incoming messages (requests and notifications alike) one at a time and
//! carries responses back. Framing faults are a transport concern and are
//! recovered here; only a genuine I/O failure surfaces as an error.

use super::protocol::{
    IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    RequestId,
};
use crate::error::DynmcpError;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin, Stdout};

/// Transport trait for MCP communication
#[async_trait]
pub trait Transport: Send + Sync {
    /// Next incoming message, or `None` once the peer has disconnected
    async fn receive(&mut self) -> crate::error::Result<Option<IncomingMessage>>;

    /// Send a response back to the peer
    async fn send(&mut self, response: JsonRpcResponse) -> crate::error::Result<()>;
}

// Lets callers keep hold of a transport while the server drives it
#[async_trait]
impl<T: Transport> Transport for &mut T {
    async fn receive(&mut self) -> crate::error::Result<Option<IncomingMessage>> {
        (**self).receive().await
    }

    async fn send(&mut self, response: JsonRpcResponse) -> crate::error::Result<()> {
        (**self).send(response).await
    }
}

/// Stdio transport: newline-delimited JSON on stdin/stdout
///
/// A line that fails to parse is answered with a JSON-RPC parse-error
/// response and discarded; the session keeps serving. Empty lines are
/// skipped. EOF ends the session cleanly.
pub struct StdioTransport {
    stdin: BufReader<Stdin>,
    stdout: Stdout,
}

impl StdioTransport {
    /// Create a new stdio transport
    pub fn new() -> Self {
        Self {
            stdin: BufReader::new(tokio::io::stdin()),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn receive(&mut self) -> crate::error::Result<Option<IncomingMessage>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .stdin
                .read_line(&mut line)
                .await
                .map_err(|e| DynmcpError::Transport(format!("failed to read from stdin: {e}")))?;
            if read == 0 {
                return Ok(None); // EOF
            }

            let raw = line.trim();
            if raw.is_empty() {
                continue;
            }

            match serde_json::from_str(raw) {
                Ok(message) => return Ok(Some(message)),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed JSON-RPC line");
                    let reply =
                        JsonRpcResponse::error(RequestId::Null, JsonRpcError::parse_error());
                    self.send(reply).await?;
                }
            }
        }
    }

    async fn send(&mut self, response: JsonRpcResponse) -> crate::error::Result<()> {
        let mut frame = serde_json::to_string(&response)
            .map_err(|e| DynmcpError::Transport(format!("failed to serialize response: {e}")))?;
        frame.push('\n');

        self.stdout
            .write_all(frame.as_bytes())
            .await
            .map_err(|e| DynmcpError::Transport(format!("failed to write to stdout: {e}")))?;
        self.stdout
            .flush()
            .await
            .map_err(|e| DynmcpError::Transport(format!("failed to flush stdout: {e}")))?;

        Ok(())
    }
}

/// In-memory transport for tests: queue messages in, collect responses out
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbox: VecDeque<IncomingMessage>,
    outbox: Vec<JsonRpcResponse>,
}

impl MemoryTransport {
    /// Create an empty memory transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request for the server to receive
    pub fn push_request(&mut self, request: JsonRpcRequest) {
        self.inbox.push_back(IncomingMessage::Request(request));
    }

    /// Queue a notification for the server to receive
    pub fn push_notification(&mut self, notification: JsonRpcNotification) {
        self.inbox.push_back(IncomingMessage::Notification(notification));
    }

    /// All responses the server has sent, in order
    pub fn responses(&self) -> &[JsonRpcResponse] {
        &self.outbox
    }

    /// Take the most recent response
    pub fn pop_response(&mut self) -> Option<JsonRpcResponse> {
        self.outbox.pop()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn receive(&mut self) -> crate::error::Result<Option<IncomingMessage>> {
        Ok(self.inbox.pop_front())
    }

    async fn send(&mut self, response: JsonRpcResponse) -> crate::error::Result<()> {
        self.outbox.push(response);
        Ok(())
    }
}
