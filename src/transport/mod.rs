//! Message transports between the client and the authority.

use crate::protocol::Message;

/// Ordered, bidirectional message pipe. Implementations deliver messages in
/// the order they were sent.
#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

pub mod in_memory;
pub mod tcp;
