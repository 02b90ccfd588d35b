//! Push channel transport abstraction
//!
//! The embedding app supplies the real transport (socket bridge,
//! in-process bus); the core only needs a stream of envelopes. The
//! memory channel doubles as the test transport and the in-process
//! wiring for a console hosted in the same binary.

use async_trait::async_trait;
use shared::message::Envelope;
use tokio::sync::{Mutex, broadcast};

use crate::error::{ClientError, ClientResult};

/// Transport abstraction for the push channel
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Receive the next envelope; an error is an abnormal close
    async fn recv(&self) -> ClientResult<Envelope>;

    /// Close the connection
    async fn close(&self) -> ClientResult<()>;
}

/// In-memory push channel over a tokio broadcast bus
pub struct MemoryChannel {
    rx: Mutex<broadcast::Receiver<Envelope>>,
}

impl MemoryChannel {
    /// Subscribe to the given bus
    pub fn new(bus: &broadcast::Sender<Envelope>) -> Self {
        Self {
            rx: Mutex::new(bus.subscribe()),
        }
    }
}

#[async_trait]
impl PushChannel for MemoryChannel {
    async fn recv(&self) -> ClientResult<Envelope> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.recv().await {
                Ok(envelope) => return Ok(envelope),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // At-most-once delivery: dropped events are closed
                    // over by the next full re-sync, keep reading
                    tracing::warn!(skipped, "Push channel lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(ClientError::Transport("Push channel closed".to_string()));
                }
            }
        }
    }

    async fn close(&self) -> ClientResult<()> {
        Ok(())
    }
}
