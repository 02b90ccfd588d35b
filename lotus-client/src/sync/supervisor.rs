//! Reconnect supervisor
//!
//! Owns the push-channel connection lifecycle as a small state machine:
//! DISCONNECTED → CONNECTING → CONNECTED → DISCONNECTED. Abnormal
//! closes wait a fixed delay and reconnect; authentication failures
//! are terminal. Missed events are never buffered or replayed — each
//! successful connect is followed by the listener's full re-sync to
//! close the gap.

use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::clock::Clock;
use crate::error::{ClientError, ClientResult};
use crate::sync::channel::PushChannel;
use crate::sync::listener::SyncListener;

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "DISCONNECTED"),
            Self::Connecting => write!(f, "CONNECTING"),
            Self::Connected => write!(f, "CONNECTED"),
        }
    }
}

/// Factory producing a fresh connection attempt
///
/// Called once per attempt; the future resolves to a subscribed
/// channel or the connection error.
pub type ConnectFn =
    Box<dyn Fn() -> BoxFuture<'static, ClientResult<Box<dyn PushChannel>>> + Send + Sync>;

/// Supervises the push-channel connection
pub struct ReconnectSupervisor {
    listener: Arc<SyncListener>,
    clock: Arc<dyn Clock>,
    reconnect_delay: Duration,
    state_tx: watch::Sender<ConnectionState>,
}

impl ReconnectSupervisor {
    pub fn new(listener: Arc<SyncListener>, clock: Arc<dyn Clock>, reconnect_delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            listener,
            clock,
            reconnect_delay,
            state_tx,
        }
    }

    /// Observe connection-state changes
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Run the connection loop
    ///
    /// Returns only on a terminal authentication failure; the caller
    /// must re-authenticate and start a new supervisor run explicitly.
    /// All other failures retry with the fixed delay. Handlers run to
    /// completion before the next envelope is read, so event handling
    /// never overlaps.
    pub async fn run(&self, connect: ConnectFn) -> ClientError {
        loop {
            self.set_state(ConnectionState::Connecting);
            match connect().await {
                Ok(channel) => {
                    self.set_state(ConnectionState::Connected);
                    tracing::info!("Push channel connected");

                    // Close the disconnection gap before consuming
                    // live events
                    self.listener.full_resync().await;

                    loop {
                        match channel.recv().await {
                            Ok(envelope) => self.listener.dispatch(&envelope).await,
                            Err(e) if e.is_auth() => {
                                self.set_state(ConnectionState::Disconnected);
                                tracing::error!(error = %e, "Push channel authentication failed");
                                return e;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Push channel closed abnormally");
                                break;
                            }
                        }
                    }
                }
                Err(e) if e.is_auth() => {
                    self.set_state(ConnectionState::Disconnected);
                    tracing::error!(error = %e, "Push channel authentication failed");
                    return e;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Push channel connect failed");
                }
            }

            self.set_state(ConnectionState::Disconnected);
            self.clock.sleep(self.reconnect_delay).await;
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            tracing::debug!(from = %current, to = %state, "Connection state changed");
            *current = state;
            true
        });
    }
}
