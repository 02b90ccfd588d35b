//! Push-channel synchronization
//!
//! One persistent push connection per active client session delivers
//! named invalidation events (at-most-once, unordered across names).
//! [`SyncListener`] turns each event into the corresponding local
//! correction; [`ReconnectSupervisor`] owns the connection lifecycle
//! and triggers a full re-sync after every reconnect, since missed
//! events are never buffered or replayed.

pub mod channel;
pub mod listener;
pub mod supervisor;

pub use channel::{MemoryChannel, PushChannel};
pub use listener::SyncListener;
pub use supervisor::{ConnectFn, ConnectionState, ReconnectSupervisor};
