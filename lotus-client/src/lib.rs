//! Lotus booking core
//!
//! Client-local reservation-and-reconciliation library for the Lotus
//! table-booking system. Keeps three pieces of mutable state consistent
//! across many concurrently connected clients without a central lock:
//! table occupancy, the time-bounded table hold gating the booking
//! flow, and the diner's order draft. Consistency is eventual:
//! authoritative re-fetch plus best-effort push invalidation.
//!
//! The crate is an in-process library consumed by a presentation
//! layer; rendering, authentication and payment flows live elsewhere
//! and are reached through the traits in [`api`].

pub mod api;
pub mod cart;
pub mod clock;
pub mod config;
pub mod error;
pub mod hold;
pub mod http;
pub mod session;
pub mod storage;
pub mod sync;
pub mod table;

pub use api::{CatalogApi, HoldApi, HoldGrant, OrderApi, TableApi, VoucherApi};
pub use cart::{CartItem, CartNotice, CartStore, OrderDraft};
pub use clock::{Clock, SystemClock};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use hold::{HeldSelection, Hold, HoldManager};
pub use http::HttpApi;
pub use session::{BookingSession, GateOutcome};
pub use storage::DraftStorage;
pub use sync::{
    ConnectionState, MemoryChannel, PushChannel, ReconnectSupervisor, SyncListener,
};
pub use table::{TableAction, TableStateMachine};
