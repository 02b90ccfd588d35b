//! Push-channel message types
//!
//! Shared between the booking core and whatever transport the embedding
//! app supplies (in-process bus, socket bridge). Delivery is
//! at-most-once and unordered across distinct event names, so every
//! consumer treats payloads as advisory and re-fetches authoritative
//! state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// Closed catalog of push events consumed by the booking core
///
/// The discriminant strings are the wire event names and must not
/// change without coordinating with the console emitters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PushEventKind {
    /// A table hold reached its TTL server-side
    TableHoldExpired,
    /// Combo catalog changed (price or active flag)
    ComboUpdate,
    /// The voucher eligibility set was invalidated
    ReloadVoucherToOrder,
    /// An order changed status server-side; re-fetch, payload untrusted
    UpdateStatusOrder,
}

impl PushEventKind {
    /// Wire event name
    pub fn name(&self) -> &'static str {
        match self {
            Self::TableHoldExpired => "table_hold_expired",
            Self::ComboUpdate => "combo_update",
            Self::ReloadVoucherToOrder => "reloadVoucherToOrder",
            Self::UpdateStatusOrder => "update_status_order",
        }
    }

    /// Parse a wire event name; unknown names are reported, not fatal
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "table_hold_expired" => Some(Self::TableHoldExpired),
            "combo_update" => Some(Self::ComboUpdate),
            "reloadVoucherToOrder" => Some(Self::ReloadVoucherToOrder),
            "update_status_order" => Some(Self::UpdateStatusOrder),
            _ => None,
        }
    }
}

impl fmt::Display for PushEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One push-channel message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub request_id: Uuid,
    pub kind: PushEventKind,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(kind: PushEventKind, payload: Vec<u8>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            kind,
            payload,
        }
    }

    /// Build an envelope with an empty payload
    pub fn signal(kind: PushEventKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Build an envelope from a serializable payload
    pub fn with_payload<T: Serialize>(kind: PushEventKind, payload: &T) -> Self {
        let bytes = serde_json::to_vec(payload).expect("Failed to serialize push payload");
        Self::new(kind, bytes)
    }

    /// Parse the payload as the given type
    pub fn parse_payload<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
