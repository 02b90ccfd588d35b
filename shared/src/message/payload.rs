//! Push event payloads
//!
//! Payloads are advisory: a handler may use them to decide which local
//! state to invalidate, but authoritative values always come from a
//! re-fetch. A payload that fails to parse downgrades the event to a
//! bare signal.

use serde::{Deserialize, Serialize};

/// `table_hold_expired` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldExpiredPayload {
    pub user_id: String,
    pub table_id: String,
}

/// `combo_update` payload
///
/// Identifies which combos the server touched. The handler re-fetches
/// the combo catalog regardless; the ids only scope log output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboUpdatePayload {
    #[serde(default)]
    pub combo_ids: Vec<String>,
}

/// `update_status_order` payload
///
/// Carried for tracing only; no field here is trusted. The handler
/// re-fetches the order list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusChangedPayload {
    #[serde(default)]
    pub order_id: Option<String>,
}
