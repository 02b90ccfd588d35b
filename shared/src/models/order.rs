//! Order model (server-owned, observed by the booking core)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// ORDERING → DEPOSITED_SUCCESS → CHECK_IN → SUCCESS, with
/// CANCELLED/FAILED reachable from ORDERING or DEPOSITED_SUCCESS
/// (deposit-window timeout). The client core only drives
/// CHECK_IN → SUCCESS (table check-out) and an explicit CANCELLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Ordering,
    DepositedSuccess,
    CheckIn,
    Success,
    Cancelled,
    Failed,
}

impl OrderStatus {
    /// Terminal states never transition again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Cancelled | Self::Failed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ordering => write!(f, "ORDERING"),
            Self::DepositedSuccess => write!(f, "DEPOSITED_SUCCESS"),
            Self::CheckIn => write!(f, "CHECK_IN"),
            Self::Success => write!(f, "SUCCESS"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Order summary as re-fetched from the server
///
/// The `update_status_order` push event carries no payload this core
/// trusts; this shape is what the authoritative re-fetch returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    pub status: OrderStatus,
    pub total: f64,
    /// Unix millis
    pub created_at: i64,
}
