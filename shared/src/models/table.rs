//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table occupancy status
///
/// Transitions happen only through the table state machine; every other
/// consumer treats the status as read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// Free, no reservation
    Empty,
    /// Reserved ahead of arrival
    Reserved,
    /// Guests seated, no active order yet
    Occupied,
    /// Guests seated with an active order
    Serving,
    /// Bill requested, payment pending
    WaitingPayment,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY"),
            Self::Reserved => write!(f, "RESERVED"),
            Self::Occupied => write!(f, "OCCUPIED"),
            Self::Serving => write!(f, "SERVING"),
            Self::WaitingPayment => write!(f, "WAITING_PAYMENT"),
        }
    }
}

/// Dining table entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    /// Short display code, e.g. "A12"
    pub code: String,
    pub guest_count: i32,
    pub area_id: String,
    pub status: TableStatus,
}

/// Partial update payload for remote table mutation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<i32>,
}

impl TableUpdate {
    /// Update that only changes the status
    pub fn status(status: TableStatus) -> Self {
        Self {
            status: Some(status),
            guest_count: None,
        }
    }
}
