//! Table state machine
//!
//! Validates and executes table-status transitions. Check-in and
//! check-out are two-phase: the order-side remote call must succeed
//! before the table mutation is issued, so a failure leaves the table
//! in its prior state. Nothing here retries; the caller decides.

use shared::error::AppError;
use shared::models::{OrderStatus, Table, TableStatus, TableUpdate};
use std::fmt;
use std::sync::Arc;

use crate::api::{OrderApi, TableApi};
use crate::error::ClientResult;

/// Staff/diner actions on a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableAction {
    Reserve,
    CancelReserve,
    /// Requires an order reference; drives remote check-in first
    CheckIn,
    StartServing,
    /// Requires an order reference; drives the order to SUCCESS first
    CheckOut,
    FinishPayment,
}

impl fmt::Display for TableAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserve => write!(f, "RESERVE"),
            Self::CancelReserve => write!(f, "CANCEL_RESERVE"),
            Self::CheckIn => write!(f, "CHECK_IN"),
            Self::StartServing => write!(f, "START_SERVING"),
            Self::CheckOut => write!(f, "CHECK_OUT"),
            Self::FinishPayment => write!(f, "FINISH_PAYMENT"),
        }
    }
}

/// Resulting status for an action applied to a table in `status`,
/// or `None` when the action is not permitted from that status
pub fn target_status(status: TableStatus, action: TableAction) -> Option<TableStatus> {
    use TableAction::*;
    use TableStatus::*;
    match (status, action) {
        (Empty, Reserve) => Some(Reserved),
        (Reserved, CancelReserve) => Some(Empty),
        (Empty | Reserved, CheckIn) => Some(Serving),
        (Occupied, StartServing) => Some(Serving),
        (Serving | WaitingPayment, CheckOut) => Some(Empty),
        (WaitingPayment, FinishPayment) => Some(Empty),
        _ => None,
    }
}

/// Executes validated table transitions against the remote console
pub struct TableStateMachine {
    tables: Arc<dyn TableApi>,
    orders: Arc<dyn OrderApi>,
}

impl TableStateMachine {
    pub fn new(tables: Arc<dyn TableApi>, orders: Arc<dyn OrderApi>) -> Self {
        Self { tables, orders }
    }

    /// Apply an action to a table
    ///
    /// Rejected actions return a domain error naming the action and the
    /// current status; no mutation is issued. For CHECK_IN/CHECK_OUT
    /// the order-side call commits first and its failure skips the
    /// table mutation entirely.
    pub async fn apply(
        &self,
        table: &Table,
        action: TableAction,
        order_id: Option<&str>,
    ) -> ClientResult<Table> {
        let Some(target) = target_status(table.status, action) else {
            return Err(AppError::invalid_transition(
                action.to_string(),
                table.status.to_string(),
            )
            .into());
        };

        match action {
            TableAction::CheckIn => {
                let order_id = require_order(action, order_id)?;
                self.orders.check_in(order_id).await?;
            }
            TableAction::CheckOut => {
                let order_id = require_order(action, order_id)?;
                self.orders
                    .set_order_status(order_id, OrderStatus::Success)
                    .await?;
            }
            _ => {}
        }

        let updated = self
            .tables
            .update_table(&table.id, TableUpdate::status(target))
            .await?;
        tracing::info!(
            table_id = %table.id,
            action = %action,
            from = %table.status,
            to = %target,
            "Table transition applied"
        );
        Ok(updated)
    }
}

fn require_order<'a>(action: TableAction, order_id: Option<&'a str>) -> ClientResult<&'a str> {
    order_id.ok_or_else(|| {
        AppError::invalid_request(format!("{} requires an order reference", action)).into()
    })
}
