//! Booking session facade
//!
//! Ties the cart store, hold manager and remote order operations into
//! the diner's booking flow. The submission itself (booking-info form,
//! deposit redirect) belongs to the presentation layer; this facade
//! covers the arcs the core owns — the pre-confirmation gate, explicit
//! cancellation and the hold release once the order moves past the
//! draft stage.

use shared::error::AppError;
use shared::models::OrderStatus;
use std::sync::Arc;

use crate::api::{CatalogApi, OrderApi};
use crate::cart::CartStore;
use crate::error::ClientResult;
use crate::hold::HoldManager;

/// Outcome of the pre-confirmation gate
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Every line is still purchasable; the flow may proceed
    Ready,
    /// Stale lines were pruned; the flow must return to item selection
    /// when nothing is left, otherwise re-run the gate
    Corrected {
        removed: Vec<String>,
        cart_empty: bool,
    },
}

/// Diner-side booking flow
pub struct BookingSession {
    cart: Arc<CartStore>,
    holds: Arc<HoldManager>,
    catalog: Arc<dyn CatalogApi>,
    orders: Arc<dyn OrderApi>,
}

impl BookingSession {
    pub fn new(
        cart: Arc<CartStore>,
        holds: Arc<HoldManager>,
        catalog: Arc<dyn CatalogApi>,
        orders: Arc<dyn OrderApi>,
    ) -> Self {
        Self {
            cart,
            holds,
            catalog,
            orders,
        }
    }

    /// Pre-confirmation gate
    ///
    /// Checks every cart line against the authoritative inactive set
    /// and prunes what is no longer purchasable. A failing lookup
    /// blocks the gate rather than risking a stale submission.
    pub async fn check_cart(&self) -> ClientResult<GateOutcome> {
        let stale = self.cart.validate_eligibility(self.catalog.as_ref()).await?;
        if stale.is_empty() {
            return Ok(GateOutcome::Ready);
        }
        self.cart.prune_ids(&stale);
        Ok(GateOutcome::Corrected {
            cart_empty: self.cart.draft().is_empty(),
            removed: stale,
        })
    }

    /// Explicit user cancellation of the in-progress booking
    ///
    /// Drives the backing order (if one exists) to CANCELLED, then
    /// releases the hold. The draft contents stay; only the
    /// table/hold relationship is cleared.
    pub async fn cancel(&self) -> ClientResult<()> {
        if let Some(order_id) = self.cart.draft().order_id {
            self.orders
                .set_order_status(&order_id, OrderStatus::Cancelled)
                .await?;
            tracing::info!(order_id = %order_id, "Booking cancelled");
        }
        self.holds.release().await
    }

    /// Booking confirmed past the draft stage
    ///
    /// Releases the hold and clears the draft wholesale. Rejected when
    /// the cart is empty; an empty order must never be submitted.
    pub async fn complete(&self) -> ClientResult<()> {
        if self.cart.draft().is_empty() {
            return Err(AppError::with_message(
                shared::error::ErrorCode::CartEmpty,
                "Cannot complete a booking with an empty cart",
            )
            .into());
        }
        self.holds.release().await?;
        self.cart.clear();
        Ok(())
    }
}
