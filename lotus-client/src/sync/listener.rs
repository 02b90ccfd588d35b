//! Synchronization listener
//!
//! One dispatcher per event kind, each independently testable by
//! feeding synthetic envelopes. Handlers are idempotent and run to
//! completion before the next event is processed; whenever a payload
//! could be stale relative to a concurrent direct mutation, the
//! handler re-fetches authoritative state instead of applying the
//! payload verbatim.

use shared::message::{Envelope, HoldExpiredPayload, PushEventKind};
use shared::models::{ItemKind, OrderSummary, Voucher};
use std::sync::Arc;
use tokio::sync::watch;

use crate::api::{CatalogApi, OrderApi, VoucherApi};
use crate::cart::CartStore;
use crate::hold::HoldManager;

/// Dispatches push events to the cart store and hold manager
pub struct SyncListener {
    cart: Arc<CartStore>,
    holds: Arc<HoldManager>,
    catalog: Arc<dyn CatalogApi>,
    vouchers: Arc<dyn VoucherApi>,
    orders: Arc<dyn OrderApi>,
    orders_tx: watch::Sender<Vec<OrderSummary>>,
    vouchers_tx: watch::Sender<Vec<Voucher>>,
}

impl SyncListener {
    pub fn new(
        cart: Arc<CartStore>,
        holds: Arc<HoldManager>,
        catalog: Arc<dyn CatalogApi>,
        vouchers: Arc<dyn VoucherApi>,
        orders: Arc<dyn OrderApi>,
    ) -> Self {
        let (orders_tx, _) = watch::channel(Vec::new());
        let (vouchers_tx, _) = watch::channel(Vec::new());
        Self {
            cart,
            holds,
            catalog,
            vouchers,
            orders,
            orders_tx,
            vouchers_tx,
        }
    }

    /// Latest re-fetched order list
    pub fn orders(&self) -> watch::Receiver<Vec<OrderSummary>> {
        self.orders_tx.subscribe()
    }

    /// Latest re-fetched eligible-voucher list
    pub fn eligible_vouchers(&self) -> watch::Receiver<Vec<Voucher>> {
        self.vouchers_tx.subscribe()
    }

    /// Dispatch one envelope to its handler
    pub async fn dispatch(&self, envelope: &Envelope) {
        tracing::debug!(event = %envelope.kind, "Push event received");
        match envelope.kind {
            PushEventKind::TableHoldExpired => self.on_hold_expired(envelope),
            PushEventKind::ComboUpdate => self.reconcile_combos().await,
            PushEventKind::ReloadVoucherToOrder => self.reload_vouchers().await,
            PushEventKind::UpdateStatusOrder => self.refresh_orders().await,
        }
    }

    /// Full re-sync after a reconnect gap: the channel never replays
    /// missed events, so observe the hold TTL and reconcile the combo
    /// catalog against whatever happened while disconnected.
    pub async fn full_resync(&self) {
        tracing::info!("Running full re-sync");
        if let Err(e) = self.holds.observe_ttl().await {
            tracing::debug!(error = %e, "Hold TTL observation failed during re-sync");
        }
        self.reconcile_combos().await;
    }

    fn on_hold_expired(&self, envelope: &Envelope) {
        // Scope the clear to our own hold when the payload names one;
        // an empty or unparseable payload still clears (idempotent)
        if let Ok(payload) = envelope.parse_payload::<HoldExpiredPayload>() {
            if let Some(selection) = self.holds.current() {
                if selection.hold.table_id != payload.table_id {
                    tracing::debug!(
                        held = %selection.hold.table_id,
                        expired = %payload.table_id,
                        "Expiry event for a different table, ignoring"
                    );
                    return;
                }
            }
        }
        self.holds.on_expiry_event();
    }

    /// Re-fetch the combo catalog and correct the draft
    ///
    /// Combos gone from the catalog or no longer active lose their
    /// cart line entirely; price changes are patched in place. Both
    /// corrections surface notices through the cart store.
    async fn reconcile_combos(&self) {
        let combos = match self.catalog.fetch_combos().await {
            Ok(combos) => combos,
            Err(e) => {
                tracing::warn!(error = %e, "Combo catalog re-fetch failed, keeping draft as-is");
                return;
            }
        };

        let lines: Vec<(String, f64)> = self
            .cart
            .draft()
            .items
            .iter()
            .filter(|line| line.kind == ItemKind::Combo)
            .map(|line| (line.id.clone(), line.unit_price))
            .collect();

        for (combo_id, unit_price) in lines {
            match combos.iter().find(|c| c.id == combo_id) {
                None => self.cart.remove_combo_line(&combo_id),
                Some(combo) if !combo.active => self.cart.remove_combo_line(&combo_id),
                Some(combo) if combo.price != unit_price => {
                    self.cart.reconcile_combo_price(&combo_id, combo.price)
                }
                Some(_) => {}
            }
        }
    }

    /// Clear the voucher selection and re-fetch the eligible list
    async fn reload_vouchers(&self) {
        self.cart.clear_voucher_selection();
        match self.vouchers.eligible_vouchers().await {
            Ok(list) => {
                let _ = self.vouchers_tx.send(list);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Eligible-voucher re-fetch failed");
            }
        }
    }

    /// Re-fetch the order list; the event payload is never trusted
    async fn refresh_orders(&self) {
        match self.orders.list_orders().await {
            Ok(list) => {
                let _ = self.orders_tx.send(list);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Order list re-fetch failed");
            }
        }
    }
}
