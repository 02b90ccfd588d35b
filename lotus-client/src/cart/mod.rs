//! Cart draft store
//!
//! Client-local representation of the in-progress order: cart lines,
//! attached voucher and the backing order id once the booking-info step
//! has created one. The store is a standalone state container with an
//! explicit mutation API and a watch-based subscription, independent of
//! any rendering layer.
//!
//! Every mutation funnels through one commit step that persists the
//! draft snapshot and notifies subscribers; totals are recomputed from
//! the current lines on demand and never cached.
//!
//! A single logical actor mutates the store within a client process,
//! so the internal mutex only guards against accidental cross-task
//! sharing, not a concurrent-mutation protocol.

pub mod pricing;

pub use pricing::{Totals, compute_totals};

use serde::{Deserialize, Serialize};
use shared::models::{ItemKind, Voucher};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, watch};

use crate::api::CatalogApi;
use crate::error::ClientResult;
use crate::storage::DraftStorage;

/// Notice capacity; stale receivers drop oldest notices first
const NOTICE_CHANNEL_CAPACITY: usize = 64;

/// One cart line, unique per (kind, id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub kind: ItemKind,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Snapshotted at insertion time; only reconciliation patches it
    pub unit_price: f64,
    pub quantity: i32,
}

/// The durable draft snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher: Option<Voucher>,
}

impl OrderDraft {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// User-facing reconciliation notices
///
/// Emitted when a server-originated invalidation corrects the draft;
/// the presentation layer turns these into toasts.
#[derive(Debug, Clone, PartialEq)]
pub enum CartNotice {
    /// A combo line was removed because the combo was deactivated
    ComboRemoved { combo_id: String, name: String },
    /// A combo line's unit price was patched
    ComboPriceChanged {
        combo_id: String,
        old_price: f64,
        new_price: f64,
    },
    /// A menu line was removed because the dish was deactivated
    MenuItemRemoved { menu_id: String, name: String },
    /// The attached voucher was cleared server-side
    VoucherCleared,
}

/// Cart draft store
pub struct CartStore {
    draft: Mutex<OrderDraft>,
    storage: Arc<DraftStorage>,
    draft_tx: watch::Sender<OrderDraft>,
    notice_tx: broadcast::Sender<CartNotice>,
}

impl CartStore {
    /// Create a store, restoring any persisted draft snapshot
    pub fn new(storage: Arc<DraftStorage>) -> Self {
        let draft = match storage.load_draft() {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to restore draft snapshot, starting empty");
                OrderDraft::default()
            }
        };
        let (draft_tx, _) = watch::channel(draft.clone());
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            draft: Mutex::new(draft),
            storage,
            draft_tx,
            notice_tx,
        }
    }

    /// Current draft snapshot
    pub fn draft(&self) -> OrderDraft {
        self.draft.lock().unwrap().clone()
    }

    /// Subscribe to draft changes
    pub fn subscribe(&self) -> watch::Receiver<OrderDraft> {
        self.draft_tx.subscribe()
    }

    /// Subscribe to reconciliation notices
    pub fn notices(&self) -> broadcast::Receiver<CartNotice> {
        self.notice_tx.subscribe()
    }

    /// Current totals, recomputed from the live draft
    pub fn totals(&self) -> Totals {
        let draft = self.draft.lock().unwrap();
        compute_totals(&draft.items, draft.voucher.as_ref())
    }

    /// Add an item; an existing (kind, id) line gains the quantity
    pub fn add_item(&self, item: CartItem) {
        if item.quantity <= 0 {
            return;
        }
        self.mutate(|draft| {
            match draft
                .items
                .iter_mut()
                .find(|line| line.kind == item.kind && line.id == item.id)
            {
                Some(line) => line.quantity += item.quantity,
                None => draft.items.push(item),
            }
            true
        });
    }

    /// Set a line's quantity outright; clamped to ≥ 0, pruned at 0
    pub fn set_quantity(&self, kind: ItemKind, id: &str, quantity: i32) {
        let quantity = quantity.max(0);
        self.mutate(|draft| {
            let Some(pos) = draft
                .items
                .iter()
                .position(|line| line.kind == kind && line.id == id)
            else {
                return false;
            };
            if quantity == 0 {
                draft.items.remove(pos);
            } else {
                draft.items[pos].quantity = quantity;
            }
            true
        });
    }

    /// Attach or detach the voucher (wholesale replace, no merge)
    pub fn set_voucher(&self, voucher: Option<Voucher>) {
        self.mutate(|draft| {
            draft.voucher = voucher;
            true
        });
    }

    /// Record the backing order created by the booking-info step
    pub fn set_order_id(&self, order_id: Option<String>) {
        self.mutate(|draft| {
            draft.order_id = order_id;
            true
        });
    }

    /// Clear the draft wholesale (successful submission or explicit reset)
    pub fn clear(&self) {
        self.mutate(|draft| {
            *draft = OrderDraft::default();
            true
        });
    }

    /// Pre-confirmation eligibility gate
    ///
    /// Returns the ids in the cart that are no longer purchasable.
    /// Staleness is a value, not an error; the caller must prune the
    /// returned ids before resubmitting, and redirect to selection if
    /// pruning empties the cart. A failing remote lookup blocks the
    /// gate and surfaces the transport error.
    pub async fn validate_eligibility(
        &self,
        catalog: &dyn CatalogApi,
    ) -> ClientResult<Vec<String>> {
        let ids: Vec<String> = {
            let draft = self.draft.lock().unwrap();
            draft.items.iter().map(|line| line.id.clone()).collect()
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let stale = catalog.find_inactive(&ids).await?;
        if !stale.is_empty() {
            tracing::warn!(stale = ?stale, "Cart contains items no longer purchasable");
        }
        Ok(stale)
    }

    /// Remove every line whose id is in `ids`, regardless of kind
    pub fn prune_ids(&self, ids: &[String]) {
        self.mutate(|draft| {
            let before = draft.items.len();
            draft.items.retain(|line| !ids.contains(&line.id));
            draft.items.len() != before
        });
    }

    // ==================== Reconciliation entry points ====================

    /// Patch the unit price of a combo line in place; quantity unchanged
    pub fn reconcile_combo_price(&self, combo_id: &str, new_price: f64) {
        let mut notice = None;
        self.mutate(|draft| {
            let Some(line) = draft
                .items
                .iter_mut()
                .find(|line| line.kind == ItemKind::Combo && line.id == combo_id)
            else {
                return false;
            };
            if line.unit_price == new_price {
                return false;
            }
            notice = Some(CartNotice::ComboPriceChanged {
                combo_id: combo_id.to_string(),
                old_price: line.unit_price,
                new_price,
            });
            line.unit_price = new_price;
            true
        });
        if let Some(notice) = notice {
            self.notify(notice);
        }
    }

    /// Remove a deactivated combo line unconditionally
    pub fn remove_combo_line(&self, combo_id: &str) {
        self.remove_line(ItemKind::Combo, combo_id);
    }

    /// Remove a deactivated menu line unconditionally
    pub fn remove_menu_line(&self, menu_id: &str) {
        self.remove_line(ItemKind::Menu, menu_id);
    }

    /// Detach the voucher after a server-side eligibility invalidation
    ///
    /// Callers should re-fetch the eligible-voucher list afterwards.
    pub fn clear_voucher_selection(&self) {
        let cleared = self.mutate(|draft| {
            if draft.voucher.is_none() {
                return false;
            }
            draft.voucher = None;
            true
        });
        if cleared {
            self.notify(CartNotice::VoucherCleared);
        }
    }

    fn remove_line(&self, kind: ItemKind, id: &str) {
        let mut notice = None;
        self.mutate(|draft| {
            let Some(pos) = draft
                .items
                .iter()
                .position(|line| line.kind == kind && line.id == id)
            else {
                // Pruning an absent line is a no-op
                return false;
            };
            let line = draft.items.remove(pos);
            notice = Some(match kind {
                ItemKind::Combo => CartNotice::ComboRemoved {
                    combo_id: line.id,
                    name: line.name,
                },
                ItemKind::Menu => CartNotice::MenuItemRemoved {
                    menu_id: line.id,
                    name: line.name,
                },
            });
            true
        });
        if let Some(notice) = notice {
            self.notify(notice);
        }
    }

    /// Single commit funnel: apply the mutation, persist, notify
    ///
    /// A persistence failure degrades durability but does not lose the
    /// in-memory mutation; the next successful commit rewrites the
    /// whole snapshot anyway.
    fn mutate(&self, f: impl FnOnce(&mut OrderDraft) -> bool) -> bool {
        let mut draft = self.draft.lock().unwrap();
        if !f(&mut draft) {
            return false;
        }
        if let Err(e) = self.storage.save_draft(&draft) {
            tracing::error!(error = %e, "Failed to persist draft snapshot");
        }
        let _ = self.draft_tx.send(draft.clone());
        true
    }

    fn notify(&self, notice: CartNotice) {
        if self.notice_tx.send(notice).is_err() {
            tracing::debug!("No subscribers for cart notice");
        }
    }
}
