//! End-to-end booking flow tests
//!
//! Wires the cart store, hold manager, table state machine and sync
//! listener together against an in-memory remote and push bus, the way
//! the presentation layer embeds the core.

use async_trait::async_trait;
use lotus_client::api::{CatalogApi, HoldApi, HoldGrant, OrderApi, TableApi, VoucherApi};
use lotus_client::cart::{CartItem, CartStore};
use lotus_client::clock::ManualClock;
use lotus_client::error::{ClientError, ClientResult};
use lotus_client::hold::HoldManager;
use lotus_client::storage::DraftStorage;
use lotus_client::sync::{MemoryChannel, PushChannel, ReconnectSupervisor, SyncListener};
use lotus_client::table::{TableAction, TableStateMachine};
use shared::error::{AppError, ErrorCode};
use shared::message::{Envelope, PushEventKind};
use shared::models::{
    CatalogItem, ItemKind, OrderStatus, OrderSummary, Table, TableStatus, TableUpdate, Voucher,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// In-memory stand-in for the staff console
#[derive(Default)]
struct MockRemote {
    tables: Mutex<HashMap<String, Table>>,
    combos: Mutex<Vec<CatalogItem>>,
    inactive: Mutex<Vec<String>>,
    order_statuses: Mutex<HashMap<String, OrderStatus>>,
    hold_ttl: AtomicI64,
    fail_order_calls: AtomicBool,
    fail_inactive_lookup: AtomicBool,
}

impl MockRemote {
    fn new() -> Arc<Self> {
        let remote = Self {
            hold_ttl: AtomicI64::new(900),
            ..Self::default()
        };
        remote.tables.lock().unwrap().insert(
            "12".to_string(),
            Table {
                id: "12".to_string(),
                code: "T12".to_string(),
                guest_count: 4,
                area_id: "garden".to_string(),
                status: TableStatus::Empty,
            },
        );
        Arc::new(remote)
    }

    fn table_status(&self, id: &str) -> TableStatus {
        self.tables.lock().unwrap()[id].status
    }
}

#[async_trait]
impl TableApi for MockRemote {
    async fn update_table(&self, id: &str, update: TableUpdate) -> ClientResult<Table> {
        let mut tables = self.tables.lock().unwrap();
        let table = tables
            .get_mut(id)
            .ok_or_else(|| ClientError::from(AppError::not_found("Table")))?;
        if let Some(status) = update.status {
            table.status = status;
        }
        if let Some(guest_count) = update.guest_count {
            table.guest_count = guest_count;
        }
        Ok(table.clone())
    }
}

#[async_trait]
impl OrderApi for MockRemote {
    async fn check_in(&self, order_id: &str) -> ClientResult<()> {
        if self.fail_order_calls.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("order service down".to_string()));
        }
        self.order_statuses
            .lock()
            .unwrap()
            .insert(order_id.to_string(), OrderStatus::CheckIn);
        Ok(())
    }

    async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()> {
        if self.fail_order_calls.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("order service down".to_string()));
        }
        self.order_statuses
            .lock()
            .unwrap()
            .insert(order_id.to_string(), status);
        Ok(())
    }

    async fn list_orders(&self) -> ClientResult<Vec<OrderSummary>> {
        Ok(self
            .order_statuses
            .lock()
            .unwrap()
            .iter()
            .map(|(id, status)| OrderSummary {
                id: id.clone(),
                table_id: None,
                status: *status,
                total: 0.0,
                created_at: 0,
            })
            .collect())
    }
}

#[async_trait]
impl HoldApi for MockRemote {
    async fn acquire(&self, _user_id: &str, _table_id: &str) -> ClientResult<HoldGrant> {
        Ok(HoldGrant {
            ttl_seconds: self.hold_ttl.load(Ordering::SeqCst),
        })
    }

    async fn release(&self, _user_id: &str, _table_id: &str) -> ClientResult<()> {
        Ok(())
    }

    async fn ttl(&self, _user_id: &str, _table_id: &str) -> ClientResult<i64> {
        Ok(self.hold_ttl.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl CatalogApi for MockRemote {
    async fn find_inactive(&self, ids: &[String]) -> ClientResult<Vec<String>> {
        if self.fail_inactive_lookup.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("catalog down".to_string()));
        }
        let inactive = self.inactive.lock().unwrap();
        Ok(ids
            .iter()
            .filter(|id| inactive.contains(id))
            .cloned()
            .collect())
    }

    async fn fetch_combos(&self) -> ClientResult<Vec<CatalogItem>> {
        Ok(self.combos.lock().unwrap().clone())
    }
}

#[async_trait]
impl VoucherApi for MockRemote {
    async fn eligible_vouchers(&self) -> ClientResult<Vec<Voucher>> {
        Ok(Vec::new())
    }
}

struct Harness {
    remote: Arc<MockRemote>,
    cart: Arc<CartStore>,
    holds: Arc<HoldManager>,
    listener: Arc<SyncListener>,
}

fn harness() -> Harness {
    let remote = MockRemote::new();
    let storage = Arc::new(DraftStorage::open_in_memory().unwrap());
    let cart = Arc::new(CartStore::new(storage.clone()));
    let holds = Arc::new(HoldManager::new(
        remote.clone(),
        storage,
        ManualClock::new(0),
    ));
    let listener = Arc::new(SyncListener::new(
        cart.clone(),
        holds.clone(),
        remote.clone(),
        remote.clone(),
        remote.clone(),
    ));
    Harness {
        remote,
        cart,
        holds,
        listener,
    }
}

fn pho(quantity: i32) -> CartItem {
    CartItem {
        kind: ItemKind::Menu,
        id: "pho-bo".to_string(),
        name: "Phở".to_string(),
        image: None,
        unit_price: 50_000.0,
        quantity,
    }
}

#[tokio::test]
async fn test_hold_expiry_keeps_order_draft() {
    let h = harness();
    let table = h.remote.tables.lock().unwrap()["12"].clone();

    // Hold table #12 (TTL 900s), then add 2× Phở at 50,000 each
    h.holds.acquire("u-1", &table).await.unwrap();
    h.cart.add_item(pho(2));
    assert_eq!(h.cart.totals().total, 100_000.0);

    // TTL poll later reads 0: hold and table selection go together,
    // the draft contents stay
    h.remote.hold_ttl.store(0, Ordering::SeqCst);
    h.holds.observe_ttl().await.unwrap();

    assert!(h.holds.current().is_none());
    let draft = h.cart.draft();
    assert_eq!(draft.items.len(), 1);
    assert_eq!(draft.items[0].quantity, 2);
    assert_eq!(h.cart.totals().total, 100_000.0);
}

#[tokio::test]
async fn test_check_out_is_two_phase() {
    let h = harness();
    let machine = TableStateMachine::new(h.remote.clone(), h.remote.clone());

    // Bring the table to SERVING via check-in
    let table = h.remote.tables.lock().unwrap()["12"].clone();
    let table = machine
        .apply(&table, TableAction::CheckIn, Some("ord-1"))
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Serving);

    // Order-side failure must leave the table SERVING
    h.remote.fail_order_calls.store(true, Ordering::SeqCst);
    let err = machine
        .apply(&table, TableAction::CheckOut, Some("ord-1"))
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert_eq!(h.remote.table_status("12"), TableStatus::Serving);

    // Caller retries once the order service is back
    h.remote.fail_order_calls.store(false, Ordering::SeqCst);
    let table = machine
        .apply(&table, TableAction::CheckOut, Some("ord-1"))
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Empty);
    assert_eq!(
        h.remote.order_statuses.lock().unwrap()["ord-1"],
        OrderStatus::Success,
        "order reached SUCCESS before the table emptied"
    );
}

#[tokio::test]
async fn test_invalid_transition_leaves_table_unchanged() {
    let h = harness();
    let machine = TableStateMachine::new(h.remote.clone(), h.remote.clone());
    let table = h.remote.tables.lock().unwrap()["12"].clone();

    let err = machine
        .apply(&table, TableAction::CheckOut, Some("ord-1"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidTransition));
    assert_eq!(h.remote.table_status("12"), TableStatus::Empty);

    // Missing order reference is rejected before any remote call
    let err = machine
        .apply(&table, TableAction::CheckIn, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::InvalidRequest));
    assert_eq!(h.remote.table_status("12"), TableStatus::Empty);
}

#[tokio::test]
async fn test_eligibility_gate_blocks_and_prunes() {
    let h = harness();
    h.cart.add_item(pho(1));
    h.cart.add_item(CartItem {
        kind: ItemKind::Menu,
        id: "discontinued".to_string(),
        name: "Bún chả".to_string(),
        image: None,
        unit_price: 45_000.0,
        quantity: 1,
    });

    // Remote failure blocks the gate outright
    h.remote.fail_inactive_lookup.store(true, Ordering::SeqCst);
    assert!(
        h.cart
            .validate_eligibility(h.remote.as_ref())
            .await
            .is_err()
    );

    // Staleness comes back as a value the caller must prune
    h.remote.fail_inactive_lookup.store(false, Ordering::SeqCst);
    *h.remote.inactive.lock().unwrap() = vec!["discontinued".to_string()];
    let stale = h
        .cart
        .validate_eligibility(h.remote.as_ref())
        .await
        .unwrap();
    assert_eq!(stale, vec!["discontinued".to_string()]);

    h.cart.prune_ids(&stale);
    let draft = h.cart.draft();
    assert_eq!(draft.items.len(), 1);
    assert!(!draft.is_empty(), "flow may proceed with the remaining line");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_push_events_reconcile_over_live_channel() {
    let h = harness();
    let clock = ManualClock::new(0);
    let supervisor = Arc::new(ReconnectSupervisor::new(
        h.listener.clone(),
        clock,
        std::time::Duration::from_secs(5),
    ));
    let (bus, _) = broadcast::channel(16);

    // Combo #7 in the draft at quantity 2; the server deactivates it
    h.cart.add_item(CartItem {
        kind: ItemKind::Combo,
        id: "7".to_string(),
        name: "Combo 7".to_string(),
        image: None,
        unit_price: 150_000.0,
        quantity: 2,
    });
    h.cart.add_item(pho(1));
    *h.remote.combos.lock().unwrap() = vec![CatalogItem {
        id: "7".to_string(),
        name: "Combo 7".to_string(),
        price: 150_000.0,
        image: None,
        active: false,
    }];

    let connect_bus = bus.clone();
    let run = {
        let supervisor = supervisor.clone();
        tokio::spawn(async move {
            supervisor
                .run(Box::new(move || {
                    let bus = connect_bus.clone();
                    Box::pin(async move {
                        Ok::<_, ClientError>(
                            Box::new(MemoryChannel::new(&bus)) as Box<dyn PushChannel>
                        )
                    })
                }))
                .await
        })
    };

    bus.send(Envelope::signal(PushEventKind::ComboUpdate)).unwrap();

    // Either the reconnect re-sync or the event itself prunes the line
    while h.cart.draft().items.len() != 1 {
        tokio::task::yield_now().await;
    }
    let draft = h.cart.draft();
    assert_eq!(draft.items[0].id, "pho-bo");
    assert_eq!(h.cart.totals().total, 50_000.0);

    run.abort();
}
