//! Remote collaborator interfaces
//!
//! The booking core never talks to the network directly; everything
//! remote goes through these traits. [`crate::http::HttpApi`]
//! implements all of them against the console's REST surface, and the
//! tests supply in-memory fakes.
//!
//! All calls are plain request/response. There is no in-flight
//! cancellation protocol; a caller abandons a call by dropping the
//! future and ignoring its result.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{CatalogItem, OrderStatus, OrderSummary, Table, TableUpdate, Voucher};

use crate::error::ClientResult;

/// Successful hold acquisition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldGrant {
    /// Server-authoritative TTL at grant time
    pub ttl_seconds: i64,
}

/// Remote table mutation
#[async_trait]
pub trait TableApi: Send + Sync {
    /// Patch a table; returns the updated entity
    async fn update_table(&self, id: &str, update: TableUpdate) -> ClientResult<Table>;
}

/// Remote order operations
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Check an order in (guest arrived)
    async fn check_in(&self, order_id: &str) -> ClientResult<()>;

    /// Drive an order to the given status
    async fn set_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<()>;

    /// Authoritative order list for the current user
    async fn list_orders(&self) -> ClientResult<Vec<OrderSummary>>;
}

/// Remote table-hold arbitration
///
/// Contention between users is resolved server-side: exactly one
/// acquirer wins, losers get a `HoldRejected` domain error rather than
/// a silently-overwritten hold.
#[async_trait]
pub trait HoldApi: Send + Sync {
    /// Request an exclusive hold on a table
    async fn acquire(&self, user_id: &str, table_id: &str) -> ClientResult<HoldGrant>;

    /// Release a previously acquired hold
    async fn release(&self, user_id: &str, table_id: &str) -> ClientResult<()>;

    /// Server-reported remaining TTL in seconds for the caller's hold
    async fn ttl(&self, user_id: &str, table_id: &str) -> ClientResult<i64>;
}

/// Remote catalog queries
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Of the given ids, which are no longer purchasable
    async fn find_inactive(&self, ids: &[String]) -> ClientResult<Vec<String>>;

    /// Current combo catalog (active flag included)
    async fn fetch_combos(&self) -> ClientResult<Vec<CatalogItem>>;
}

/// Remote voucher eligibility
#[async_trait]
pub trait VoucherApi: Send + Sync {
    /// Vouchers currently eligible for this user/order
    async fn eligible_vouchers(&self) -> ClientResult<Vec<Voucher>>;
}
