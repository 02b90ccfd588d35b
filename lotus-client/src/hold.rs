//! Table hold manager
//!
//! A hold is a time-bounded, per-user exclusive claim on a table during
//! the booking flow, distinct from final occupancy. The manager keeps
//! the hold and the selected-table reference in a single state cell so
//! the two can never diverge: whatever clears one clears both, in one
//! step.
//!
//! Expiry is learned two ways — the recurring server-authoritative TTL
//! poll and the `table_hold_expired` push event — and both converge on
//! the same idempotent clear.

use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::Table;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use crate::api::HoldApi;
use crate::clock::Clock;
use crate::error::ClientResult;
use crate::storage::DraftStorage;

/// Active hold, keyed by (user, table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hold {
    pub user_id: String,
    pub table_id: String,
    /// Unix millis at grant time
    pub acquired_at: i64,
    /// Server-authoritative TTL at grant time; the poll refreshes the
    /// remaining time, this field never changes
    pub ttl_seconds: i64,
}

/// The hold together with the table it reserves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldSelection {
    pub hold: Hold,
    pub table: Table,
}

/// Manages acquisition, observation and release of the table hold
pub struct HoldManager {
    api: Arc<dyn HoldApi>,
    storage: Arc<DraftStorage>,
    clock: Arc<dyn Clock>,
    state: Mutex<Option<HeldSelection>>,
    state_tx: watch::Sender<Option<HeldSelection>>,
}

impl HoldManager {
    /// Create a manager, restoring any persisted hold snapshot
    ///
    /// A restored hold may already be stale; the first TTL observation
    /// after start clears it if the server says so.
    pub fn new(api: Arc<dyn HoldApi>, storage: Arc<DraftStorage>, clock: Arc<dyn Clock>) -> Self {
        let state = match storage.load_hold() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Failed to restore hold snapshot, starting empty");
                None
            }
        };
        let (state_tx, _) = watch::channel(state.clone());
        Self {
            api,
            storage,
            clock,
            state: Mutex::new(state),
            state_tx,
        }
    }

    /// Current hold + selection, if any
    pub fn current(&self) -> Option<HeldSelection> {
        self.state.lock().unwrap().clone()
    }

    /// Subscribe to hold/selection changes
    pub fn subscribe(&self) -> watch::Receiver<Option<HeldSelection>> {
        self.state_tx.subscribe()
    }

    /// Acquire a server-side exclusive hold on a table
    ///
    /// There is no optimistic local grant: nothing changes until the
    /// remote call returns success. Contention losers receive a
    /// `HoldRejected` domain error and local state stays untouched.
    pub async fn acquire(&self, user_id: &str, table: &Table) -> ClientResult<Hold> {
        if let Some(current) = self.current() {
            if current.hold.table_id != table.id {
                return Err(AppError::invalid_request(format!(
                    "Table {} is already held; release it before holding another",
                    current.table.code
                ))
                .into());
            }
        }

        let grant = self.api.acquire(user_id, &table.id).await?;
        let hold = Hold {
            user_id: user_id.to_string(),
            table_id: table.id.clone(),
            acquired_at: self.clock.now_millis(),
            ttl_seconds: grant.ttl_seconds,
        };
        let selection = HeldSelection {
            hold: hold.clone(),
            table: table.clone(),
        };

        {
            let mut state = self.state.lock().unwrap();
            *state = Some(selection.clone());
        }
        if let Err(e) = self.storage.save_hold(&selection) {
            tracing::error!(error = %e, "Failed to persist hold snapshot");
        }
        let _ = self.state_tx.send(Some(selection));
        tracing::info!(
            table_id = %table.id,
            ttl_seconds = grant.ttl_seconds,
            "Table hold acquired"
        );
        Ok(hold)
    }

    /// One server-authoritative TTL observation
    ///
    /// Returns the remaining seconds, or `None` when no hold is active.
    /// A reading ≤ 0 clears the hold and selection atomically. A
    /// transport failure is transient and clears nothing; only an
    /// explicit zero-or-below reading or an expiry event does.
    pub async fn observe_ttl(&self) -> ClientResult<Option<i64>> {
        let Some(selection) = self.current() else {
            return Ok(None);
        };
        let remaining = self
            .api
            .ttl(&selection.hold.user_id, &selection.hold.table_id)
            .await?;
        if remaining <= 0 {
            tracing::info!(table_id = %selection.hold.table_id, "Hold TTL reached zero");
            self.clear();
        }
        Ok(Some(remaining))
    }

    /// Push-notified expiry; converges on the same clear as the poll
    pub fn on_expiry_event(&self) {
        self.clear();
    }

    /// Explicit release on booking completion or user cancellation
    ///
    /// The remote release is best-effort: the server reclaims the hold
    /// at TTL anyway, so local state clears regardless.
    pub async fn release(&self) -> ClientResult<()> {
        let Some(selection) = self.current() else {
            return Ok(());
        };
        if let Err(e) = self
            .api
            .release(&selection.hold.user_id, &selection.hold.table_id)
            .await
        {
            tracing::warn!(
                table_id = %selection.hold.table_id,
                error = %e,
                "Remote hold release failed; clearing locally"
            );
        }
        self.clear();
        Ok(())
    }

    /// Recurring TTL poll loop; spawn and abort alongside the session
    ///
    /// Transport failures are logged and skipped — the next tick
    /// retries. Runs until the task is dropped.
    pub async fn run_ttl_poll(self: Arc<Self>, interval: Duration) {
        loop {
            self.clock.sleep(interval).await;
            match self.observe_ttl().await {
                Ok(Some(remaining)) => {
                    tracing::debug!(remaining_seconds = remaining, "Hold TTL observed");
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "Hold TTL poll failed, will retry");
                }
            }
        }
    }

    /// Idempotent clear of hold + selection together
    fn clear(&self) {
        let cleared = {
            let mut state = self.state.lock().unwrap();
            state.take()
        };
        let Some(selection) = cleared else {
            // Already cleared; expiry paths may race each other
            return;
        };
        if let Err(e) = self.storage.clear_hold() {
            tracing::error!(error = %e, "Failed to clear hold snapshot");
        }
        let _ = self.state_tx.send(None);
        tracing::info!(table_id = %selection.hold.table_id, "Hold and table selection cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HoldGrant;
    use crate::clock::ManualClock;
    use async_trait::async_trait;
    use shared::error::ErrorCode;
    use shared::models::TableStatus;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct FakeHoldApi {
        grant_ttl: i64,
        reject: bool,
        remaining: AtomicI64,
        fail_ttl: std::sync::atomic::AtomicBool,
    }

    impl FakeHoldApi {
        fn new(grant_ttl: i64) -> Self {
            Self {
                grant_ttl,
                reject: false,
                remaining: AtomicI64::new(grant_ttl),
                fail_ttl: std::sync::atomic::AtomicBool::new(false),
            }
        }

        fn rejecting() -> Self {
            Self {
                reject: true,
                ..Self::new(0)
            }
        }
    }

    #[async_trait]
    impl HoldApi for FakeHoldApi {
        async fn acquire(&self, _user_id: &str, table_id: &str) -> ClientResult<HoldGrant> {
            if self.reject {
                return Err(AppError::hold_rejected(table_id).into());
            }
            Ok(HoldGrant {
                ttl_seconds: self.grant_ttl,
            })
        }

        async fn release(&self, _user_id: &str, _table_id: &str) -> ClientResult<()> {
            Ok(())
        }

        async fn ttl(&self, _user_id: &str, _table_id: &str) -> ClientResult<i64> {
            if self.fail_ttl.load(Ordering::SeqCst) {
                return Err(crate::error::ClientError::Transport(
                    "connection reset".to_string(),
                ));
            }
            Ok(self.remaining.load(Ordering::SeqCst))
        }
    }

    fn table(id: &str) -> Table {
        Table {
            id: id.to_string(),
            code: format!("T{}", id),
            guest_count: 4,
            area_id: "main".to_string(),
            status: TableStatus::Empty,
        }
    }

    fn manager(api: Arc<FakeHoldApi>) -> HoldManager {
        HoldManager::new(
            api,
            Arc::new(DraftStorage::open_in_memory().unwrap()),
            ManualClock::new(0),
        )
    }

    #[tokio::test]
    async fn test_acquire_then_expiry_clears_selection() {
        let api = Arc::new(FakeHoldApi::new(900));
        let holds = manager(api.clone());

        holds.acquire("u-1", &table("12")).await.unwrap();
        assert!(holds.current().is_some());

        api.remaining.store(0, Ordering::SeqCst);
        let remaining = holds.observe_ttl().await.unwrap();
        assert_eq!(remaining, Some(0));
        assert!(holds.current().is_none(), "hold and selection cleared together");
    }

    #[tokio::test]
    async fn test_rejection_leaves_state_untouched() {
        let holds = manager(Arc::new(FakeHoldApi::rejecting()));
        let err = holds.acquire("u-1", &table("12")).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::HoldRejected));
        assert!(holds.current().is_none());
    }

    #[tokio::test]
    async fn test_poll_failure_is_transient() {
        let api = Arc::new(FakeHoldApi::new(900));
        let holds = manager(api.clone());
        holds.acquire("u-1", &table("12")).await.unwrap();

        api.fail_ttl.store(true, Ordering::SeqCst);
        assert!(holds.observe_ttl().await.is_err());
        assert!(
            holds.current().is_some(),
            "transport failure must not clear the hold"
        );
    }

    #[tokio::test]
    async fn test_event_and_poll_paths_converge() {
        let api = Arc::new(FakeHoldApi::new(900));
        let holds = manager(api.clone());
        holds.acquire("u-1", &table("12")).await.unwrap();

        // Push event first, then a zero TTL reading for the same hold
        holds.on_expiry_event();
        assert!(holds.current().is_none());

        // Clearing an already-cleared hold is a no-op, not an error
        holds.on_expiry_event();
        api.remaining.store(0, Ordering::SeqCst);
        assert_eq!(holds.observe_ttl().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_second_table_requires_release() {
        let api = Arc::new(FakeHoldApi::new(900));
        let holds = manager(api);
        holds.acquire("u-1", &table("12")).await.unwrap();

        let err = holds.acquire("u-1", &table("13")).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::InvalidRequest));

        holds.release().await.unwrap();
        holds.acquire("u-1", &table("13")).await.unwrap();
        assert_eq!(holds.current().unwrap().hold.table_id, "13");
    }

    #[tokio::test]
    async fn test_poll_loop_clears_on_zero_reading() {
        let api = Arc::new(FakeHoldApi::new(900));
        let clock = ManualClock::new(0);
        let holds = Arc::new(HoldManager::new(
            api.clone(),
            Arc::new(DraftStorage::open_in_memory().unwrap()),
            clock.clone(),
        ));
        holds.acquire("u-1", &table("12")).await.unwrap();

        let poll = tokio::spawn(holds.clone().run_ttl_poll(Duration::from_secs(15)));

        api.remaining.store(0, Ordering::SeqCst);
        let ticker = {
            let clock = clock.clone();
            tokio::spawn(async move {
                loop {
                    tokio::task::yield_now().await;
                    clock.advance(Duration::from_secs(15));
                }
            })
        };
        while holds.current().is_some() {
            tokio::task::yield_now().await;
        }
        poll.abort();
        ticker.abort();
    }

    #[tokio::test]
    async fn test_hold_restored_from_storage() {
        let storage = Arc::new(DraftStorage::open_in_memory().unwrap());
        let api = Arc::new(FakeHoldApi::new(900));
        {
            let holds = HoldManager::new(api.clone(), storage.clone(), ManualClock::new(0));
            holds.acquire("u-1", &table("12")).await.unwrap();
        }
        let holds = HoldManager::new(api, storage, ManualClock::new(0));
        assert_eq!(holds.current().unwrap().hold.table_id, "12");
    }
}
