//! Injectable clock
//!
//! TTL polling and reconnect backoff depend on wall time; routing both
//! through this trait lets the tests drive time without real timers.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Time source used by the hold poller and reconnect supervisor
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current wall-clock time as Unix millis
    fn now_millis(&self) -> i64;

    /// Sleep for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Production clock backed by the system time and tokio timers
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Manually advanced clock for tests
///
/// `sleep` resolves once `advance` has moved the clock past the
/// deadline, so test code controls exactly when timers fire.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
    notify: tokio::sync::Notify,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(start_millis),
            notify: tokio::sync::Notify::new(),
        })
    }

    /// Move the clock forward and wake all pending sleepers
    pub fn advance(&self, duration: Duration) {
        self.now
            .fetch_add(duration.as_millis() as i64, Ordering::SeqCst);
        self.notify.notify_waiters();
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }

    async fn sleep(&self, duration: Duration) {
        let deadline = self.now_millis() + duration.as_millis() as i64;
        loop {
            // Register interest before re-checking, otherwise an
            // advance between the check and the await is lost.
            let notified = self.notify.notified();
            if self.now_millis() >= deadline {
                break;
            }
            notified.await;
        }
    }
}
