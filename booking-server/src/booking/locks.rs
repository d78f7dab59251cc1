//! Per-key critical sections.
//!
//! All mutations of one (train, date) ledger key happen inside that key's
//! critical section, so check-then-act sequences on the same key are
//! totally ordered. Distinct keys use distinct locks and never contend.
//! Acquisition is bounded: a request that cannot enter its critical
//! section within the allowed wait fails instead of queueing forever.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tokio::sync::OwnedMutexGuard;

use crate::domain::LedgerKey;

/// Sweep the registry once it holds more entries than this. Idle entries
/// are dropped; anything held or awaited survives a sweep.
const SWEEP_THRESHOLD: usize = 1024;

/// Error returned when a critical section could not be entered in time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("timed out waiting for the key's critical section")]
pub struct KeyLockTimeout;

/// Holds one key's critical section until dropped.
pub struct KeyGuard {
    _permit: OwnedMutexGuard<()>,
}

/// Registry of per-key async locks.
///
/// Keys are created on first use. The registry itself is guarded by a
/// plain mutex held only for map lookups, never across an await.
pub struct KeyLocks {
    locks: Mutex<HashMap<LedgerKey, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        KeyLocks {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Enter the critical section for `key`, waiting at most `max_wait`.
    pub async fn acquire(
        &self,
        key: LedgerKey,
        max_wait: Duration,
    ) -> Result<KeyGuard, KeyLockTimeout> {
        let lock = {
            let mut locks = self.locks.lock();
            let lock = locks
                .entry(key)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone();
            if locks.len() > SWEEP_THRESHOLD {
                // An OwnedMutexGuard and every waiter keep their Arc alive,
                // so strong_count == 1 means nobody is using the entry.
                locks.retain(|_, l| Arc::strong_count(l) > 1);
            }
            lock
        };

        let permit = tokio::time::timeout(max_wait, lock.lock_owned())
            .await
            .map_err(|_| KeyLockTimeout)?;

        Ok(KeyGuard { _permit: permit })
    }

    #[cfg(test)]
    fn registered(&self) -> usize {
        self.locks.lock().len()
    }
}

impl Default for KeyLocks {
    fn default() -> Self {
        Self::new()
    }
}
