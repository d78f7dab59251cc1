//! In-memory seat ledger.
//!
//! Backs tests and secret-free dev setups. Same contract as the SQLite
//! store, nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{Booking, BookingId, LedgerKey, UserId};

use super::store::{LedgerStore, NewBooking, StorageError};

struct Inner {
    next_id: i64,
    bookings: BTreeMap<BookingId, Booking>,
}

/// Ledger store holding everything in process memory.
pub struct MemoryLedger {
    inner: RwLock<Inner>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger {
            inner: RwLock::new(Inner {
                next_id: 1,
                bookings: BTreeMap::new(),
            }),
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn insert(&self, new: NewBooking) -> Result<Booking, StorageError> {
        let mut inner = self.inner.write().await;
        let id = BookingId::new(inner.next_id);
        inner.next_id += 1;

        let booking = Booking {
            id,
            user_id: new.user_id,
            train_id: new.key.train_id,
            travel_date: new.key.travel_date,
            seats: new.seats,
            created_at: Utc::now(),
        };
        inner.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn remove(&self, id: BookingId) -> Result<bool, StorageError> {
        let mut inner = self.inner.write().await;
        Ok(inner.bookings.remove(&id).is_some())
    }

    async fn find(&self, id: BookingId) -> Result<Option<Booking>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.bookings.get(&id).cloned())
    }

    async fn bookings_for_key(&self, key: &LedgerKey) -> Result<Vec<Booking>, StorageError> {
        let inner = self.inner.read().await;
        // BTreeMap iteration is id order, i.e. insertion order
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.key() == *key)
            .cloned()
            .collect())
    }

    async fn bookings_for_user(&self, user: UserId) -> Result<Vec<Booking>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.user_id == user)
            .cloned()
            .collect())
    }
}
