//! Cached reads of booked-seat sets.
//!
//! Every booking attempt re-reads the booked set for its key, and every
//! search row is annotated with one, so the same sets are fetched over and
//! over between writes. The cache sits in front of the store under one
//! discipline: entries are written only by callers inside the key's
//! critical section. Writers fold their change into the entry before the
//! section is released, and the arbitration read fills it on a miss.
//! Read-only callers serve a live entry but fall through to the store on a
//! miss without filling: a fill from outside the section can land after a
//! writer's refresh and pin the pre-write set.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Booking, BookingId, LedgerKey, SeatNumber, UserId};

use super::store::{LedgerStore, NewBooking, StorageError};

/// Configuration for the booked-set cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries. A backstop only; writes refresh eagerly.
    pub ttl: Duration,

    /// Maximum number of cached (train, date) entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 10_000,
        }
    }
}

/// Ledger store wrapper that caches booked-seat sets per key.
pub struct CachedLedger {
    store: Arc<dyn LedgerStore>,
    booked: MokaCache<LedgerKey, Arc<BTreeSet<SeatNumber>>>,
}

impl CachedLedger {
    /// Wrap a store with a cache of the given configuration.
    pub fn new(store: Arc<dyn LedgerStore>, config: &CacheConfig) -> Self {
        let booked = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { store, booked }
    }

    /// The union of all booked seats for a key, for read-only callers.
    ///
    /// Serves the cached entry when one is live; on a miss the set is read
    /// from the store and returned without being cached. Safe to call from
    /// outside the key's critical section.
    pub async fn booked_seats(
        &self,
        key: &LedgerKey,
    ) -> Result<Arc<BTreeSet<SeatNumber>>, StorageError> {
        if let Some(cached) = self.booked.get(key).await {
            return Ok(cached);
        }

        Ok(Arc::new(self.load_booked(key).await?))
    }

    /// The union of all booked seats for a key, caching it for later reads.
    ///
    /// The caller must hold the key's critical section: the fill stays
    /// ordered against `insert`/`remove` refreshes only under that lock.
    pub async fn booked_seats_for_update(
        &self,
        key: &LedgerKey,
    ) -> Result<Arc<BTreeSet<SeatNumber>>, StorageError> {
        if let Some(cached) = self.booked.get(key).await {
            return Ok(cached);
        }

        let entry = Arc::new(self.load_booked(key).await?);
        self.booked.insert(*key, entry.clone()).await;
        Ok(entry)
    }

    /// Persist a booking and fold its seats into the cached set for its
    /// key, if one is live. The caller must hold the key's critical
    /// section.
    pub async fn insert(&self, new: NewBooking) -> Result<Booking, StorageError> {
        let key = new.key;
        let booking = self.store.insert(new).await?;

        if let Some(prev) = self.booked.get(&key).await {
            let next: BTreeSet<SeatNumber> =
                prev.union(&booking.seats).copied().collect();
            self.booked.insert(key, Arc::new(next)).await;
        }

        Ok(booking)
    }

    /// Delete a booking and subtract its seats from the cached set for its
    /// key, if one is live. Returns false if the booking was already gone.
    /// The caller must hold the key's critical section.
    pub async fn remove(&self, booking: &Booking) -> Result<bool, StorageError> {
        let removed = self.store.remove(booking.id).await?;
        if removed {
            let key = booking.key();
            if let Some(prev) = self.booked.get(&key).await {
                let next: BTreeSet<SeatNumber> =
                    prev.difference(&booking.seats).copied().collect();
                self.booked.insert(key, Arc::new(next)).await;
            }
        }
        Ok(removed)
    }

    /// Fetch one booking by id. Uncached.
    pub async fn find(&self, id: BookingId) -> Result<Option<Booking>, StorageError> {
        self.store.find(id).await
    }

    /// All live bookings for one user. Uncached; listings are rare
    /// compared to availability reads.
    pub async fn bookings_for_user(&self, user: UserId) -> Result<Vec<Booking>, StorageError> {
        self.store.bookings_for_user(user).await
    }

    /// Number of cached key entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.booked.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.booked.invalidate_all();
    }

    async fn load_booked(&self, key: &LedgerKey) -> Result<BTreeSet<SeatNumber>, StorageError> {
        let bookings = self.store.bookings_for_key(key).await?;
        let mut set = BTreeSet::new();
        for booking in &bookings {
            set.extend(booking.seats.iter().copied());
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrainId;
    use crate::ledger::MemoryLedger;
    use chrono::NaiveDate;

    fn key(train: i64, day: u32) -> LedgerKey {
        LedgerKey::new(
            TrainId::new(train),
            NaiveDate::from_ymd_opt(2026, 6, day).unwrap(),
        )
    }

    fn seats(numbers: &[u32]) -> BTreeSet<SeatNumber> {
        numbers
            .iter()
            .map(|&n| SeatNumber::new(n).unwrap())
            .collect()
    }

    fn cached() -> CachedLedger {
        CachedLedger::new(Arc::new(MemoryLedger::new()), &CacheConfig::default())
    }

    #[tokio::test]
    async fn booked_set_is_the_union_across_bookings() {
        let ledger = cached();
        for s in [seats(&[1, 2]), seats(&[5])] {
            ledger
                .insert(NewBooking {
                    user_id: UserId::new(1),
                    key: key(1, 1),
                    seats: s,
                })
                .await
                .unwrap();
        }

        let booked = ledger.booked_seats(&key(1, 1)).await.unwrap();
        assert_eq!(*booked, seats(&[1, 2, 5]));
    }

    #[tokio::test]
    async fn read_misses_do_not_fill_the_cache() {
        let ledger = cached();

        // Two cold reads load independently: no entry was created
        let first = ledger.booked_seats(&key(1, 1)).await.unwrap();
        let second = ledger.booked_seats(&key(1, 1)).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        // The write-path read fills, and later reads serve that entry
        let filled = ledger.booked_seats_for_update(&key(1, 1)).await.unwrap();
        let served = ledger.booked_seats(&key(1, 1)).await.unwrap();
        assert!(Arc::ptr_eq(&filled, &served));
    }

    #[tokio::test]
    async fn insert_folds_into_a_live_entry() {
        let ledger = cached();

        let before = ledger.booked_seats_for_update(&key(1, 1)).await.unwrap();
        assert!(before.is_empty());

        ledger
            .insert(NewBooking {
                user_id: UserId::new(1),
                key: key(1, 1),
                seats: seats(&[3]),
            })
            .await
            .unwrap();

        let after = ledger.booked_seats(&key(1, 1)).await.unwrap();
        assert_eq!(*after, seats(&[3]));

        // Still served from the cache, not re-read per call
        let again = ledger.booked_seats(&key(1, 1)).await.unwrap();
        assert!(Arc::ptr_eq(&after, &again));
    }

    #[tokio::test]
    async fn remove_subtracts_from_a_live_entry() {
        let ledger = cached();
        let booking = ledger
            .insert(NewBooking {
                user_id: UserId::new(1),
                key: key(1, 1),
                seats: seats(&[3, 4]),
            })
            .await
            .unwrap();

        let warmed = ledger.booked_seats_for_update(&key(1, 1)).await.unwrap();
        assert_eq!(*warmed, seats(&[3, 4]));

        assert!(ledger.remove(&booking).await.unwrap());
        assert!(ledger.booked_seats(&key(1, 1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn write_without_a_live_entry_leaves_the_cache_cold() {
        let ledger = cached();
        ledger
            .insert(NewBooking {
                user_id: UserId::new(1),
                key: key(1, 1),
                seats: seats(&[7]),
            })
            .await
            .unwrap();

        // Reads are correct but load from the store each time
        let first = ledger.booked_seats(&key(1, 1)).await.unwrap();
        let second = ledger.booked_seats(&key(1, 1)).await.unwrap();
        assert_eq!(*first, seats(&[7]));
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn other_keys_stay_cached_across_writes() {
        let ledger = cached();

        ledger
            .insert(NewBooking {
                user_id: UserId::new(1),
                key: key(1, 1),
                seats: seats(&[1]),
            })
            .await
            .unwrap();

        // Warm both keys, then write to the second only
        let day_one = ledger.booked_seats_for_update(&key(1, 1)).await.unwrap();
        let _ = ledger.booked_seats_for_update(&key(1, 2)).await.unwrap();
        ledger
            .insert(NewBooking {
                user_id: UserId::new(1),
                key: key(1, 2),
                seats: seats(&[9]),
            })
            .await
            .unwrap();

        // The day-one read is served from cache: same Arc
        let day_one_again = ledger.booked_seats(&key(1, 1)).await.unwrap();
        assert!(Arc::ptr_eq(&day_one, &day_one_again));

        let day_two = ledger.booked_seats(&key(1, 2)).await.unwrap();
        assert_eq!(*day_two, seats(&[9]));
    }
}
