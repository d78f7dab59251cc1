//! Seat ledger storage trait.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{Booking, BookingId, LedgerKey, SeatNumber, UserId};

/// Error returned by ledger stores for persistence failures.
///
/// Absence of a row is not an error at this layer; lookup methods return
/// `Option`/`bool` and callers decide what a miss means.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt seat list for booking {booking_id}: {reason}")]
    CorruptSeats { booking_id: i64, reason: String },
}

/// A booking about to be committed.
///
/// The store assigns the id and creation time on insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: UserId,
    pub key: LedgerKey,
    pub seats: BTreeSet<SeatNumber>,
}

/// Durable record of live bookings.
///
/// Implementations only persist and retrieve; every decision about whether
/// a booking *may* be written (conflicts, capacity, ownership) belongs to
/// the arbitration layer, which serializes its check-then-write sequences
/// per key before calling in here.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Persist a new booking, assigning its id and creation time.
    async fn insert(&self, new: NewBooking) -> Result<Booking, StorageError>;

    /// Delete a booking. Returns false if no such booking existed.
    async fn remove(&self, id: BookingId) -> Result<bool, StorageError>;

    /// Fetch one booking by id.
    async fn find(&self, id: BookingId) -> Result<Option<Booking>, StorageError>;

    /// All live bookings for one (train, date) key, oldest first.
    async fn bookings_for_key(&self, key: &LedgerKey) -> Result<Vec<Booking>, StorageError>;

    /// All live bookings made by one user, oldest first.
    async fn bookings_for_user(&self, user: UserId) -> Result<Vec<Booking>, StorageError>;
}
