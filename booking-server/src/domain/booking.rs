//! Booking records and the ledger key.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use super::ids::{BookingId, TrainId, UserId};
use super::seat::SeatNumber;

/// The unit of seat inventory: one train on one travel date.
///
/// All booked seats, all conflict checks and all write serialization are
/// scoped to a single key. Bookings under different keys never interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedgerKey {
    pub train_id: TrainId,
    pub travel_date: NaiveDate,
}

impl LedgerKey {
    pub fn new(train_id: TrainId, travel_date: NaiveDate) -> Self {
        LedgerKey {
            train_id,
            travel_date,
        }
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "train {} on {}", self.train_id, self.travel_date)
    }
}

/// A committed booking.
///
/// One user holds one or more seats on one ledger key. The seat set is
/// non-empty for any booking that went through arbitration; rows read back
/// from storage are trusted to satisfy the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub train_id: TrainId,
    pub travel_date: NaiveDate,
    pub seats: BTreeSet<SeatNumber>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn key(&self) -> LedgerKey {
        LedgerKey::new(self.train_id, self.travel_date)
    }
}
