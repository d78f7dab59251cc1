//! Booking arbitration.
//!
//! Every booking attempt ends in exactly one of two outcomes: committed
//! (its seats were all free at the moment of decision) or rejected (with
//! the reason and the offending seats). The decision itself — snapshot the
//! booked set, test the request against it, commit — runs inside the
//! request's key critical section, so no two writers interleave on the
//! same train and date. Validation that needs no ledger state happens
//! before the lock is taken.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::availability::{self, SeatMap};
use crate::catalog::Catalog;
use crate::domain::{Booking, BookingId, LedgerKey, SeatNumber, Train, TrainId, UserId};
use crate::ledger::{CachedLedger, NewBooking, StorageError};

use super::locks::KeyLocks;

/// Why a booking attempt or cancellation failed.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("train {train_id} not found")]
    TrainNotFound { train_id: TrainId },

    #[error("booking {booking_id} not found")]
    BookingNotFound { booking_id: BookingId },

    #[error("at least one seat must be selected")]
    NoSeatsSelected,

    #[error("invalid seat numbers: {} (train has {total_seats} seats)", fmt_seats(.seats))]
    SeatsOutOfRange {
        seats: Vec<SeatNumber>,
        total_seats: u32,
    },

    #[error("seats {} are already booked", fmt_seats(.seats))]
    SeatsUnavailable { seats: Vec<SeatNumber> },

    #[error("booking {booking_id} belongs to another user")]
    NotBookingOwner { booking_id: BookingId },

    #[error("too many concurrent requests for {key}; try again")]
    LedgerBusy { key: LedgerKey },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn fmt_seats<'a>(seats: impl IntoIterator<Item = &'a SeatNumber>) -> String {
    let mut out = String::new();
    for (i, seat) in seats.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&seat.to_string());
    }
    out
}

/// A booking request as the arbiter receives it.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user_id: UserId,
    pub train_id: TrainId,
    pub travel_date: NaiveDate,
    pub seats: BTreeSet<SeatNumber>,
}

/// A committed booking, joined with its train.
#[derive(Debug, Clone)]
pub struct CommittedBooking {
    pub booking: Booking,
    pub train: Train,
}

/// A booking in a user's listing. The train join is optional: the catalog
/// may no longer carry the train an old booking was made on.
#[derive(Debug, Clone)]
pub struct UserBooking {
    pub booking: Booking,
    pub train: Option<Train>,
}

/// Configuration for the arbiter.
#[derive(Debug, Clone)]
pub struct ArbiterConfig {
    /// Longest a request waits for its key's critical section before
    /// failing as busy.
    pub max_key_wait: Duration,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            max_key_wait: Duration::from_secs(5),
        }
    }
}

impl ArbiterConfig {
    /// Set the maximum critical-section wait.
    pub fn with_max_key_wait(mut self, max_key_wait: Duration) -> Self {
        self.max_key_wait = max_key_wait;
        self
    }
}

/// Decides the outcome of every booking attempt and cancellation.
pub struct BookingArbiter {
    catalog: Arc<Catalog>,
    ledger: Arc<CachedLedger>,
    locks: KeyLocks,
    config: ArbiterConfig,
}

impl BookingArbiter {
    pub fn new(catalog: Arc<Catalog>, ledger: Arc<CachedLedger>, config: ArbiterConfig) -> Self {
        Self {
            catalog,
            ledger,
            locks: KeyLocks::new(),
            config,
        }
    }

    /// Attempt to book seats.
    ///
    /// Checks run in a fixed order: the train must exist, the seat set
    /// must be non-empty, every seat must exist on the train, and then —
    /// inside the key's critical section — every seat must still be free.
    /// A conflict rejection names exactly the requested seats that were
    /// already taken.
    pub async fn create_booking(
        &self,
        request: BookingRequest,
    ) -> Result<CommittedBooking, BookingError> {
        let train = self
            .catalog
            .train(request.train_id)
            .ok_or(BookingError::TrainNotFound {
                train_id: request.train_id,
            })?
            .clone();

        if request.seats.is_empty() {
            return Err(BookingError::NoSeatsSelected);
        }

        let out_of_range: Vec<SeatNumber> = request
            .seats
            .iter()
            .copied()
            .filter(|s| !train.seat_in_range(*s))
            .collect();
        if !out_of_range.is_empty() {
            return Err(BookingError::SeatsOutOfRange {
                seats: out_of_range,
                total_seats: train.total_seats,
            });
        }

        let key = LedgerKey::new(request.train_id, request.travel_date);
        let _section = self
            .locks
            .acquire(key, self.config.max_key_wait)
            .await
            .map_err(|_| BookingError::LedgerBusy { key })?;

        let booked = self.ledger.booked_seats_for_update(&key).await?;
        let conflict: Vec<SeatNumber> = request.seats.intersection(&booked).copied().collect();
        if !conflict.is_empty() {
            debug!(%key, seats = %fmt_seats(&conflict), "booking rejected: seats taken");
            return Err(BookingError::SeatsUnavailable { seats: conflict });
        }

        let booking = self
            .ledger
            .insert(NewBooking {
                user_id: request.user_id,
                key,
                seats: request.seats,
            })
            .await?;

        info!(booking_id = %booking.id, %key, seats = %fmt_seats(&booking.seats), "booking committed");
        Ok(CommittedBooking { booking, train })
    }

    /// Cancel a booking, freeing its seats for later requests.
    ///
    /// Only the booking's owner may cancel it. The removal itself runs in
    /// the booking key's critical section, so it is ordered against every
    /// booking attempt on the same train and date; losing a cancel race
    /// surfaces as the booking already being gone.
    pub async fn cancel_booking(
        &self,
        booking_id: BookingId,
        requester: UserId,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .ledger
            .find(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound { booking_id })?;

        if booking.user_id != requester {
            return Err(BookingError::NotBookingOwner { booking_id });
        }

        let key = booking.key();
        let _section = self
            .locks
            .acquire(key, self.config.max_key_wait)
            .await
            .map_err(|_| BookingError::LedgerBusy { key })?;

        if !self.ledger.remove(&booking).await? {
            return Err(BookingError::BookingNotFound { booking_id });
        }

        info!(booking_id = %booking_id, %key, "booking cancelled");
        Ok(booking)
    }

    /// All of a user's live bookings, oldest first, each joined with its
    /// train where the catalog still has it.
    pub async fn list_user_bookings(
        &self,
        user: UserId,
    ) -> Result<Vec<UserBooking>, BookingError> {
        let bookings = self.ledger.bookings_for_user(user).await?;
        Ok(bookings
            .into_iter()
            .map(|booking| {
                let train = self.catalog.train(booking.train_id).cloned();
                UserBooking { booking, train }
            })
            .collect())
    }

    /// The availability picture for one train and date.
    ///
    /// A plain read: repeating it without intervening writes returns the
    /// same result, and it never blocks behind writers.
    pub async fn seat_map(
        &self,
        train_id: TrainId,
        travel_date: NaiveDate,
    ) -> Result<SeatMap, BookingError> {
        let train = self
            .catalog
            .train(train_id)
            .ok_or(BookingError::TrainNotFound { train_id })?;

        let key = LedgerKey::new(train_id, travel_date);
        let booked = self.ledger.booked_seats(&key).await?;
        Ok(availability::seat_map(train, travel_date, &booked))
    }
}
