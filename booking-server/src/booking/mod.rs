//! Seat booking: per-key serialization and the arbitration rules.

mod arbiter;
mod locks;

pub use arbiter::{
    ArbiterConfig, BookingArbiter, BookingError, BookingRequest, CommittedBooking, UserBooking,
};
pub use locks::{KeyGuard, KeyLockTimeout, KeyLocks};
