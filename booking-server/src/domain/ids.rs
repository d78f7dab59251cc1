//! Integer id newtypes.
//!
//! Trains, users and bookings are all identified by integer keys assigned
//! elsewhere (the catalog file, the identity service, the ledger store).
//! Wrapping them keeps the three id spaces from being mixed up in code that
//! handles all three at once.

use std::fmt;

/// Identifier of a train in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrainId(i64);

impl TrainId {
    pub const fn new(id: i64) -> Self {
        TrainId(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user, as assigned by the external identity service.
///
/// This crate never inspects it; it only attaches it to bookings and
/// compares it for ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    pub const fn new(id: i64) -> Self {
        UserId(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a booking, assigned by the ledger store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingId(i64);

impl BookingId {
    pub const fn new(id: i64) -> Self {
        BookingId(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
