//! Train catalog record.

use super::ids::TrainId;
use super::seat::SeatNumber;
use super::time::DepartureTime;

/// A train as described by the catalog.
///
/// Trains are reference data: the catalog fixes the route, departure time
/// and capacity, and nothing in this crate mutates them. Capacity is the
/// same for every travel date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub departure: DepartureTime,
    /// Number of seats, numbered 1..=total_seats.
    pub total_seats: u32,
}

impl Train {
    /// Whether `seat` exists on this train.
    pub fn seat_in_range(&self, seat: SeatNumber) -> bool {
        seat.get() <= self.total_seats
    }
}
