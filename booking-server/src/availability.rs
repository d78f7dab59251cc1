//! Seat availability, derived on demand.
//!
//! Availability is never stored. It is always computed from the catalog's
//! fixed capacity and the live booked set for a key, so the count and the
//! free-seat list cannot drift from the bookings they are derived from.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{SeatNumber, Train, TrainId};

/// Number of free seats on a train given its booked set.
///
/// Booked entries outside `1..=total_seats` (possible only with a corrupted
/// store) are ignored, keeping the count consistent with
/// [`available_seats`] and never negative.
pub fn available_count(total_seats: u32, booked: &BTreeSet<SeatNumber>) -> u32 {
    let booked_in_range = booked.iter().filter(|s| s.get() <= total_seats).count() as u32;
    total_seats - booked_in_range
}

/// The free seats on a train, ascending.
pub fn available_seats(total_seats: u32, booked: &BTreeSet<SeatNumber>) -> Vec<SeatNumber> {
    (1..=total_seats)
        .filter_map(|n| SeatNumber::new(n).ok())
        .filter(|s| !booked.contains(s))
        .collect()
}

/// Full availability picture for one (train, date) key.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatMap {
    pub train_id: TrainId,
    pub travel_date: NaiveDate,
    pub total_seats: u32,
    /// Free seats, ascending.
    pub available_seats: Vec<SeatNumber>,
    /// Taken seats, ascending.
    pub booked_seats: Vec<SeatNumber>,
    pub available_count: u32,
}

/// Build the seat map for a train on a date from its booked set.
pub fn seat_map(train: &Train, travel_date: NaiveDate, booked: &BTreeSet<SeatNumber>) -> SeatMap {
    SeatMap {
        train_id: train.id,
        travel_date,
        total_seats: train.total_seats,
        available_seats: available_seats(train.total_seats, booked),
        booked_seats: booked.iter().copied().collect(),
        available_count: available_count(train.total_seats, booked),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn booked_set(max_seat: u32) -> impl Strategy<Value = BTreeSet<SeatNumber>> {
        proptest::collection::btree_set(
            (1..=max_seat).prop_map(|n| SeatNumber::new(n).unwrap()),
            0..=max_seat as usize,
        )
    }

    proptest! {
        /// Conservation: free + booked always equals capacity.
        #[test]
        fn conservation(total in 1u32..200, booked in booked_set(200)) {
            let in_range = booked.iter().filter(|s| s.get() <= total).count() as u32;
            prop_assert_eq!(available_count(total, &booked) + in_range, total);
        }

        /// The free list and the booked set never overlap.
        #[test]
        fn free_and_booked_are_disjoint(total in 1u32..200, booked in booked_set(200)) {
            let free = available_seats(total, &booked);
            prop_assert!(free.iter().all(|s| !booked.contains(s)));
        }

        /// The free list is strictly ascending and within range.
        #[test]
        fn free_list_is_ascending_and_in_range(total in 1u32..200, booked in booked_set(200)) {
            let free = available_seats(total, &booked);
            prop_assert!(free.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(free.iter().all(|s| s.get() >= 1 && s.get() <= total));
        }

        /// Count and list always agree.
        #[test]
        fn count_matches_list(total in 1u32..200, booked in booked_set(200)) {
            prop_assert_eq!(
                available_count(total, &booked) as usize,
                available_seats(total, &booked).len()
            );
        }
    }
}
