//! Seat number type.

use std::fmt;

/// Error returned when constructing an invalid seat number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid seat number: {reason}")]
pub struct InvalidSeat {
    reason: &'static str,
}

/// A seat number on a train.
///
/// Seats are numbered from 1; a `SeatNumber` is always at least 1 by
/// construction. Whether a seat actually exists on a given train (i.e.
/// is within that train's capacity) depends on the train and is checked
/// where the train is known.
///
/// # Examples
///
/// ```
/// use booking_server::domain::SeatNumber;
///
/// let seat = SeatNumber::new(12).unwrap();
/// assert_eq!(seat.get(), 12);
///
/// // Seat 0 does not exist
/// assert!(SeatNumber::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatNumber(u32);

impl SeatNumber {
    /// Construct a seat number. Fails for 0.
    pub fn new(n: u32) -> Result<Self, InvalidSeat> {
        if n == 0 {
            return Err(InvalidSeat {
                reason: "seats are numbered from 1",
            });
        }
        Ok(SeatNumber(n))
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(SeatNumber::new(0).is_err());
    }

    #[test]
    fn one_is_the_smallest_seat() {
        assert_eq!(SeatNumber::new(1).unwrap().get(), 1);
    }

    #[test]
    fn orders_numerically() {
        let a = SeatNumber::new(2).unwrap();
        let b = SeatNumber::new(10).unwrap();
        assert!(a < b);
    }

    #[test]
    fn display() {
        assert_eq!(SeatNumber::new(37).unwrap().to_string(), "37");
    }

    #[test]
    fn usable_in_sets() {
        use std::collections::BTreeSet;
        let set: BTreeSet<_> = [3, 1, 2]
            .into_iter()
            .map(|n| SeatNumber::new(n).unwrap())
            .collect();
        let in_order: Vec<u32> = set.iter().map(|s| s.get()).collect();
        assert_eq!(in_order, vec![1, 2, 3]);
    }
}
