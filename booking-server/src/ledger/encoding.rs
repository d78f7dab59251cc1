//! Persisted seat-list encoding.
//!
//! A booking's seats are stored as a JSON array in a single text column,
//! e.g. `[12, 13]`. Early deployments wrote a bare number for one-seat
//! bookings (`12`, sometimes with stray whitespace or zero padding), and
//! those rows are still in the wild. Decoding therefore accepts a scalar
//! and normalizes it to a one-element list. This tolerance exists only
//! here at the storage boundary; writes always emit the list form, and
//! the rest of the crate never sees anything but seat sets.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::domain::{InvalidSeat, SeatNumber};

/// Error returned when a persisted seat list cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SeatsDecodeError {
    #[error("not a seat list or bare seat number: {0}")]
    Malformed(String),

    #[error(transparent)]
    Seat(#[from] InvalidSeat),
}

/// The two shapes a persisted seat column can take.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SeatsColumn {
    Scalar(u32),
    List(Vec<u32>),
}

/// A decoded seat column.
#[derive(Debug)]
pub(crate) struct DecodedSeats {
    pub seats: BTreeSet<SeatNumber>,
    /// True when the row used the legacy bare-scalar form.
    pub from_scalar: bool,
}

/// Decode a persisted seat column into a seat set.
pub(crate) fn decode_seats(raw: &str) -> Result<DecodedSeats, SeatsDecodeError> {
    let (numbers, from_scalar) = match serde_json::from_str::<SeatsColumn>(raw) {
        Ok(SeatsColumn::List(list)) => (list, false),
        Ok(SeatsColumn::Scalar(n)) => (vec![n], true),
        Err(_) => {
            // Zero-padded scalars like "07" are not valid JSON but were
            // written by the oldest rows.
            let n: u32 = raw
                .trim()
                .parse()
                .map_err(|_| SeatsDecodeError::Malformed(raw.to_string()))?;
            (vec![n], true)
        }
    };

    let mut seats = BTreeSet::new();
    for n in numbers {
        seats.insert(SeatNumber::new(n)?);
    }
    Ok(DecodedSeats { seats, from_scalar })
}

/// Encode a seat set for persistence. Always the JSON list form.
pub(crate) fn encode_seats(seats: &BTreeSet<SeatNumber>) -> String {
    let numbers: Vec<u32> = seats.iter().map(|s| s.get()).collect();
    // Serializing a vec of integers cannot fail.
    serde_json::to_string(&numbers).unwrap()
}
