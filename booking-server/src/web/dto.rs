//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::availability::SeatMap;
use crate::booking::{CommittedBooking, UserBooking};
use crate::domain::{SeatNumber, Train};
use crate::search::TrainAvailability;

/// Query parameters for train search.
#[derive(Debug, Deserialize)]
pub struct TrainSearchQuery {
    /// Source station filter (case-insensitive substring)
    pub source: Option<String>,

    /// Destination station filter (case-insensitive substring)
    pub destination: Option<String>,

    /// Travel date in YYYY-MM-DD format; without it availability is
    /// reported at full capacity
    pub date: Option<String>,

    /// Minimum free seats; zero means no constraint
    pub min_seats: Option<u32>,

    /// Departure window in "HH:MM-HH:MM" format, inclusive
    pub time_range: Option<String>,
}

/// Query parameters for the seat map.
#[derive(Debug, Deserialize)]
pub struct SeatMapQuery {
    /// Travel date in YYYY-MM-DD format
    pub date: String,
}

/// Request body for creating a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// Train to book on
    pub train_id: i64,

    /// Seats to book, numbered from 1
    pub seat_numbers: Vec<u32>,

    /// Travel date in YYYY-MM-DD format
    pub date: String,
}

/// A train in search results.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    pub id: i64,

    pub name: String,

    pub source: String,

    pub destination: String,

    /// Departure time in HH:MM format
    pub time: String,

    pub total_seats: u32,

    /// Seats still free; full capacity when no date was given
    pub available_seats: u32,

    /// Taken seats for the requested date, ascending
    pub booked_seats: Vec<u32>,
}

/// The train embedded in booking payloads. Route and schedule only;
/// availability is date-scoped and reported by the search and seat-map
/// endpoints, never here.
#[derive(Debug, Serialize)]
pub struct TrainSummary {
    pub id: i64,

    pub name: String,

    pub source: String,

    pub destination: String,

    /// Departure time in HH:MM format
    pub time: String,

    pub total_seats: u32,
}

/// Seat availability for one train and date.
#[derive(Debug, Serialize)]
pub struct SeatMapResponse {
    pub train_id: i64,

    /// The date the picture is for, YYYY-MM-DD
    pub date: String,

    pub total_seats: u32,

    /// Free seats, ascending
    pub available_seats: Vec<u32>,

    /// Taken seats, ascending
    pub booked_seats: Vec<u32>,

    pub available_count: u32,
}

/// A booking in responses.
#[derive(Debug, Serialize)]
pub struct BookingResult {
    pub id: i64,

    pub user_id: i64,

    pub train_id: i64,

    /// Booked seats, ascending
    pub seat_numbers: Vec<u32>,

    /// Travel date, YYYY-MM-DD
    pub date: String,

    /// When the booking was committed, RFC 3339
    pub booking_time: String,

    /// The train booked on, if the catalog still carries it
    pub train: Option<TrainSummary>,
}

/// Response for a successful cancellation.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

fn seat_values(seats: &[SeatNumber]) -> Vec<u32> {
    seats.iter().map(|s| s.get()).collect()
}

impl TrainResult {
    /// Create from a search result.
    pub fn from_availability(availability: &TrainAvailability) -> Self {
        let train = &availability.train;
        Self {
            id: train.id.get(),
            name: train.name.clone(),
            source: train.source.clone(),
            destination: train.destination.clone(),
            time: train.departure.to_string(),
            total_seats: train.total_seats,
            available_seats: availability.available_count,
            booked_seats: seat_values(&availability.booked_seats),
        }
    }
}

impl TrainSummary {
    /// Create from a catalog train.
    pub fn from_train(train: &Train) -> Self {
        Self {
            id: train.id.get(),
            name: train.name.clone(),
            source: train.source.clone(),
            destination: train.destination.clone(),
            time: train.departure.to_string(),
            total_seats: train.total_seats,
        }
    }
}

impl SeatMapResponse {
    /// Create from a domain seat map.
    pub fn from_seat_map(map: &SeatMap) -> Self {
        Self {
            train_id: map.train_id.get(),
            date: map.travel_date.to_string(),
            total_seats: map.total_seats,
            available_seats: seat_values(&map.available_seats),
            booked_seats: seat_values(&map.booked_seats),
            available_count: map.available_count,
        }
    }
}

impl BookingResult {
    /// Create from a freshly committed booking.
    pub fn from_committed(committed: &CommittedBooking) -> Self {
        let booking = &committed.booking;
        Self {
            id: booking.id.get(),
            user_id: booking.user_id.get(),
            train_id: booking.train_id.get(),
            seat_numbers: booking.seats.iter().map(|s| s.get()).collect(),
            date: booking.travel_date.to_string(),
            booking_time: booking.created_at.to_rfc3339(),
            train: Some(TrainSummary::from_train(&committed.train)),
        }
    }

    /// Create from a booking in a user's listing.
    pub fn from_user_booking(entry: &UserBooking) -> Self {
        let booking = &entry.booking;
        Self {
            id: booking.id.get(),
            user_id: booking.user_id.get(),
            train_id: booking.train_id.get(),
            seat_numbers: booking.seats.iter().map(|s| s.get()).collect(),
            date: booking.travel_date.to_string(),
            booking_time: booking.created_at.to_rfc3339(),
            train: entry.train.as_ref().map(TrainSummary::from_train),
        }
    }
}
