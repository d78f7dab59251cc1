//! Domain types for the seat booking engine.
//!
//! This module contains the core domain model types that represent
//! validated booking data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod booking;
mod ids;
mod seat;
mod time;
mod train;

pub use booking::{Booking, LedgerKey};
pub use ids::{BookingId, TrainId, UserId};
pub use seat::{InvalidSeat, SeatNumber};
pub use time::{DepartureTime, InvalidTime, TimeRange};
pub use train::Train;
