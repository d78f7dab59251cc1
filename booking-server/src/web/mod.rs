//! Web layer for the seat booking server.
//!
//! Provides HTTP endpoints for searching trains, reading seat maps, and
//! making and cancelling bookings.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
