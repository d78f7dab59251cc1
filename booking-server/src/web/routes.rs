//! HTTP route handlers.

use std::collections::BTreeSet;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::{NaiveDate, Utc};
use tower_http::cors::CorsLayer;

use crate::auth::{AuthError, Authenticator};
use crate::booking::{BookingError, BookingRequest};
use crate::domain::{BookingId, SeatNumber, TimeRange, TrainId, UserId};
use crate::ledger::StorageError;
use crate::search::SearchFilters;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trains", get(search_trains))
        .route("/trains/:train_id/seats", get(train_seats))
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/:booking_id", delete(cancel_booking))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search trains, with availability for an optional travel date.
async fn search_trains(
    State(state): State<AppState>,
    Query(query): Query<TrainSearchQuery>,
) -> Result<Json<Vec<TrainResult>>, AppError> {
    let travel_date = query.date.as_deref().map(parse_date).transpose()?;

    let time_range = query
        .time_range
        .as_deref()
        .map(|raw| {
            TimeRange::parse(raw).map_err(|_| AppError::BadRequest {
                message: format!("Invalid time range: {raw}"),
            })
        })
        .transpose()?;

    let filters = SearchFilters {
        source: query.source,
        destination: query.destination,
        time_range,
        travel_date,
        min_available_seats: query.min_seats,
    };

    let results = state.search.search(&filters).await?;
    Ok(Json(
        results.iter().map(TrainResult::from_availability).collect(),
    ))
}

/// Seat availability for one train and date.
async fn train_seats(
    State(state): State<AppState>,
    Path(train_id): Path<i64>,
    Query(query): Query<SeatMapQuery>,
) -> Result<Json<SeatMapResponse>, AppError> {
    let date = parse_date(&query.date)?;
    let map = state.arbiter.seat_map(TrainId::new(train_id), date).await?;
    Ok(Json(SeatMapResponse::from_seat_map(&map)))
}

/// Book seats on a train.
async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<BookingResult>, AppError> {
    let user_id = authenticate(&state.auth, &headers)?;
    let travel_date = parse_date(&req.date)?;
    let seats = parse_seats(&req.seat_numbers)?;

    let committed = state
        .arbiter
        .create_booking(BookingRequest {
            user_id,
            train_id: TrainId::new(req.train_id),
            travel_date,
            seats,
        })
        .await?;

    Ok(Json(BookingResult::from_committed(&committed)))
}

/// List the caller's bookings, oldest first.
async fn list_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingResult>>, AppError> {
    let user_id = authenticate(&state.auth, &headers)?;
    let bookings = state.arbiter.list_user_bookings(user_id).await?;
    Ok(Json(
        bookings.iter().map(BookingResult::from_user_booking).collect(),
    ))
}

/// Cancel one of the caller's bookings.
async fn cancel_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<i64>,
) -> Result<Json<CancelResponse>, AppError> {
    let user_id = authenticate(&state.auth, &headers)?;
    state
        .arbiter
        .cancel_booking(BookingId::new(booking_id), user_id)
        .await?;
    Ok(Json(CancelResponse {
        message: "Booking cancelled successfully".to_string(),
    }))
}

/// Resolve the caller from the Authorization header.
fn authenticate(auth: &Authenticator, headers: &HeaderMap) -> Result<UserId, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing bearer token".to_string(),
        })?;
    Ok(auth.verify(token, Utc::now())?)
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
        message: format!("Invalid date: {raw}"),
    })
}

/// Convert raw seat numbers, rejecting the ones no train has.
fn parse_seats(raw: &[u32]) -> Result<BTreeSet<SeatNumber>, AppError> {
    let mut seats = BTreeSet::new();
    let mut invalid = Vec::new();
    for &n in raw {
        match SeatNumber::new(n) {
            Ok(seat) => {
                seats.insert(seat);
            }
            Err(_) => invalid.push(n.to_string()),
        }
    }
    if !invalid.is_empty() {
        return Err(AppError::BadRequest {
            message: format!("Invalid seat numbers: {}", invalid.join(", ")),
        });
    }
    Ok(seats)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    Forbidden { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        let message = e.to_string();
        match e {
            BookingError::NoSeatsSelected | BookingError::SeatsOutOfRange { .. } => {
                AppError::BadRequest { message }
            }
            BookingError::TrainNotFound { .. } | BookingError::BookingNotFound { .. } => {
                AppError::NotFound { message }
            }
            BookingError::SeatsUnavailable { .. } => AppError::Conflict { message },
            BookingError::NotBookingOwner { .. } => AppError::Forbidden { message },
            BookingError::LedgerBusy { .. } => AppError::Unavailable { message },
            BookingError::Storage(_) => AppError::Internal { message },
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Unauthorized {
            message: e.to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message.clone()),
            AppError::Forbidden { message } => (StatusCode::FORBIDDEN, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message.clone()),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        // Log errors to stderr for debugging
        eprintln!("[{status}] {message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
