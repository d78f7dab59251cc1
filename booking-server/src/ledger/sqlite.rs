//! SQLite-backed seat ledger.
//!
//! Rows map one-to-one to [`Booking`]s. Seat sets live in a single text
//! column in the encoding described in [`super::encoding`]; travel dates
//! are ISO `YYYY-MM-DD` text. The store creates its own schema on
//! connect, so a fresh database file works immediately.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use crate::domain::{Booking, BookingId, LedgerKey, TrainId, UserId};

use super::encoding::{decode_seats, encode_seats};
use super::store::{LedgerStore, NewBooking, StorageError};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        train_id INTEGER NOT NULL,
        travel_date TEXT NOT NULL,
        seat_numbers TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_bookings_key ON bookings (train_id, travel_date)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_user ON bookings (user_id)",
];

/// Ledger store backed by a SQLite database.
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Connect to the database at `url` (e.g. `sqlite://bookings.db?mode=rwc`)
    /// and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(SqliteLedger { pool })
    }
}

fn row_to_booking(row: &SqliteRow) -> Result<Booking, StorageError> {
    let id: i64 = row.try_get("id")?;
    let raw_seats: String = row.try_get("seat_numbers")?;

    let decoded = decode_seats(&raw_seats).map_err(|e| StorageError::CorruptSeats {
        booking_id: id,
        reason: e.to_string(),
    })?;
    if decoded.seats.is_empty() {
        // No committed booking ever holds zero seats
        return Err(StorageError::CorruptSeats {
            booking_id: id,
            reason: "empty seat list".to_string(),
        });
    }
    if decoded.from_scalar {
        debug!(booking_id = id, "normalized legacy scalar seat entry");
    }

    Ok(Booking {
        id: BookingId::new(id),
        user_id: UserId::new(row.try_get("user_id")?),
        train_id: TrainId::new(row.try_get("train_id")?),
        travel_date: row.try_get("travel_date")?,
        seats: decoded.seats,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    async fn insert(&self, new: NewBooking) -> Result<Booking, StorageError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO bookings (user_id, train_id, travel_date, seat_numbers, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new.user_id.get())
        .bind(new.key.train_id.get())
        .bind(new.key.travel_date)
        .bind(encode_seats(&new.seats))
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Booking {
            id: BookingId::new(result.last_insert_rowid()),
            user_id: new.user_id,
            train_id: new.key.train_id,
            travel_date: new.key.travel_date,
            seats: new.seats,
            created_at,
        })
    }

    async fn remove(&self, id: BookingId) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, id: BookingId) -> Result<Option<Booking>, StorageError> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_booking).transpose()
    }

    async fn bookings_for_key(&self, key: &LedgerKey) -> Result<Vec<Booking>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM bookings WHERE train_id = ? AND travel_date = ? ORDER BY id",
        )
        .bind(key.train_id.get())
        .bind(key.travel_date)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_booking).collect()
    }

    async fn bookings_for_user(&self, user: UserId) -> Result<Vec<Booking>, StorageError> {
        let rows = sqlx::query("SELECT * FROM bookings WHERE user_id = ? ORDER BY id")
            .bind(user.get())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_booking).collect()
    }
}
