//! The seat ledger: durable record of live bookings.
//!
//! A store implements persistence for [`crate::domain::Booking`] rows; the
//! cached wrapper adds per-key read caching of booked-seat sets. Neither
//! layer makes booking decisions; that is the arbitration layer's job.

mod cache;
mod encoding;
mod memory;
mod sqlite;
mod store;

pub use cache::{CacheConfig, CachedLedger};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use store::{LedgerStore, NewBooking, StorageError};
