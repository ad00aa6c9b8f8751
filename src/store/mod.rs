//! Storage seam for the ledger engine.
//!
//! The engine only talks to a [`LedgerStore`]; hosts pick SQLite via SeaORM
//! or the in-memory store. Both stores make insert-if-absent and the payout
//! status compare-and-set atomic.

/// In-memory store backed by a `tokio` lock
pub mod memory;
/// SQLite store backed by SeaORM
pub mod sea;

pub use memory::MemoryLedgerStore;
pub use sea::SeaOrmLedgerStore;

use crate::core::LedgerEntry;
use crate::entities::PayoutStatus;
use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence operations the ledger engine needs.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Stores `entry` unless its booking id is already present.
    ///
    /// Fails with `Error::DuplicateBooking` on collision; the existing entry
    /// is left untouched.
    async fn insert_if_absent(&self, entry: LedgerEntry) -> Result<()>;

    /// Looks up an entry by booking id.
    async fn get(&self, booking_id: &str) -> Result<Option<LedgerEntry>>;

    /// Moves an entry from `from` to `to` in one atomic step and returns the
    /// updated entry.
    ///
    /// Fails with `Error::NotFound` for an unknown booking and with
    /// `Error::InvalidTransition` when the stored status is not `from`.
    async fn transition(
        &self,
        booking_id: &str,
        from: PayoutStatus,
        to: PayoutStatus,
        released_at: Option<DateTime<Utc>>,
    ) -> Result<LedgerEntry>;

    /// Returns every entry. Order is unspecified.
    async fn scan(&self) -> Result<Vec<LedgerEntry>>;
}
