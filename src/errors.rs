//! Unified error type for the ledger.
//!
//! Domain errors (`InvalidAmount`, `DuplicateBooking`, `NotFound`,
//! `InvalidTransition`) are recoverable and leave stored state untouched.

use crate::entities::ledger_entry::PayoutStatus;
use thiserror::Error;

/// Every error the ledger can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying SeaORM / SQLite failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Base amount is non-positive, non-numeric, non-finite or finer than a cent
    #[error("Invalid amount: {input}")]
    InvalidAmount {
        /// The rejected input as the caller supplied it
        input: String,
    },

    /// Booking id is empty or blank
    #[error("Booking id must not be empty")]
    InvalidBookingId,

    /// An entry already exists for this booking
    #[error("Ledger entry for booking '{booking_id}' already exists")]
    DuplicateBooking {
        /// Colliding booking id
        booking_id: String,
    },

    /// No entry exists for this booking
    #[error("No ledger entry for booking '{booking_id}'")]
    NotFound {
        /// Unknown booking id
        booking_id: String,
    },

    /// Payout status change not allowed from the entry's current status
    #[error("Cannot move payout for booking '{booking_id}' from {from} to {to}")]
    InvalidTransition {
        /// Booking whose entry was targeted
        booking_id: String,
        /// Status the entry actually had
        from: PayoutStatus,
        /// Status that was requested
        to: PayoutStatus,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
