//! Ledger entry entity - One escrow record per paid booking.
//!
//! Currency columns are stored as integer cents (`*_cents`). The domain type
//! [`crate::core::LedgerEntry`] converts them to `Decimal` on the way out.
//! Only `payout_status` and `payout_released_at` are ever updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payout workflow state of a ledger entry.
///
/// `Pending` is the only non-terminal state: it moves to `Released` or `Held`
/// through an explicit admin action.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    /// Payment captured, payout to helper not yet decided
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Payout sent to the helper
    #[sea_orm(string_value = "released")]
    Released,
    /// Payout withheld by an admin
    #[sea_orm(string_value = "held")]
    Held,
}

impl PayoutStatus {
    /// Lowercase name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Released => "released",
            Self::Held => "held",
        }
    }
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    /// Booking this entry belongs to; unique across the ledger
    #[sea_orm(primary_key, auto_increment = false)]
    pub booking_id: String,
    /// Agreed job price before fees
    pub base_amount_cents: i64,
    /// What the customer was charged (base + 10%)
    pub total_customer_charge_cents: i64,
    /// Helper's share (90% of base)
    pub helper_receives_cents: i64,
    /// Card processing fee (3% of base)
    pub stripe_fee_cents: i64,
    /// Platform revenue (5% of base)
    pub platform_fee_cents: i64,
    /// Charity contribution (2% of base)
    pub charity_amount_cents: i64,
    /// Sum of the three fee components
    pub total_platform_cut_cents: i64,
    /// Current payout state
    pub payout_status: PayoutStatus,
    /// Set when the payout is released
    pub payout_released_at: Option<DateTimeUtc>,
    /// When the customer's payment succeeded
    pub completed_at: DateTimeUtc,
    /// External payment reference, if the gateway provided one
    pub payment_intent_id: Option<String>,
}

/// Ledger entries stand alone; bookings live in another service
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
