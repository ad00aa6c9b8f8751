//! Domain representation of a ledger entry.

use crate::core::fees::FeeBreakdown;
use crate::entities::{LedgerEntryModel, PayoutStatus};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// One booking's financial record, from captured payment to payout decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Booking this entry belongs to
    pub booking_id: String,
    /// Agreed job price before fees
    pub base_amount: Decimal,
    /// What the customer was charged
    pub total_customer_charge: Decimal,
    /// Helper's share
    pub helper_receives: Decimal,
    /// Card processing fee
    pub stripe_fee: Decimal,
    /// Platform revenue
    pub platform_fee: Decimal,
    /// Charity contribution
    pub charity_amount: Decimal,
    /// `stripe_fee + platform_fee + charity_amount`
    pub total_platform_cut: Decimal,
    /// Payout workflow state
    pub payout_status: PayoutStatus,
    /// Set only when the payout is released
    pub payout_released_at: Option<DateTime<Utc>>,
    /// When the customer's payment succeeded
    pub completed_at: DateTime<Utc>,
    /// External payment reference
    pub payment_intent_id: Option<String>,
}

impl LedgerEntry {
    /// Builds a fresh `pending` entry, computing its fee breakdown.
    pub fn pending(
        booking_id: String,
        base_amount: Decimal,
        payment_intent_id: Option<String>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self> {
        let fees = FeeBreakdown::from_base_amount(base_amount)?;
        Ok(Self {
            booking_id,
            base_amount,
            total_customer_charge: fees.total_customer_charge,
            helper_receives: fees.helper_receives,
            stripe_fee: fees.stripe_fee,
            platform_fee: fees.platform_fee,
            charity_amount: fees.charity_amount,
            total_platform_cut: fees.total_platform_cut,
            payout_status: PayoutStatus::Pending,
            payout_released_at: None,
            completed_at,
            payment_intent_id,
        })
    }

    /// Converts to the database row, expressing amounts in cents.
    pub fn to_model(&self) -> Result<LedgerEntryModel> {
        Ok(LedgerEntryModel {
            booking_id: self.booking_id.clone(),
            base_amount_cents: to_cents(self.base_amount)?,
            total_customer_charge_cents: to_cents(self.total_customer_charge)?,
            helper_receives_cents: to_cents(self.helper_receives)?,
            stripe_fee_cents: to_cents(self.stripe_fee)?,
            platform_fee_cents: to_cents(self.platform_fee)?,
            charity_amount_cents: to_cents(self.charity_amount)?,
            total_platform_cut_cents: to_cents(self.total_platform_cut)?,
            payout_status: self.payout_status,
            payout_released_at: self.payout_released_at,
            completed_at: self.completed_at,
            payment_intent_id: self.payment_intent_id.clone(),
        })
    }
}

impl From<LedgerEntryModel> for LedgerEntry {
    fn from(model: LedgerEntryModel) -> Self {
        Self {
            booking_id: model.booking_id,
            base_amount: from_cents(model.base_amount_cents),
            total_customer_charge: from_cents(model.total_customer_charge_cents),
            helper_receives: from_cents(model.helper_receives_cents),
            stripe_fee: from_cents(model.stripe_fee_cents),
            platform_fee: from_cents(model.platform_fee_cents),
            charity_amount: from_cents(model.charity_amount_cents),
            total_platform_cut: from_cents(model.total_platform_cut_cents),
            payout_status: model.payout_status,
            payout_released_at: model.payout_released_at,
            completed_at: model.completed_at,
            payment_intent_id: model.payment_intent_id,
        }
    }
}

fn to_cents(amount: Decimal) -> Result<i64> {
    (amount * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or_else(|| Error::InvalidAmount {
            input: amount.to_string(),
        })
}

fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pending_entry_has_no_release_time() {
        let entry = LedgerEntry::pending("B1".to_string(), dec!(100), None, Utc::now()).unwrap();

        assert_eq!(entry.payout_status, PayoutStatus::Pending);
        assert!(entry.payout_released_at.is_none());
        assert_eq!(entry.helper_receives, dec!(90.00));
        assert_eq!(entry.total_platform_cut, dec!(10.00));
    }

    #[test]
    fn test_pending_rejects_out_of_range_amount() {
        let result = LedgerEntry::pending("B1".to_string(), Decimal::MAX, None, Utc::now());
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
    }

    #[test]
    fn test_model_round_trip_keeps_cents() {
        let entry = LedgerEntry::pending(
            "B7".to_string(),
            dec!(12.35),
            Some("pi_123".to_string()),
            Utc::now(),
        )
        .unwrap();

        let model = entry.to_model().unwrap();
        assert_eq!(model.base_amount_cents, 1235);
        assert_eq!(model.total_customer_charge_cents, 1359);
        assert_eq!(model.helper_receives_cents, 1112);
        assert_eq!(model.total_platform_cut_cents, 37 + 62 + 25);

        assert_eq!(LedgerEntry::from(model), entry);
    }
}
