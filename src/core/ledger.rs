//! Ledger engine - Records paid bookings and drives the payout workflow.
//!
//! The engine owns no state besides its injected [`LedgerStore`]. It validates
//! input, computes fee breakdowns on creation, and turns admin release/hold
//! actions into compare-and-set transitions on the stored entry. Callers that
//! move real money (payout gateway) do so before calling `release_payout`;
//! the engine only records the outcome and never retries.

use crate::{
    core::entry::LedgerEntry,
    entities::PayoutStatus,
    errors::{Error, Result},
    store::LedgerStore,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

/// Escrow ledger over a pluggable store.
#[derive(Debug)]
pub struct LedgerEngine<S> {
    store: S,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Creates an engine on top of `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Records a paid booking as a new `pending` entry.
    ///
    /// Called exactly once by the payment-completion flow. Fails with
    /// `InvalidAmount` for a non-positive, sub-cent or out-of-range amount, `InvalidBookingId`
    /// for a blank id and `DuplicateBooking` if the booking already has an entry.
    pub async fn create_entry(&self, booking_id: &str, base_amount: Decimal) -> Result<LedgerEntry> {
        self.create_entry_with_payment_intent(booking_id, base_amount, None)
            .await
    }

    /// Same as [`Self::create_entry`], also recording the gateway's payment reference.
    #[instrument(skip(self))]
    pub async fn create_entry_with_payment_intent(
        &self,
        booking_id: &str,
        base_amount: Decimal,
        payment_intent_id: Option<String>,
    ) -> Result<LedgerEntry> {
        let booking_id = booking_id.trim();
        if booking_id.is_empty() {
            warn!("Rejected ledger entry with empty booking id");
            return Err(Error::InvalidBookingId);
        }
        let entry = LedgerEntry::pending(
            booking_id.to_string(),
            base_amount,
            payment_intent_id,
            Utc::now(),
        )
        .inspect_err(|e| warn!("Rejected ledger entry for {}: {}", booking_id, e))?;

        self.store
            .insert_if_absent(entry.clone())
            .await
            .inspect_err(|e| warn!("Failed to record ledger entry for {}: {}", booking_id, e))?;

        info!(
            "Recorded ledger entry for booking {}: base={}, charge={}, helper={}, cut={}",
            booking_id,
            entry.base_amount,
            entry.total_customer_charge,
            entry.helper_receives,
            entry.total_platform_cut
        );
        Ok(entry)
    }

    /// Returns every entry. Storage order is not meaningful; see
    /// [`crate::core::summary::sort_for_display`].
    pub async fn list_entries(&self) -> Result<Vec<LedgerEntry>> {
        let entries = self.store.scan().await?;
        debug!("Listed {} ledger entries", entries.len());
        Ok(entries)
    }

    /// Looks up the entry for one booking.
    pub async fn get_entry(&self, booking_id: &str) -> Result<Option<LedgerEntry>> {
        self.store.get(booking_id.trim()).await
    }

    /// Marks a pending payout as released and stamps `payout_released_at`.
    ///
    /// A second release fails with `InvalidTransition` rather than repeating.
    pub async fn release_payout(&self, booking_id: &str) -> Result<LedgerEntry> {
        self.transition(booking_id, PayoutStatus::Released).await
    }

    /// Marks a pending payout as held.
    pub async fn hold_payout(&self, booking_id: &str) -> Result<LedgerEntry> {
        self.transition(booking_id, PayoutStatus::Held).await
    }

    #[instrument(skip(self))]
    async fn transition(&self, booking_id: &str, to: PayoutStatus) -> Result<LedgerEntry> {
        let booking_id = booking_id.trim();
        let released_at = (to == PayoutStatus::Released).then(Utc::now);

        let entry = self
            .store
            .transition(booking_id, PayoutStatus::Pending, to, released_at)
            .await
            .inspect_err(|e| warn!("Payout {} rejected for {}: {}", to, booking_id, e))?;

        info!("Payout for booking {} is now {}", booking_id, entry.payout_status);
        Ok(entry)
    }
}
