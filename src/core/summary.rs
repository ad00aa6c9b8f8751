//! Read-side aggregation for the admin ledger and helper earnings views.
//!
//! All functions here are pure. Sums are accumulated at full precision and
//! rounded to the cent once, at the end.

use crate::{
    core::{entry::LedgerEntry, fees::round_cents},
    entities::PayoutStatus,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Platform-wide totals shown on the admin ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    /// Sum of customer charges
    pub total_volume: Decimal,
    /// Sum of helper shares
    pub total_helper_earnings: Decimal,
    /// Sum of platform fees
    pub total_platform_revenue: Decimal,
    /// Sum of charity contributions
    pub total_charity: Decimal,
    /// Sum of card processing fees
    pub total_stripe_fees: Decimal,
    /// Number of entries
    pub total_jobs: usize,
}

/// Entries sharing one payout status, with the helper's total for them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PayoutBucket {
    /// Entries in this bucket
    pub entries: Vec<LedgerEntry>,
    /// Sum of `helper_receives`, rounded to the cent
    pub total: Decimal,
}

/// A helper's earnings split by payout status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HelperEarnings {
    /// Payment captured, waiting on an admin
    pub pending: PayoutBucket,
    /// Paid out
    pub released: PayoutBucket,
    /// Withheld by an admin
    pub held: PayoutBucket,
}

impl HelperEarnings {
    /// Amount still waiting for release.
    #[must_use]
    pub const fn total_pending(&self) -> Decimal {
        self.pending.total
    }

    /// Amount already paid out.
    #[must_use]
    pub const fn total_released(&self) -> Decimal {
        self.released.total
    }
}

/// Aggregates entries into platform-wide totals.
#[must_use]
pub fn summarize(entries: &[LedgerEntry]) -> LedgerSummary {
    let mut volume = Decimal::ZERO;
    let mut helper_earnings = Decimal::ZERO;
    let mut platform_revenue = Decimal::ZERO;
    let mut charity = Decimal::ZERO;
    let mut stripe_fees = Decimal::ZERO;

    for entry in entries {
        volume += entry.total_customer_charge;
        helper_earnings += entry.helper_receives;
        platform_revenue += entry.platform_fee;
        charity += entry.charity_amount;
        stripe_fees += entry.stripe_fee;
    }

    LedgerSummary {
        total_volume: round_cents(volume),
        total_helper_earnings: round_cents(helper_earnings),
        total_platform_revenue: round_cents(platform_revenue),
        total_charity: round_cents(charity),
        total_stripe_fees: round_cents(stripe_fees),
        total_jobs: entries.len(),
    }
}

/// Splits a helper's entries into pending, released and held buckets.
///
/// Entries with no helper share (`helper_receives <= 0`) are ignored. The
/// caller decides which entries belong to the helper, typically with
/// [`entries_for_bookings`].
#[must_use]
pub fn summarize_for_helper(entries: &[LedgerEntry]) -> HelperEarnings {
    let mut earnings = HelperEarnings::default();

    for entry in entries.iter().filter(|e| e.helper_receives > Decimal::ZERO) {
        let bucket = match entry.payout_status {
            PayoutStatus::Pending => &mut earnings.pending,
            PayoutStatus::Released => &mut earnings.released,
            PayoutStatus::Held => &mut earnings.held,
        };
        bucket.total += entry.helper_receives;
        bucket.entries.push(entry.clone());
    }

    for bucket in [&mut earnings.pending, &mut earnings.released, &mut earnings.held] {
        bucket.total = round_cents(bucket.total);
    }
    earnings
}

/// Keeps the entries whose booking id is in `booking_ids`.
///
/// The booking-to-helper association lives with the booking service; this is
/// where the helper earnings view applies it.
#[must_use]
pub fn entries_for_bookings<T: AsRef<str>>(
    entries: &[LedgerEntry],
    booking_ids: &[T],
) -> Vec<LedgerEntry> {
    entries
        .iter()
        .filter(|e| booking_ids.iter().any(|id| id.as_ref() == e.booking_id))
        .cloned()
        .collect()
}

/// Sorts entries newest first, the order both ledger views display.
pub fn sort_for_display(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
}

/// Formats an amount like `$165.00`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    format!("${:.2}", round_cents(amount))
}

/// One-line description of an entry for listings.
#[must_use]
pub fn format_entry_line(entry: &LedgerEntry) -> String {
    let released = entry
        .payout_released_at
        .map(|at| format!(" (released {})", at.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();

    format!(
        "{} | {} | {} | charged {} | helper {} | platform cut {}{}",
        entry.completed_at.format("%Y-%m-%d %H:%M"),
        entry.booking_id,
        entry.payout_status,
        format_currency(entry.total_customer_charge),
        format_currency(entry.helper_receives),
        format_currency(entry.total_platform_cut),
        released
    )
}
