/// Domain ledger entry and its database conversion
pub mod entry;
/// Fee percentages, cent rounding and amount validation
pub mod fees;
/// The ledger engine: create, list, release, hold
pub mod ledger;
/// Admin and helper aggregations plus display helpers
pub mod summary;

pub use entry::LedgerEntry;
pub use fees::{FeeBreakdown, parse_base_amount};
pub use ledger::LedgerEngine;
pub use summary::{
    HelperEarnings, LedgerSummary, PayoutBucket, entries_for_bookings, sort_for_display,
    summarize, summarize_for_helper,
};
