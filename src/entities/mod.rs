//! Entity module - Contains the SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod ledger_entry;

pub use ledger_entry::{Entity as LedgerEntries, Model as LedgerEntryModel, PayoutStatus};
