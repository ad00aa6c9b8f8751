//! Shared test utilities for the ledger.
//!
//! Helpers for setting up test databases and engines with sensible defaults.

use crate::{
    core::LedgerEngine,
    errors::Result,
    store::{MemoryLedgerStore, SeaOrmLedgerStore},
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool holds a single connection: every statement sees the same
/// database, and concurrent engine calls interleave between statements.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Engine over a fresh in-memory `SQLite` database.
pub async fn setup_engine() -> Result<LedgerEngine<SeaOrmLedgerStore>> {
    Ok(LedgerEngine::new(SeaOrmLedgerStore::new(
        setup_test_db().await?,
    )))
}

/// Engine over the in-process store.
#[must_use]
pub fn memory_engine() -> LedgerEngine<MemoryLedgerStore> {
    LedgerEngine::new(MemoryLedgerStore::new())
}

