//! Database configuration module for the ledger.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. The
//! `ledger_entries` table is generated from the entity definition with
//! `Schema::create_table_from_entity`, so the schema always matches the model.

use crate::config::app::AppConfig;
use crate::entities::LedgerEntries;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info, instrument};

/// Used when neither the command line, `DATABASE_URL` nor config.toml name a database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://tfh_ledger.sqlite?mode=rwc";

/// Picks the database URL: explicit value (flag or `DATABASE_URL`) first,
/// then config.toml, then [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn resolve_database_url(explicit: Option<String>, config: &AppConfig) -> String {
    explicit
        .or_else(|| config.database_url.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}

/// Opens a connection to `database_url` and makes sure the tables exist.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {}", database_url);
    let db = Database::connect(database_url).await?;
    create_tables(&db).await?;
    info!("Database ready at {}", database_url);
    Ok(db)
}

/// Creates the ledger table if it is missing.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut ledger_table = schema.create_table_from_entity(LedgerEntries);
    ledger_table.if_not_exists();

    db.execute(builder.build(&ledger_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::LedgerEntryModel;
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let _: Vec<LedgerEntryModel> = LedgerEntries::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_connection_in_memory() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        let rows: Vec<LedgerEntryModel> = LedgerEntries::find().all(&db).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_resolve_database_url_precedence() {
        let config = AppConfig {
            database_url: Some("sqlite://from_config.sqlite".to_string()),
            ..AppConfig::default()
        };

        assert_eq!(
            resolve_database_url(Some("sqlite://explicit.sqlite".to_string()), &config),
            "sqlite://explicit.sqlite"
        );
        assert_eq!(
            resolve_database_url(None, &config),
            "sqlite://from_config.sqlite"
        );
        assert_eq!(
            resolve_database_url(None, &AppConfig::default()),
            DEFAULT_DATABASE_URL
        );
    }
}
