use crate::core::LedgerEntry;
use crate::entities::{LedgerEntries, PayoutStatus, ledger_entry};
use crate::errors::{Error, Result};
use crate::store::LedgerStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{IntoActiveModel, QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

/// Ledger persisted in the `ledger_entries` table.
///
/// Atomicity comes from single statements: `INSERT .. ON CONFLICT DO NOTHING`
/// for creation and `UPDATE .. WHERE payout_status = ?` for transitions.
#[derive(Debug)]
pub struct SeaOrmLedgerStore {
    db: DatabaseConnection,
}

impl SeaOrmLedgerStore {
    /// Wraps an open connection. Tables must already exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    #[instrument(skip(self, entry), fields(booking_id = %entry.booking_id))]
    async fn insert_if_absent(&self, entry: LedgerEntry) -> Result<()> {
        let active_model = entry.to_model()?.into_active_model();

        let rows_inserted = LedgerEntries::insert(active_model)
            .on_conflict(
                OnConflict::column(ledger_entry::Column::BookingId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        if rows_inserted == 0 {
            return Err(Error::DuplicateBooking {
                booking_id: entry.booking_id,
            });
        }
        Ok(())
    }

    async fn get(&self, booking_id: &str) -> Result<Option<LedgerEntry>> {
        Ok(LedgerEntries::find_by_id(booking_id.to_string())
            .one(&self.db)
            .await?
            .map(LedgerEntry::from))
    }

    #[instrument(skip(self))]
    async fn transition(
        &self,
        booking_id: &str,
        from: PayoutStatus,
        to: PayoutStatus,
        released_at: Option<DateTime<Utc>>,
    ) -> Result<LedgerEntry> {
        let update = LedgerEntries::update_many()
            .set(ledger_entry::ActiveModel {
                payout_status: Set(to),
                payout_released_at: Set(released_at),
                ..Default::default()
            })
            .filter(ledger_entry::Column::BookingId.eq(booking_id))
            .filter(ledger_entry::Column::PayoutStatus.eq(from))
            .exec(&self.db)
            .await?;

        let current = self.get(booking_id).await?.ok_or_else(|| Error::NotFound {
            booking_id: booking_id.to_string(),
        })?;

        if update.rows_affected == 0 {
            debug!(current = %current.payout_status, "compare-and-set lost");
            return Err(Error::InvalidTransition {
                booking_id: booking_id.to_string(),
                from: current.payout_status,
                to,
            });
        }
        Ok(current)
    }

    async fn scan(&self) -> Result<Vec<LedgerEntry>> {
        Ok(LedgerEntries::find()
            .order_by_asc(ledger_entry::Column::CompletedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(LedgerEntry::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn entry(booking_id: &str) -> LedgerEntry {
        LedgerEntry::pending(booking_id.to_string(), dec!(100), None, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() -> Result<()> {
        let store = SeaOrmLedgerStore::new(setup_test_db().await?);
        let created = LedgerEntry::pending(
            "B1".to_string(),
            dec!(49.99),
            Some("pi_abc".to_string()),
            Utc::now(),
        )?;
        store.insert_if_absent(created.clone()).await?;

        let found = store.get("B1").await?.unwrap();
        assert_eq!(found, created);
        assert!(store.get("missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() -> Result<()> {
        let store = SeaOrmLedgerStore::new(setup_test_db().await?);
        store.insert_if_absent(entry("B1")).await?;

        let result = store.insert_if_absent(entry("B1")).await;
        assert!(matches!(result, Err(Error::DuplicateBooking { booking_id }) if booking_id == "B1"));
        assert_eq!(store.scan().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_transition_compare_and_set() -> Result<()> {
        let store = SeaOrmLedgerStore::new(setup_test_db().await?);
        store.insert_if_absent(entry("B1")).await?;

        let released_at = Utc::now();
        let released = store
            .transition(
                "B1",
                PayoutStatus::Pending,
                PayoutStatus::Released,
                Some(released_at),
            )
            .await?;
        assert_eq!(released.payout_status, PayoutStatus::Released);
        assert_eq!(released.payout_released_at, Some(released_at));

        let err = store
            .transition("B1", PayoutStatus::Pending, PayoutStatus::Held, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: PayoutStatus::Released,
                to: PayoutStatus::Held,
                ..
            }
        ));

        let stored = store.get("B1").await?.unwrap();
        assert_eq!(stored.payout_status, PayoutStatus::Released);
        assert_eq!(stored.payout_released_at, Some(released_at));
        Ok(())
    }

    #[tokio::test]
    async fn test_transition_unknown_booking_with_mock() {
        // UPDATE touches nothing, the follow-up lookup finds nothing
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<ledger_entry::Model>::new()])
            .into_connection();
        let store = SeaOrmLedgerStore::new(db);

        let err = store
            .transition("B404", PayoutStatus::Pending, PayoutStatus::Released, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { booking_id } if booking_id == "B404"));
    }

    #[tokio::test]
    async fn test_scan_orders_by_completion_time() -> Result<()> {
        let store = SeaOrmLedgerStore::new(setup_test_db().await?);
        let earlier = Utc::now() - chrono::Duration::minutes(5);
        let later = Utc::now();

        store
            .insert_if_absent(LedgerEntry::pending("late".to_string(), dec!(10), None, later)?)
            .await?;
        store
            .insert_if_absent(LedgerEntry::pending("early".to_string(), dec!(10), None, earlier)?)
            .await?;

        let ids: Vec<String> = store.scan().await?.into_iter().map(|e| e.booking_id).collect();
        assert_eq!(ids, vec!["early", "late"]);
        Ok(())
    }
}
