use crate::core::LedgerEntry;
use crate::entities::PayoutStatus;
use crate::errors::{Error, Result};
use crate::store::LedgerStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::trace;

/// Ledger kept in process memory, in insertion order.
///
/// The write lock is held across every check-then-mutate sequence.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn insert_if_absent(&self, entry: LedgerEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.booking_id == entry.booking_id) {
            return Err(Error::DuplicateBooking {
                booking_id: entry.booking_id,
            });
        }
        trace!(booking_id = %entry.booking_id, "memory store insert");
        entries.push(entry);
        Ok(())
    }

    async fn get(&self, booking_id: &str) -> Result<Option<LedgerEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.booking_id == booking_id).cloned())
    }

    async fn transition(
        &self,
        booking_id: &str,
        from: PayoutStatus,
        to: PayoutStatus,
        released_at: Option<DateTime<Utc>>,
    ) -> Result<LedgerEntry> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.booking_id == booking_id)
            .ok_or_else(|| Error::NotFound {
                booking_id: booking_id.to_string(),
            })?;

        if entry.payout_status != from {
            return Err(Error::InvalidTransition {
                booking_id: booking_id.to_string(),
                from: entry.payout_status,
                to,
            });
        }

        entry.payout_status = to;
        entry.payout_released_at = released_at;
        Ok(entry.clone())
    }

    async fn scan(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.entries.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(booking_id: &str) -> LedgerEntry {
        LedgerEntry::pending(booking_id.to_string(), dec!(100), None, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_keeps_first_entry_on_duplicate() -> Result<()> {
        let store = MemoryLedgerStore::new();
        let first = entry("B1");
        store.insert_if_absent(first.clone()).await?;

        let mut second = entry("B1");
        second.base_amount = dec!(5);
        let result = store.insert_if_absent(second).await;

        assert!(matches!(result, Err(Error::DuplicateBooking { booking_id }) if booking_id == "B1"));
        assert_eq!(store.get("B1").await?, Some(first));
        assert_eq!(store.scan().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_transition_checks_current_status() -> Result<()> {
        let store = MemoryLedgerStore::new();
        store.insert_if_absent(entry("B1")).await?;

        let held = store
            .transition("B1", PayoutStatus::Pending, PayoutStatus::Held, None)
            .await?;
        assert_eq!(held.payout_status, PayoutStatus::Held);

        let err = store
            .transition("B1", PayoutStatus::Pending, PayoutStatus::Released, Some(Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: PayoutStatus::Held,
                to: PayoutStatus::Released,
                ..
            }
        ));

        // Rejected transition leaves the entry as it was
        let stored = store.get("B1").await?.unwrap();
        assert_eq!(stored.payout_status, PayoutStatus::Held);
        assert!(stored.payout_released_at.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_transition_unknown_booking() {
        let store = MemoryLedgerStore::new();
        let err = store
            .transition("nope", PayoutStatus::Pending, PayoutStatus::Held, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { booking_id } if booking_id == "nope"));
    }

    #[tokio::test]
    async fn test_scan_preserves_insertion_order() -> Result<()> {
        let store = MemoryLedgerStore::new();
        for id in ["B3", "B1", "B2"] {
            store.insert_if_absent(entry(id)).await?;
        }

        let ids: Vec<String> = store.scan().await?.into_iter().map(|e| e.booking_id).collect();
        assert_eq!(ids, vec!["B3", "B1", "B2"]);
        Ok(())
    }
}
