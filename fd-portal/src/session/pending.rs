use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use super::storage::{KeyValueStorage, StorageError};
use crate::models::fd::CalculationResult;

pub const PENDING_CALCULATION_KEY: &str = "pendingFdCalculation";

/// A calculator result waiting for the visitor to sign in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCalculation {
    pub result: CalculationResult,
    pub product_code: String,
    pub saved_at: DateTime<Utc>,
}

/// Holds at most one pending calculation in session-scoped storage.
pub struct PendingCalculationStore {
    storage: Arc<dyn KeyValueStorage>,
    ttl: Duration,
}

impl PendingCalculationStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    pub fn save(
        &self,
        result: &CalculationResult,
        product_code: &str,
    ) -> Result<PendingCalculation, StorageError> {
        self.save_at(result, product_code, Utc::now())
    }

    pub fn save_at(
        &self,
        result: &CalculationResult,
        product_code: &str,
        saved_at: DateTime<Utc>,
    ) -> Result<PendingCalculation, StorageError> {
        let pending = PendingCalculation {
            result: result.clone(),
            product_code: product_code.to_string(),
            saved_at,
        };
        let raw = serde_json::to_string(&pending).map_err(|source| StorageError::Value {
            key: PENDING_CALCULATION_KEY.to_string(),
            source,
        })?;
        self.storage.set(PENDING_CALCULATION_KEY, &raw)?;
        Ok(pending)
    }

    /// Restores the pending calculation once. The record is deleted whether
    /// or not it is still fresh; an expired or unreadable record yields `None`.
    pub fn take(&self) -> Result<Option<PendingCalculation>, StorageError> {
        self.take_at(Utc::now())
    }

    pub fn take_at(&self, now: DateTime<Utc>) -> Result<Option<PendingCalculation>, StorageError> {
        let Some(raw) = self.storage.take(PENDING_CALCULATION_KEY)? else {
            return Ok(None);
        };

        let pending: PendingCalculation = match serde_json::from_str(&raw) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable pending calculation");
                return Ok(None);
            }
        };

        if self.is_expired(&pending, now) {
            tracing::info!(
                product_code = %pending.product_code,
                saved_at = %pending.saved_at,
                "Discarding expired pending calculation"
            );
            return Ok(None);
        }

        Ok(Some(pending))
    }

    pub fn discard(&self) -> Result<(), StorageError> {
        self.storage.remove(PENDING_CALCULATION_KEY)
    }

    fn is_expired(&self, pending: &PendingCalculation, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => now - pending.saved_at > ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::MemoryStorage;

    const THIRTY_MINUTES: Duration = Duration::from_secs(30 * 60);

    fn result() -> CalculationResult {
        CalculationResult {
            calculation_id: Some("calc-9".into()),
            product_code: Some("FD12".into()),
            principal_amount: 50_000.0,
            interest_rate: 7.0,
            tenure_months: 12,
            maturity_amount: 53_600.0,
            interest_earned: Some(3_600.0),
            maturity_date: None,
        }
    }

    fn store() -> PendingCalculationStore {
        PendingCalculationStore::new(Arc::new(MemoryStorage::new()), THIRTY_MINUTES)
    }

    #[test]
    fn fresh_calculation_is_restored_exactly_once() {
        let store = store();
        let saved_at = Utc::now();
        store.save_at(&result(), "FD12", saved_at).unwrap();

        let restored = store
            .take_at(saved_at + chrono::Duration::minutes(29))
            .unwrap()
            .unwrap();
        assert_eq!(restored.result, result());
        assert_eq!(restored.product_code, "FD12");

        assert!(store.take().unwrap().is_none());
    }

    #[test]
    fn stale_calculation_is_never_restored() {
        let store = store();
        let saved_at = Utc::now();
        store.save_at(&result(), "FD12", saved_at).unwrap();

        let restored = store
            .take_at(saved_at + chrono::Duration::minutes(31))
            .unwrap();
        assert!(restored.is_none());
        // and it is gone for good
        assert!(store.take_at(saved_at).unwrap().is_none());
    }

    #[test]
    fn newer_calculation_replaces_older_one() {
        let store = store();
        store.save(&result(), "FD12").unwrap();
        let mut newer = result();
        newer.tenure_months = 24;
        store.save(&newer, "FD24").unwrap();

        let restored = store.take().unwrap().unwrap();
        assert_eq!(restored.product_code, "FD24");
        assert_eq!(restored.result.tenure_months, 24);
    }

    #[test]
    fn concurrent_takes_restore_only_once() {
        let store = Arc::new(store());
        store.save(&result(), "FD12").unwrap();

        let restored: usize = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.take().unwrap().is_some())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| usize::from(handle.join().unwrap()))
            .sum();

        assert_eq!(restored, 1);
    }

    #[test]
    fn discard_drops_pending_calculation() {
        let store = store();
        store.save(&result(), "FD12").unwrap();
        store.discard().unwrap();
        assert!(store.take().unwrap().is_none());
    }
}
