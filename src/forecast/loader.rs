//! Reads the sequentially keyed forecast documents back out of a [`RecordStore`].

use crate::forecast::error::LoadError;
use crate::store::record_store::{record_key, RecordStore};
use crate::types::weather_record::WeatherRecord;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::timeout;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CONSECUTIVE_TIMEOUTS: u32 = 3;

/// Probes keys `data[0]` .. `data[max_count - 1]` one after another.
///
/// Missing keys are skipped. A lookup that outlives the timeout counts as a
/// missing key, unless it is the `max_consecutive_timeouts`-th timeout in a
/// row, at which point the store is considered down.
pub struct RecordLoader<'a, S> {
    store: &'a S,
    lookup_timeout: Duration,
    max_consecutive_timeouts: u32,
}

impl<'a, S: RecordStore> RecordLoader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            max_consecutive_timeouts: DEFAULT_MAX_CONSECUTIVE_TIMEOUTS,
        }
    }

    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Values below 1 are treated as 1.
    pub fn with_max_consecutive_timeouts(mut self, max_consecutive_timeouts: u32) -> Self {
        self.max_consecutive_timeouts = max_consecutive_timeouts.max(1);
        self
    }

    /// Loads up to `max_count` records in ascending key order.
    ///
    /// # Errors
    ///
    /// * [`LoadError::Deserialization`] if a document is not a JSON object. Nothing
    ///   loaded so far is returned.
    /// * [`LoadError::StoreUnavailable`] if the store itself reports a failure.
    /// * [`LoadError::StoreTimedOut`] after too many timeouts in a row.
    pub async fn load(&self, max_count: usize) -> Result<Vec<WeatherRecord>, LoadError> {
        let mut records = Vec::new();
        let mut consecutive_timeouts = 0u32;

        for index in 0..max_count {
            let key = record_key(index);

            let document = match timeout(self.lookup_timeout, self.store.get(&key)).await {
                Ok(result) => {
                    consecutive_timeouts = 0;
                    result.map_err(|source| LoadError::StoreUnavailable {
                        key: key.clone(),
                        source,
                    })?
                }
                Err(_) => {
                    consecutive_timeouts += 1;
                    warn!(
                        "Lookup of {} timed out after {:?} ({} in a row)",
                        key, self.lookup_timeout, consecutive_timeouts
                    );
                    if consecutive_timeouts >= self.max_consecutive_timeouts {
                        return Err(LoadError::StoreTimedOut {
                            key,
                            timeouts: consecutive_timeouts,
                        });
                    }
                    continue;
                }
            };

            match document {
                Some(document) => {
                    let record = serde_json::from_str::<WeatherRecord>(&document)
                        .map_err(|source| LoadError::Deserialization { key, source })?;
                    records.push(record);
                }
                None => debug!("No document at {}, skipping", key),
            }
        }

        info!(
            "Loaded {} forecast records from {} looked-up keys",
            records.len(),
            max_count
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::error::StoreError;
    use crate::store::memory_store::MemoryStore;

    /// Answers slowly for the listed keys and from an inner store otherwise.
    struct SlowStore {
        inner: MemoryStore,
        slow_keys: Vec<String>,
    }

    impl RecordStore for SlowStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.slow_keys.iter().any(|k| k == key) {
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, document: &str) -> Result<(), StoreError> {
            self.inner.set(key, document).await
        }
    }

    struct BrokenStore;

    fn broken(key: &str) -> StoreError {
        StoreError::Read {
            key: key.to_string(),
            path: std::path::PathBuf::from(format!("/unreachable/{}.json", key)),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
    }

    impl RecordStore for BrokenStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(broken(key))
        }

        async fn set(&self, key: &str, _document: &str) -> Result<(), StoreError> {
            Err(broken(key))
        }
    }

    async fn store_with(docs: &[(usize, &str)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (index, doc) in docs {
            store.set(&record_key(*index), doc).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_skips_missing_keys_in_index_order() -> Result<(), LoadError> {
        let store = store_with(&[(0, r#"{"n": 0}"#), (2, r#"{"n": 2}"#)]).await;

        let records = RecordLoader::new(&store).load(3).await?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].number("n"), Some(0.0));
        assert_eq!(records[1].number("n"), Some(2.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_max_count_bounds_probing() -> Result<(), LoadError> {
        let store = store_with(&[(0, "{}"), (1, "{}"), (5, "{}")]).await;

        assert_eq!(RecordLoader::new(&store).load(0).await?.len(), 0);
        assert_eq!(RecordLoader::new(&store).load(2).await?.len(), 2);
        assert_eq!(RecordLoader::new(&store).load(6).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_document_aborts_load() {
        let store = store_with(&[(0, r#"{"n": 0}"#), (1, "{not json")]).await;

        let result = RecordLoader::new(&store).load(2).await;

        match result {
            Err(LoadError::Deserialization { key, .. }) => assert_eq!(key, "data[1]"),
            other => panic!("expected Deserialization error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_object_document_is_rejected() {
        let store = store_with(&[(0, "[1, 2, 3]")]).await;

        let result = RecordLoader::new(&store).load(1).await;

        assert!(matches!(result, Err(LoadError::Deserialization { .. })));
    }

    #[tokio::test]
    async fn test_single_timeout_counts_as_missing() -> Result<(), LoadError> {
        let store = SlowStore {
            inner: store_with(&[(0, "{}"), (1, "{}"), (2, "{}")]).await,
            slow_keys: vec![record_key(1)],
        };

        let records = RecordLoader::new(&store)
            .with_lookup_timeout(Duration::from_millis(20))
            .load(3)
            .await?;

        assert_eq!(records.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_timeouts_mean_store_unavailable() {
        let store = SlowStore {
            inner: store_with(&[(0, "{}")]).await,
            slow_keys: (1..4).map(record_key).collect(),
        };

        let result = RecordLoader::new(&store)
            .with_lookup_timeout(Duration::from_millis(20))
            .with_max_consecutive_timeouts(3)
            .load(10)
            .await;

        match result {
            Err(LoadError::StoreTimedOut { key, timeouts }) => {
                assert_eq!(key, "data[3]");
                assert_eq!(timeouts, 3);
            }
            other => panic!("expected StoreTimedOut error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal() {
        let result = RecordLoader::new(&BrokenStore).load(1).await;
        match result {
            Err(LoadError::StoreUnavailable { key, source }) => {
                assert_eq!(key, "data[0]");
                assert!(matches!(source, StoreError::Read { .. }));
            }
            other => panic!("expected StoreUnavailable error, got {:?}", other),
        }
    }
}
