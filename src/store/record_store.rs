//! The key-value seam between the forecast fetcher, the record loader and
//! whatever actually holds the JSON documents.

use crate::store::error::StoreError;
use std::future::Future;

/// Builds the key under which the forecast entry at `index` is stored.
///
/// The bracketed form (`data[0]`, `data[1]`, ...) is what existing stores
/// already contain, so it must not change.
///
/// ```
/// use forecast_insights::record_key;
///
/// assert_eq!(record_key(0), "data[0]");
/// assert_eq!(record_key(39), "data[39]");
/// ```
pub fn record_key(index: usize) -> String {
    format!("data[{}]", index)
}

/// A store of JSON documents addressed by string keys.
///
/// Documents travel as serialized JSON text; the store never looks inside
/// them. A key that was never written yields `Ok(None)` rather than an error.
pub trait RecordStore {
    /// Returns the document stored at `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Stores `document` at `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        document: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
