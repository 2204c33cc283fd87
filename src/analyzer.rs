//! This module provides the main entry point for analyzing stored forecasts.
//! It loads the `data[i]` documents from an injected [`RecordStore`], builds a
//! [`WeatherTable`] and computes the per-day summaries.

use crate::error::ForecastError;
use crate::forecast::loader::{
    RecordLoader, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MAX_CONSECUTIVE_TIMEOUTS,
};
use crate::store::record_store::RecordStore;
use crate::table::aggregate::{DailyAggregate, DailyCondition, DailySeries};
use crate::table::error::TableError;
use crate::table::weather_table::{
    WeatherTable, COL_CLOUDS, COL_TEMP, COL_WIND_SPEED, DEFAULT_TIMESTAMP_FIELD,
};
use bon::bon;
use log::info;
use std::time::Duration;

/// How many `data[i]` keys are read when no count is given. The 3-hourly
/// forecast covers five days, which is 40 entries.
pub const DEFAULT_RECORD_COUNT: usize = 40;

/// The three per-day views of a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    /// Mean `temp` per date.
    pub daily_temperature: DailyAggregate,
    /// `wind_spd` points per date.
    pub wind_speed: DailySeries,
    /// Majority condition per date, classified from `clouds`.
    pub conditions: DailyCondition,
}

impl WeatherSummary {
    /// Computes all summaries, classifying the table on the way.
    ///
    /// # Errors
    ///
    /// Fails with a [`TableError`] if `temp` or `wind_spd` is absent from
    /// every row, or if a row has no usable `clouds` value.
    pub fn from_table(table: &mut WeatherTable) -> Result<Self, TableError> {
        let daily_temperature = table.daily_mean(COL_TEMP)?;
        let wind_speed = table.daily_series(COL_WIND_SPEED)?;
        table.classify_conditions(COL_CLOUDS)?;
        let conditions = table.daily_conditions()?;
        Ok(Self {
            daily_temperature,
            wind_speed,
            conditions,
        })
    }
}

/// Reads stored forecast entries and turns them into tables and summaries.
///
/// The store is handed in by the caller; the analyzer holds no connection of
/// its own.
///
/// # Examples
///
/// ```rust
/// # use forecast_insights::{ForecastError, MemoryStore, RecordStore, WeatherAnalyzer};
/// # #[tokio::main]
/// # async fn main() -> Result<(), ForecastError> {
/// let store = MemoryStore::new();
/// store.set("data[0]", r#"{"datetime": "2024-01-01:00", "temp": 10, "clouds": 90}"#).await?;
/// store.set("data[1]", r#"{"datetime": "2024-01-01:12", "temp": 20, "clouds": 50}"#).await?;
///
/// let analyzer = WeatherAnalyzer::new(store);
/// let table = analyzer.load_table().max_count(2).call().await?;
/// assert_eq!(table.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct WeatherAnalyzer<S> {
    store: S,
    lookup_timeout: Duration,
    max_consecutive_timeouts: u32,
}

#[bon]
impl<S: RecordStore> WeatherAnalyzer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            max_consecutive_timeouts: DEFAULT_MAX_CONSECUTIVE_TIMEOUTS,
        }
    }

    /// Sets the per-key lookup timeout used while loading.
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Sets how many lookups in a row may time out before loading fails.
    pub fn with_max_consecutive_timeouts(mut self, max_consecutive_timeouts: u32) -> Self {
        self.max_consecutive_timeouts = max_consecutive_timeouts;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored entries and builds a [`WeatherTable`].
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.max_count(usize)`: Optional. Number of `data[i]` keys to read. Defaults to [`DEFAULT_RECORD_COUNT`].
    /// * `.timestamp_field(..)`: Optional. Field holding the `YYYY-MM-DD:HH` timestamp. Defaults to [`DEFAULT_TIMESTAMP_FIELD`].
    ///
    /// # Errors
    ///
    /// * [`ForecastError::Load`] if a document is malformed or the store is unavailable.
    /// * [`ForecastError::Table`] if a record lacks a valid timestamp.
    #[builder]
    pub async fn load_table(
        &self,
        #[builder(default = DEFAULT_RECORD_COUNT)] max_count: usize,
        #[builder(into, default = DEFAULT_TIMESTAMP_FIELD.to_string())] timestamp_field: String,
    ) -> Result<WeatherTable, ForecastError> {
        let records = RecordLoader::new(&self.store)
            .with_lookup_timeout(self.lookup_timeout)
            .with_max_consecutive_timeouts(self.max_consecutive_timeouts)
            .load(max_count)
            .await?;
        let table = WeatherTable::from_records_with_timestamp(records, &timestamp_field)?;
        info!("Built weather table with {} rows", table.len());
        Ok(table)
    }

    /// Loads the stored entries and computes a [`WeatherSummary`].
    ///
    /// Takes the same optional `.max_count(..)` and `.timestamp_field(..)` as
    /// [`WeatherAnalyzer::load_table`].
    #[builder]
    pub async fn summarize(
        &self,
        #[builder(default = DEFAULT_RECORD_COUNT)] max_count: usize,
        #[builder(into, default = DEFAULT_TIMESTAMP_FIELD.to_string())] timestamp_field: String,
    ) -> Result<WeatherSummary, ForecastError> {
        let mut table = self
            .load_table()
            .max_count(max_count)
            .timestamp_field(timestamp_field)
            .call()
            .await?;
        Ok(WeatherSummary::from_table(&mut table)?)
    }
}
