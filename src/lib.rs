mod analyzer;
mod error;
mod forecast;
mod report;
mod store;
mod table;
mod types;

pub use analyzer::*;
pub use error::ForecastError;

pub use forecast::error::{FetchError, LoadError};
pub use forecast::fetcher::{store_records, ForecastFetcher, LatLon, DEFAULT_FORECAST_URL};
pub use forecast::loader::{
    RecordLoader, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MAX_CONSECUTIVE_TIMEOUTS,
};

pub use store::error::StoreError;
pub use store::file_store::{default_store_dir, FileStore};
pub use store::memory_store::MemoryStore;
pub use store::record_store::{record_key, RecordStore};

pub use table::aggregate::{DailyAggregate, DailyCondition, DailyMode, DailySeries};
pub use table::error::TableError;
pub use table::weather_table::*;

pub use report::{report, write_conditions, write_daily_means, write_daily_series};

pub use types::timestamp::{parse_timestamp, TimestampError};
pub use types::weather_condition::{WeatherCondition, CLOUDY_ABOVE, MODERATE_FROM};
pub use types::weather_record::WeatherRecord;
