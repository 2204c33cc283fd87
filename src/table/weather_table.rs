//! Contains the `WeatherTable`, the in-memory table built from loaded forecast
//! records, with a parsed date-hour and calendar date on every row.

use crate::table::error::TableError;
use crate::types::timestamp::parse_timestamp;
use crate::types::weather_condition::WeatherCondition;
use crate::types::weather_record::WeatherRecord;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use polars::prelude::*;
use serde_json::Value;

/// Name of the timestamp field in the forecast API's entries.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "datetime";

// Derived columns
pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_CALENDAR_DATE: &str = "calendar_date";
pub const COL_WEATHER_CONDITION: &str = "weather_condition";

// Measurements
pub const COL_TEMP: &str = "temp"; // Temperature
pub const COL_WIND_SPEED: &str = "wind_spd"; // Wind speed
pub const COL_CLOUDS: &str = "clouds"; // Cloud cover percentage

const MEASUREMENT_FIELDS: [&str; 3] = [COL_TEMP, COL_WIND_SPEED, COL_CLOUDS];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d:%H";

/// One record plus the columns derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRow {
    record: WeatherRecord,
    timestamp: NaiveDateTime,
    calendar_date: NaiveDate,
    weather_condition: Option<WeatherCondition>,
}

impl WeatherRow {
    fn from_record(
        index: usize,
        record: WeatherRecord,
        timestamp_field: &str,
    ) -> Result<Self, TableError> {
        let schema_error = |field: &str, reason: String| TableError::Schema {
            index,
            field: field.to_string(),
            reason,
        };

        let raw = record
            .get(timestamp_field)
            .ok_or_else(|| schema_error(timestamp_field, "missing".to_string()))?;
        let text = raw
            .as_str()
            .ok_or_else(|| schema_error(timestamp_field, format!("expected a string, got {}", raw)))?;
        let timestamp =
            parse_timestamp(text).map_err(|e| schema_error(timestamp_field, e.to_string()))?;

        for field in MEASUREMENT_FIELDS {
            match record.get(field) {
                None | Some(Value::Null) | Some(Value::Number(_)) => {}
                Some(other) => {
                    return Err(schema_error(field, format!("expected a number, got {}", other)))
                }
            }
        }

        Ok(Self {
            record,
            timestamp,
            calendar_date: timestamp.date(),
            weather_condition: None,
        })
    }

    pub fn record(&self) -> &WeatherRecord {
        &self.record
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn calendar_date(&self) -> NaiveDate {
        self.calendar_date
    }

    /// `None` until [`WeatherTable::classify_conditions`] has run.
    pub fn weather_condition(&self) -> Option<WeatherCondition> {
        self.weather_condition
    }

    /// Whether the row has a value under `field`, derived columns included.
    pub fn has_field(&self, field: &str) -> bool {
        match field {
            COL_TIMESTAMP | COL_CALENDAR_DATE => true,
            COL_WEATHER_CONDITION => self.weather_condition.is_some(),
            _ => self.record.contains(field),
        }
    }

    /// The numeric value of a record field, if it holds a JSON number.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.record.number(field)
    }

    /// The value under `field` as a text label.
    ///
    /// Derived columns are rendered the way the reports print them; record
    /// strings are returned as-is, numbers in their shortest float form (so
    /// `1` and `1.0` share a label) and other JSON values in their JSON form.
    /// Missing fields and `null` yield `None`.
    pub fn label(&self, field: &str) -> Option<String> {
        match field {
            COL_TIMESTAMP => Some(self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            COL_CALENDAR_DATE => Some(self.calendar_date.to_string()),
            COL_WEATHER_CONDITION => self.weather_condition.map(|c| c.to_string()),
            _ => match self.record.get(field)? {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                // 1 and 1.0 are the same value
                Value::Number(n) => {
                    Some(n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string()))
                }
                other => Some(other.to_string()),
            },
        }
    }
}

/// Forecast records in load order, each with a parsed timestamp.
///
/// Rows are neither sorted nor deduplicated: two records for the same hour
/// are two rows. Every per-day operation groups on the calendar date, so row
/// order never changes which rows land in a group.
///
/// # Examples
///
/// ```rust
/// use forecast_insights::{WeatherRecord, WeatherTable};
/// use serde_json::json;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let records: Vec<WeatherRecord> = serde_json::from_value(json!([
///     {"datetime": "2024-01-01:00", "temp": 10.0, "clouds": 90},
///     {"datetime": "2024-01-01:12", "temp": 20.0, "clouds": 50},
/// ]))?;
///
/// let table = WeatherTable::from_records(records)?;
/// assert_eq!(table.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct WeatherTable {
    rows: Vec<WeatherRow>,
}

impl WeatherTable {
    /// Builds a table reading timestamps from [`DEFAULT_TIMESTAMP_FIELD`].
    pub fn from_records(records: Vec<WeatherRecord>) -> Result<Self, TableError> {
        Self::from_records_with_timestamp(records, DEFAULT_TIMESTAMP_FIELD)
    }

    /// Builds a table reading `YYYY-MM-DD:HH` timestamps from `timestamp_field`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Schema`] for the first record whose timestamp is
    /// missing or malformed, or whose `temp`, `wind_spd` or `clouds` field
    /// holds something other than a number or `null`. No table is produced
    /// in that case.
    pub fn from_records_with_timestamp(
        records: Vec<WeatherRecord>,
        timestamp_field: &str,
    ) -> Result<Self, TableError> {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| WeatherRow::from_record(index, record, timestamp_field))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Built weather table with {} rows", rows.len());
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[WeatherRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeatherRow> {
        self.rows.iter()
    }

    /// Adds the `weather_condition` column, classifying each row's `cloud_field`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidValue`] for the first row whose cloud
    /// cover is missing, not a number, or `NaN`. The table is left unchanged.
    pub fn classify_conditions(&mut self, cloud_field: &str) -> Result<(), TableError> {
        let conditions = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                row.number(cloud_field)
                    .and_then(WeatherCondition::from_cloud_cover)
                    .ok_or_else(|| TableError::InvalidValue {
                        index,
                        field: cloud_field.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (row, condition) in self.rows.iter_mut().zip(conditions) {
            row.weather_condition = Some(condition);
        }
        Ok(())
    }

    /// Collects the table into a Polars `DataFrame`.
    ///
    /// Columns: `timestamp` (datetime), `calendar_date` (date), `temp`,
    /// `wind_spd` and `clouds` (nullable f64), plus `weather_condition`
    /// (nullable string) once the table has been classified.
    pub fn to_frame(&self) -> Result<DataFrame, TableError> {
        let timestamps: Vec<NaiveDateTime> = self.rows.iter().map(|r| r.timestamp).collect();
        let dates: Vec<NaiveDate> = self.rows.iter().map(|r| r.calendar_date).collect();

        let mut columns = vec![
            Column::new(COL_TIMESTAMP.into(), timestamps),
            Column::new(COL_CALENDAR_DATE.into(), dates),
        ];
        for field in MEASUREMENT_FIELDS {
            let values: Vec<Option<f64>> = self.rows.iter().map(|r| r.number(field)).collect();
            columns.push(Column::new(field.into(), values));
        }
        if self.rows.iter().any(|r| r.weather_condition.is_some()) {
            let labels: Vec<Option<&str>> = self
                .rows
                .iter()
                .map(|r| r.weather_condition.map(|c| c.as_str()))
                .collect();
            columns.push(Column::new(COL_WEATHER_CONDITION.into(), labels));
        }

        Ok(DataFrame::new(columns)?)
    }
}

impl<'a> IntoIterator for &'a WeatherTable {
    type Item = &'a WeatherRow;
    type IntoIter = std::slice::Iter<'a, WeatherRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
