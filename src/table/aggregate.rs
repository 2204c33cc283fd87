//! Per-day summaries over a [`WeatherTable`].

use crate::table::error::TableError;
use crate::table::weather_table::{WeatherTable, COL_CALENDAR_DATE, COL_WEATHER_CONDITION};
use crate::types::weather_condition::WeatherCondition;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

const COL_VALUE: &str = "value";

/// Mean of a field per calendar date. `None` for a date where no row holds a
/// number for the field.
pub type DailyAggregate = BTreeMap<NaiveDate, Option<f64>>;
/// Most frequent label of a field per calendar date.
pub type DailyMode = BTreeMap<NaiveDate, String>;
/// Most frequent weather condition per calendar date.
pub type DailyCondition = BTreeMap<NaiveDate, WeatherCondition>;
/// The `(timestamp, value)` points of a field per calendar date, in row order.
pub type DailySeries = BTreeMap<NaiveDate, Vec<(NaiveDateTime, f64)>>;

/// Picks the most frequent value; ties go to whichever of the tied values
/// appeared first.
pub(crate) fn mode_first_seen<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut first_seen: Vec<T> = Vec::new();
    let mut counts: HashMap<T, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in first_seen {
        let count = counts[&value];
        if best.as_ref().map_or(true, |(_, best_count)| count > *best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

impl WeatherTable {
    fn ensure_field_present(&self, field: &str) -> Result<(), TableError> {
        if self.iter().any(|row| row.has_field(field)) {
            Ok(())
        } else {
            Err(TableError::Field(field.to_string()))
        }
    }

    /// Averages `field` per calendar date.
    ///
    /// Rows where the field is missing, `null` or not a number are left out
    /// of both the sum and the count. The grouping runs as a stable Polars
    /// group-by on the calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Field`] if no row has the field at all.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use forecast_insights::{WeatherRecord, WeatherTable};
    /// use serde_json::json;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let records: Vec<WeatherRecord> = serde_json::from_value(json!([
    ///     {"datetime": "2024-01-01:00", "temp": 10},
    ///     {"datetime": "2024-01-01:12", "temp": 20},
    /// ]))?;
    /// let table = WeatherTable::from_records(records)?;
    ///
    /// let means = table.daily_mean("temp")?;
    /// let jan_1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// assert_eq!(means[&jan_1], Some(15.0));
    /// # Ok(())
    /// # }
    /// ```
    pub fn daily_mean(&self, field: &str) -> Result<DailyAggregate, TableError> {
        self.ensure_field_present(field)?;

        let dates: Vec<NaiveDate> = self.iter().map(|row| row.calendar_date()).collect();
        let values: Vec<Option<f64>> = self.iter().map(|row| row.number(field)).collect();
        let frame = df!(
            COL_CALENDAR_DATE => dates,
            COL_VALUE => values
        )?;

        let means = frame
            .lazy()
            .group_by_stable([col(COL_CALENDAR_DATE)])
            .agg([col(COL_VALUE).mean()])
            .collect()?;

        let date_series = means.column(COL_CALENDAR_DATE)?.date()?;
        let mean_series = means.column(COL_VALUE)?.f64()?;
        let epoch = NaiveDate::default(); // 1970-01-01

        let mut result = DailyAggregate::new();
        for (days, mean) in date_series.into_iter().zip(mean_series.into_iter()) {
            if let Some(days) = days {
                result.insert(epoch + chrono::Duration::days(days as i64), mean);
            }
        }
        Ok(result)
    }

    /// Finds the most frequent value of `field` per calendar date.
    ///
    /// Values are compared by their text label (see
    /// [`crate::WeatherRow::label`]). When several values share the highest
    /// count, the one that occurs first among that date's rows wins.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::FieldIncomplete`] naming the first row without a
    /// value for `field`. For `weather_condition` that means the table has
    /// not been classified yet.
    pub fn daily_mode(&self, field: &str) -> Result<DailyMode, TableError> {
        let mut groups: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
        for (index, row) in self.iter().enumerate() {
            let label = row.label(field).ok_or_else(|| TableError::FieldIncomplete {
                index,
                field: field.to_string(),
            })?;
            groups.entry(row.calendar_date()).or_default().push(label);
        }

        Ok(groups
            .into_iter()
            .filter_map(|(date, labels)| mode_first_seen(labels).map(|label| (date, label)))
            .collect())
    }

    /// [`WeatherTable::daily_mode`] over the `weather_condition` column, typed.
    pub fn daily_conditions(&self) -> Result<DailyCondition, TableError> {
        let mut groups: BTreeMap<NaiveDate, Vec<WeatherCondition>> = BTreeMap::new();
        for (index, row) in self.iter().enumerate() {
            let condition =
                row.weather_condition()
                    .ok_or_else(|| TableError::FieldIncomplete {
                        index,
                        field: COL_WEATHER_CONDITION.to_string(),
                    })?;
            groups.entry(row.calendar_date()).or_default().push(condition);
        }

        Ok(groups
            .into_iter()
            .filter_map(|(date, conditions)| mode_first_seen(conditions).map(|c| (date, c)))
            .collect())
    }

    /// Collects the numeric values of `field` per calendar date with their
    /// timestamps, e.g. how wind speed moves through each day.
    ///
    /// Rows without a number for the field are skipped, so a date can map to
    /// an empty series.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Field`] if no row has the field at all.
    pub fn daily_series(&self, field: &str) -> Result<DailySeries, TableError> {
        self.ensure_field_present(field)?;

        let mut series = DailySeries::new();
        for row in self {
            let points = series.entry(row.calendar_date()).or_default();
            if let Some(value) = row.number(field) {
                points.push((row.timestamp(), value));
            }
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::weather_table::{COL_CLOUDS, COL_TEMP, COL_WIND_SPEED};
    use crate::types::weather_record::WeatherRecord;
    use serde_json::{json, Value};

    fn table(value: Value) -> WeatherTable {
        let records: Vec<WeatherRecord> = serde_json::from_value(value).unwrap();
        WeatherTable::from_records(records).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_mode_first_seen_breaks_ties_by_position() {
        assert_eq!(
            mode_first_seen(["Sunny", "Cloudy", "Sunny", "Cloudy"]),
            Some("Sunny")
        );
        assert_eq!(mode_first_seen(["Cloudy", "Sunny"]), Some("Cloudy"));
        assert_eq!(mode_first_seen(["a", "b", "b"]), Some("b"));
        assert_eq!(mode_first_seen(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_daily_mean_two_rows_same_day() -> Result<(), TableError> {
        let t = table(json!([
            {"datetime": "2024-01-01:00", "temp": 10, "clouds": 90},
            {"datetime": "2024-01-01:12", "temp": 20, "clouds": 50}
        ]));

        let means = t.daily_mean(COL_TEMP)?;

        assert_eq!(means, DailyAggregate::from([(date(2024, 1, 1), Some(15.0))]));
        Ok(())
    }

    #[test]
    fn test_daily_mean_single_row_is_exact() -> Result<(), TableError> {
        let t = table(json!([{"datetime": "2024-02-29:21", "temp": 7.3}]));

        assert_eq!(t.daily_mean(COL_TEMP)?[&date(2024, 2, 29)], Some(7.3));
        Ok(())
    }

    #[test]
    fn test_daily_mean_is_order_independent() -> Result<(), TableError> {
        let rows = vec![
            json!({"datetime": "2024-01-01:00", "temp": 10}),
            json!({"datetime": "2024-01-02:00", "temp": 4}),
            json!({"datetime": "2024-01-01:03", "temp": 20}),
            json!({"datetime": "2024-01-02:03", "temp": 8}),
            json!({"datetime": "2024-01-01:06", "temp": 30}),
        ];
        let forward = table(Value::Array(rows.clone())).daily_mean(COL_TEMP)?;
        let mut reversed_rows = rows;
        reversed_rows.reverse();
        let reversed = table(Value::Array(reversed_rows)).daily_mean(COL_TEMP)?;

        assert_eq!(forward, reversed);
        assert_eq!(forward[&date(2024, 1, 1)], Some(20.0));
        assert_eq!(forward[&date(2024, 1, 2)], Some(6.0));
        Ok(())
    }

    #[test]
    fn test_daily_mean_excludes_missing_values() -> Result<(), TableError> {
        let t = table(json!([
            {"datetime": "2024-01-01:00", "temp": 10},
            {"datetime": "2024-01-01:03"},
            {"datetime": "2024-01-01:06", "temp": null},
            {"datetime": "2024-01-01:09", "temp": 20},
            {"datetime": "2024-01-02:00"}
        ]));

        let means = t.daily_mean(COL_TEMP)?;

        assert_eq!(means[&date(2024, 1, 1)], Some(15.0));
        assert_eq!(means[&date(2024, 1, 2)], None);
        assert_eq!(means.len(), 2);
        Ok(())
    }

    #[test]
    fn test_daily_mean_skips_non_numeric_extra_fields() -> Result<(), TableError> {
        let t = table(json!([
            {"datetime": "2024-01-01:00", "pres": 1012.0},
            {"datetime": "2024-01-01:03", "pres": "n/a"}
        ]));

        assert_eq!(t.daily_mean("pres")?[&date(2024, 1, 1)], Some(1012.0));
        Ok(())
    }

    #[test]
    fn test_daily_mean_unknown_field() {
        let t = table(json!([{"datetime": "2024-01-01:00", "temp": 10}]));
        assert!(matches!(t.daily_mean("dewpt"), Err(TableError::Field(f)) if f == "dewpt"));
        assert!(matches!(
            WeatherTable::default().daily_mean(COL_TEMP),
            Err(TableError::Field(_))
        ));
    }

    #[test]
    fn test_daily_mode_tie_goes_to_first_seen() -> Result<(), TableError> {
        let mut t = table(json!([
            {"datetime": "2024-01-01:00", "temp": 10, "clouds": 90},
            {"datetime": "2024-01-01:12", "temp": 20, "clouds": 50}
        ]));
        t.classify_conditions(COL_CLOUDS)?;

        let modes = t.daily_mode(COL_WEATHER_CONDITION)?;
        let conditions = t.daily_conditions()?;

        assert_eq!(modes[&date(2024, 1, 1)], "Cloudy");
        assert_eq!(conditions[&date(2024, 1, 1)], WeatherCondition::Cloudy);
        Ok(())
    }

    #[test]
    fn test_daily_mode_groups_interleaved_days() -> Result<(), TableError> {
        let mut t = table(json!([
            {"datetime": "2024-01-01:00", "clouds": 10},
            {"datetime": "2024-01-02:00", "clouds": 95},
            {"datetime": "2024-01-01:03", "clouds": 85},
            {"datetime": "2024-01-01:06", "clouds": 20},
            {"datetime": "2024-01-02:03", "clouds": 70},
            {"datetime": "2024-01-01:09", "clouds": 90}
        ]));
        t.classify_conditions(COL_CLOUDS)?;

        let conditions = t.daily_conditions()?;

        // Jan 1: Sunny, Cloudy, Sunny, Cloudy -> tie, Sunny seen first.
        assert_eq!(conditions[&date(2024, 1, 1)], WeatherCondition::Sunny);
        assert_eq!(conditions[&date(2024, 1, 2)], WeatherCondition::Cloudy);
        Ok(())
    }

    #[test]
    fn test_daily_mode_requires_classification() {
        let t = table(json!([{"datetime": "2024-01-01:00", "clouds": 10}]));

        assert!(matches!(
            t.daily_mode(COL_WEATHER_CONDITION),
            Err(TableError::FieldIncomplete { index: 0, .. })
        ));
        assert!(matches!(
            t.daily_conditions(),
            Err(TableError::FieldIncomplete { index: 0, .. })
        ));
    }

    #[test]
    fn test_daily_mode_on_record_field() -> Result<(), TableError> {
        let t = table(json!([
            {"datetime": "2024-01-01:00", "pod": "n"},
            {"datetime": "2024-01-01:12", "pod": "d"},
            {"datetime": "2024-01-01:15", "pod": "d"}
        ]));

        assert_eq!(t.daily_mode("pod")?[&date(2024, 1, 1)], "d");
        Ok(())
    }

    #[test]
    fn test_daily_mode_treats_integer_and_float_as_equal() -> Result<(), TableError> {
        let t = table(json!([
            {"datetime": "2024-01-01:00", "pod": 1},
            {"datetime": "2024-01-01:03", "pod": 2},
            {"datetime": "2024-01-01:06", "pod": 1.0},
            {"datetime": "2024-01-01:09", "pod": 2}
        ]));

        // 1 and 1.0 tie with 2 at two each; 1 was seen first.
        assert_eq!(t.daily_mode("pod")?[&date(2024, 1, 1)], "1");
        Ok(())
    }

    #[test]
    fn test_duplicate_timestamps_count_in_every_aggregate() -> Result<(), TableError> {
        let mut t = table(json!([
            {"datetime": "2024-01-01:09", "temp": 8, "clouds": 10},
            {"datetime": "2024-01-01:06", "temp": 1, "clouds": 90},
            {"datetime": "2024-01-01:06", "temp": 3, "clouds": 95}
        ]));
        t.classify_conditions(COL_CLOUDS)?;

        assert_eq!(t.daily_mean(COL_TEMP)?[&date(2024, 1, 1)], Some(4.0));
        // Sunny is seen first, so Cloudy only wins with both duplicates counted.
        assert_eq!(
            t.daily_conditions()?[&date(2024, 1, 1)],
            WeatherCondition::Cloudy
        );
        assert_eq!(
            t.daily_mode(COL_WEATHER_CONDITION)?[&date(2024, 1, 1)],
            "Cloudy"
        );
        Ok(())
    }

    #[test]
    fn test_daily_series_keeps_row_order_per_day() -> Result<(), TableError> {
        let t = table(json!([
            {"datetime": "2024-01-01:06", "wind_spd": 3.0},
            {"datetime": "2024-01-02:00", "wind_spd": 1.0},
            {"datetime": "2024-01-01:00", "wind_spd": 5.5},
            {"datetime": "2024-01-02:03"}
        ]));

        let series = t.daily_series(COL_WIND_SPEED)?;

        let jan_1: Vec<f64> = series[&date(2024, 1, 1)].iter().map(|(_, v)| *v).collect();
        assert_eq!(jan_1, vec![3.0, 5.5]);
        assert_eq!(series[&date(2024, 1, 2)].len(), 1);
        assert!(matches!(t.daily_series("gust"), Err(TableError::Field(_))));
        Ok(())
    }
}
