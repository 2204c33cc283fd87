//! Plain-text output of the per-day summaries.

use crate::table::aggregate::{DailyAggregate, DailyCondition, DailySeries};
use crate::types::weather_condition::WeatherCondition;
use chrono::{NaiveDate, Timelike};
use std::io::{self, Write};

/// Lists the daily conditions as `(date, condition)` pairs, earliest date first.
pub fn report(conditions: &DailyCondition) -> Vec<(NaiveDate, WeatherCondition)> {
    conditions
        .iter()
        .map(|(date, condition)| (*date, *condition))
        .collect()
}

/// Writes one `YYYY-MM-DD - Label` line per date.
pub fn write_conditions<W: Write>(out: &mut W, conditions: &DailyCondition) -> io::Result<()> {
    for (date, condition) in report(conditions) {
        writeln!(out, "{} - {}", date, condition)?;
    }
    Ok(())
}

/// Writes one `YYYY-MM-DD: value` line per date, `n/a` where there is no value.
pub fn write_daily_means<W: Write>(out: &mut W, means: &DailyAggregate) -> io::Result<()> {
    for (date, mean) in means {
        match mean {
            Some(mean) => writeln!(out, "{}: {:.2}", date, mean)?,
            None => writeln!(out, "{}: n/a", date)?,
        }
    }
    Ok(())
}

/// Writes each date followed by its `HH:00 value` points.
pub fn write_daily_series<W: Write>(out: &mut W, series: &DailySeries) -> io::Result<()> {
    for (date, points) in series {
        writeln!(out, "{}", date)?;
        for (timestamp, value) in points {
            writeln!(out, "  {:02}:00  {:.2}", timestamp.hour(), value)?;
        }
    }
    Ok(())
}
