//! Defines the `WeatherCondition` enum, the coarse sky label derived from a
//! forecast entry's cloud cover percentage.

use std::fmt;

/// Cloud cover above this percentage is [`WeatherCondition::Cloudy`].
pub const CLOUDY_ABOVE: f64 = 80.0;
/// Cloud cover at or above this percentage (and at most [`CLOUDY_ABOVE`]) is
/// [`WeatherCondition::Moderate`].
pub const MODERATE_FROM: f64 = 60.0;

/// The sky condition for one forecast entry, classified from cloud cover.
///
/// The `Display` form is the plain label (`"Cloudy"`, `"Moderate"`,
/// `"Sunny"`), which is also what the daily reports print.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum WeatherCondition {
    /// More than 80% cloud cover.
    Cloudy,
    /// Between 60% and 80% cloud cover, both ends inclusive.
    Moderate,
    /// Less than 60% cloud cover.
    Sunny,
}

impl WeatherCondition {
    /// Classifies a cloud cover percentage.
    ///
    /// Any real number is accepted; values outside 0-100 fall into the
    /// nearest bucket. `NaN` has no meaningful label and yields `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use forecast_insights::WeatherCondition;
    ///
    /// assert_eq!(WeatherCondition::from_cloud_cover(81.0), Some(WeatherCondition::Cloudy));
    /// assert_eq!(WeatherCondition::from_cloud_cover(80.0), Some(WeatherCondition::Moderate));
    /// assert_eq!(WeatherCondition::from_cloud_cover(59.9), Some(WeatherCondition::Sunny));
    /// assert_eq!(WeatherCondition::from_cloud_cover(f64::NAN), None);
    /// ```
    pub fn from_cloud_cover(cloud_cover: f64) -> Option<Self> {
        if cloud_cover.is_nan() {
            None
        } else if cloud_cover > CLOUDY_ABOVE {
            Some(WeatherCondition::Cloudy)
        } else if cloud_cover >= MODERATE_FROM {
            Some(WeatherCondition::Moderate)
        } else {
            Some(WeatherCondition::Sunny)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Moderate => "Moderate",
            WeatherCondition::Sunny => "Sunny",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
