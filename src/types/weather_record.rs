use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One forecast entry exactly as it was stored: a JSON object of field name
/// to value.
///
/// Nothing is validated here. Required fields are checked once, when the
/// records are turned into a [`crate::WeatherTable`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherRecord {
    fields: Map<String, Value>,
}

impl WeatherRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the field as a float if it holds a JSON number.
    ///
    /// Strings, booleans, `null` and missing fields all yield `None`.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }

}

impl From<Map<String, Value>> for WeatherRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}
