use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ShapeError;

/// Prefix under which every archived record is stored.
pub const KEY_PREFIX: &str = "weather-data";

/// Compact local timestamp used both in keys and in the stored record.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A weather observation as returned by the provider.
///
/// The provider's fields are kept verbatim; the dashboard only adds a
/// `timestamp` before archiving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherRecord(Map<String, Value>);

impl WeatherRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// An empty object carries no observation and is treated as no data.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Adds (or replaces) the `timestamp` field.
    pub fn stamp(&mut self, timestamp: &str) {
        self.0
            .insert("timestamp".to_string(), Value::String(timestamp.to_string()));
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }
}

/// The values printed to the console for each city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSummary {
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub description: String,
}

impl WeatherSummary {
    pub fn from_record(record: &WeatherRecord) -> Result<Self, ShapeError> {
        let main = record.get("main");
        let field = |name: &str, path: &'static str| {
            main.and_then(|m| m.get(name))
                .map(display_value)
                .ok_or(ShapeError { path })
        };

        let temperature = field("temp", "main.temp")?;
        let feels_like = field("feels_like", "main.feels_like")?;
        let humidity = field("humidity", "main.humidity")?;
        let description = record
            .get("weather")
            .and_then(|w| w.get(0))
            .and_then(|w| w.get("description"))
            .map(display_value)
            .ok_or(ShapeError {
                path: "weather[0].description",
            })?;

        Ok(Self {
            temperature,
            feels_like,
            humidity,
            description,
        })
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Object key for one archived record: `weather-data/{city}-{timestamp}.json`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(city: &str, timestamp: &str) -> Self {
        Self(format!("{KEY_PREFIX}/{city}-{timestamp}.json"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
