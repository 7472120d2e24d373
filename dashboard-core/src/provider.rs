use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherRecord, error::FetchError};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current weather observations.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city`. One request per call, no retries.
    async fn fetch_weather(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}
