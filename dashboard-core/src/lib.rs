//! Core library for the `weather-dashboard` CLI.
//!
//! This crate defines:
//! - Credentials handling (environment, `.env`, config file)
//! - The OpenWeather provider
//! - Archiving of weather records into an S3 bucket
//! - The driver loop tying fetch and store together
//!
//! It is used by `dashboard-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;
pub mod storage;

pub use config::{Config, Credentials};
pub use dashboard::{CITIES, CityOutcome, CityReport, Dashboard, RunReport};
pub use error::{ConfigError, FetchError, RunError, ShapeError, StoreError};
pub use model::{StorageKey, WeatherRecord, WeatherSummary};
pub use provider::{OpenWeatherProvider, WeatherProvider};
pub use storage::{BucketProbe, BucketStatus, ObjectStore, S3Store};
