use chrono::Local;
use std::io::Write;
use tracing::{error, info};

use crate::{
    error::{FetchError, RunError},
    model::{StorageKey, WeatherSummary},
    provider::WeatherProvider,
    storage::{BucketProbe, BucketStatus, ObjectStore, create_if_absent, save_record},
};

/// Cities fetched on every run, in order.
pub const CITIES: [&str; 3] = ["Philadelphia", "Seattle", "New York"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityOutcome {
    Stored { key: StorageKey },
    StoreFailed { reason: String },
    FetchFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityReport {
    pub city: String,
    pub outcome: CityOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub bucket: BucketStatus,
    pub cities: Vec<CityReport>,
}

impl RunReport {
    pub fn stored_count(&self) -> usize {
        self.cities
            .iter()
            .filter(|c| matches!(c.outcome, CityOutcome::Stored { .. }))
            .count()
    }

    pub fn log_summary(&self) {
        info!(
            stored = self.stored_count(),
            total = self.cities.len(),
            "Weather dashboard run finished"
        );
    }
}

/// Fetches weather for each city and archives it into `bucket`.
#[derive(Debug)]
pub struct Dashboard<'a> {
    provider: &'a dyn WeatherProvider,
    store: &'a dyn ObjectStore,
    bucket: &'a str,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        provider: &'a dyn WeatherProvider,
        store: &'a dyn ObjectStore,
        bucket: &'a str,
    ) -> Self {
        Self {
            provider,
            store,
            bucket,
        }
    }

    /// Provisions the bucket, then processes [`CITIES`] one after another.
    pub async fn run(&self, out: &mut dyn Write) -> Result<RunReport, RunError> {
        self.run_for(&CITIES, out).await
    }

    /// Like [`Dashboard::run`] over an explicit city list.
    ///
    /// A response missing one of the displayed fields aborts the run; every
    /// other failure is recorded in the report and the loop moves on.
    pub async fn run_for(
        &self,
        cities: &[&str],
        out: &mut dyn Write,
    ) -> Result<RunReport, RunError> {
        let probe = self.store.probe_bucket(self.bucket).await;
        if probe != BucketProbe::Exists {
            writeln!(out, "Creating bucket {}", self.bucket)?;
        }

        let bucket = create_if_absent(self.store, self.bucket, probe).await;
        match &bucket {
            BucketStatus::Existing => writeln!(out, "Bucket {} exists", self.bucket)?,
            BucketStatus::Created { .. } => {
                writeln!(out, "Successfully created bucket {}", self.bucket)?
            }
            BucketStatus::CreateFailed { reason, .. } => {
                writeln!(out, "Error creating bucket {}: {reason}", self.bucket)?
            }
        }

        let mut reports = Vec::with_capacity(cities.len());
        for city in cities {
            let outcome = self.process_city(city, out).await?;
            reports.push(CityReport {
                city: city.to_string(),
                outcome,
            });
        }

        Ok(RunReport {
            bucket,
            cities: reports,
        })
    }

    async fn process_city(
        &self,
        city: &str,
        out: &mut dyn Write,
    ) -> Result<CityOutcome, RunError> {
        writeln!(out, "\nFetching weather for {city}...")?;

        let fetched = self
            .provider
            .fetch_weather(city)
            .await
            .and_then(|record| {
                if record.is_empty() {
                    Err(FetchError::Empty)
                } else {
                    Ok(record)
                }
            });

        let record = match fetched {
            Ok(record) => record,
            Err(e) => {
                error!(city, error = %e, "Error fetching weather data");
                writeln!(out, "Failed to fetch weather data for {city}")?;
                return Ok(CityOutcome::FetchFailed {
                    reason: e.to_string(),
                });
            }
        };

        let summary = WeatherSummary::from_record(&record).map_err(|source| RunError::Shape {
            city: city.to_string(),
            source,
        })?;

        writeln!(out, "Temperature: {}°F", summary.temperature)?;
        writeln!(out, "Feels like: {}°F", summary.feels_like)?;
        writeln!(out, "Humidity: {}%", summary.humidity)?;
        writeln!(out, "Conditions: {}", summary.description)?;

        match save_record(self.store, self.bucket, city, record, Local::now()).await {
            Ok(key) => {
                writeln!(out, "Successfully saved data for {city} to S3")?;
                writeln!(out, "Weather data for {city} saved to S3!")?;
                Ok(CityOutcome::Stored { key })
            }
            Err(e) => {
                error!(city, bucket = self.bucket, error = %e, "Error saving to S3");
                writeln!(out, "Failed to save weather data for {city}: {e}")?;
                Ok(CityOutcome::StoreFailed {
                    reason: e.to_string(),
                })
            }
        }
    }
}
