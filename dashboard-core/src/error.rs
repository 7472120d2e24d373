use std::path::PathBuf;

/// Failure to obtain a weather record for a city.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Failed to send request to OpenWeather: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OpenWeather request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse OpenWeather JSON: {0}")]
    Decode(String),

    #[error("Weather provider returned an empty record")]
    Empty,
}

/// Failure talking to the object store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Bucket probe failed: {0}")]
    Probe(String),

    #[error("Error creating bucket: {0}")]
    CreateBucket(String),

    #[error("Refusing to store an empty weather record")]
    EmptyRecord,

    #[error("Failed to serialize weather record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Error saving to S3: {0}")]
    PutObject(String),
}

/// A successful response that lacks a field the dashboard displays.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Weather response is missing expected field `{path}`")]
pub struct ShapeError {
    pub path: &'static str,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error(
        "Missing {what}. Set {env_var} (a .env file works too).\n\
         Hint: run `weather-dashboard configure` to store it in the config file."
    )]
    Missing {
        what: &'static str,
        env_var: &'static str,
    },

    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors that abort a dashboard run.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("Unexpected weather response for {city}: {source}")]
    Shape { city: String, source: ShapeError },

    #[error("Failed to write console output: {0}")]
    Output(#[from] std::io::Error),
}
