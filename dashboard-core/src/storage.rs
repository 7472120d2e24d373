//! Archiving weather records into an object store.
//!
//! The [`ObjectStore`] trait is the seam between the dashboard and S3; the
//! free functions here implement bucket provisioning and record writing on
//! top of it.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::fmt::Debug;
use tracing::{error, info, warn};

use crate::{
    error::StoreError,
    model::{StorageKey, WeatherRecord, format_timestamp},
};

pub mod s3;

pub use s3::S3Store;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Result of a bucket metadata probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketProbe {
    Exists,
    /// The store answered that the bucket does not exist.
    Missing,
    /// The probe failed for another reason (auth, network, throttling).
    Inconclusive(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync + Debug {
    async fn probe_bucket(&self, bucket: &str) -> BucketProbe;

    async fn create_bucket(&self, bucket: &str) -> Result<(), StoreError>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;
}

/// Outcome of [`create_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketStatus {
    Existing,
    Created { probe: BucketProbe },
    CreateFailed { probe: BucketProbe, reason: String },
}

/// Creates `bucket` unless `probe` (from [`ObjectStore::probe_bucket`])
/// confirmed that it exists.
///
/// Probe and create are separate calls, so another process can create or
/// delete the bucket in between. This is best effort; failures are logged and
/// returned as a status, never raised.
pub async fn create_if_absent(
    store: &dyn ObjectStore,
    bucket: &str,
    probe: BucketProbe,
) -> BucketStatus {
    match &probe {
        BucketProbe::Exists => {
            info!(bucket, "Bucket exists");
            return BucketStatus::Existing;
        }
        BucketProbe::Missing => info!(bucket, "Bucket not found, creating it"),
        BucketProbe::Inconclusive(reason) => {
            warn!(bucket, %reason, "Bucket probe failed, attempting to create it anyway")
        }
    }

    match store.create_bucket(bucket).await {
        Ok(()) => {
            info!(bucket, "Successfully created bucket");
            BucketStatus::Created { probe }
        }
        Err(e) => {
            error!(bucket, error = %e, "Error creating bucket");
            BucketStatus::CreateFailed {
                probe,
                reason: e.to_string(),
            }
        }
    }
}

/// Stamps `record` with `at`, and writes it under a key derived from `city`.
pub async fn save_record(
    store: &dyn ObjectStore,
    bucket: &str,
    city: &str,
    mut record: WeatherRecord,
    at: DateTime<Local>,
) -> Result<StorageKey, StoreError> {
    if record.is_empty() {
        return Err(StoreError::EmptyRecord);
    }

    let timestamp = format_timestamp(at);
    let key = StorageKey::new(city, &timestamp);

    record.stamp(&timestamp);
    let body = record.to_json()?;

    store
        .put_object(bucket, key.as_str(), body.into_bytes(), JSON_CONTENT_TYPE)
        .await?;

    info!(city, bucket, key = %key, "Saved weather record");
    Ok(key)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub struct PutCall {
        pub bucket: String,
        pub key: String,
        pub body: Vec<u8>,
        pub content_type: String,
    }

    /// In-memory store that records every call made to it.
    #[derive(Debug)]
    pub struct RecordingStore {
        pub probe: BucketProbe,
        pub fail_create: bool,
        pub fail_put: bool,
        pub creates: Mutex<Vec<String>>,
        pub puts: Mutex<Vec<PutCall>>,
    }

    impl RecordingStore {
        pub fn new(probe: BucketProbe) -> Self {
            Self {
                probe,
                fail_create: false,
                fail_put: false,
                creates: Mutex::new(Vec::new()),
                puts: Mutex::new(Vec::new()),
            }
        }

        pub fn creates(&self) -> Vec<String> {
            self.creates.lock().unwrap().clone()
        }

        pub fn puts(&self) -> Vec<PutCall> {
            self.puts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn probe_bucket(&self, _bucket: &str) -> BucketProbe {
            self.probe.clone()
        }

        async fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
            self.creates.lock().unwrap().push(bucket.to_string());
            if self.fail_create {
                return Err(StoreError::CreateBucket("AccessDenied".into()));
            }
            Ok(())
        }

        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            body: Vec<u8>,
            content_type: &str,
        ) -> Result<(), StoreError> {
            self.puts.lock().unwrap().push(PutCall {
                bucket: bucket.to_string(),
                key: key.to_string(),
                body,
                content_type: content_type.to_string(),
            });
            if self.fail_put {
                return Err(StoreError::PutObject("service unavailable".into()));
            }
            Ok(())
        }
    }
}
