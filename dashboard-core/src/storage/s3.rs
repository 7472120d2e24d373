use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};

use crate::error::StoreError;

use super::{BucketProbe, ObjectStore};

/// Region in which S3 rejects an explicit location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// [`ObjectStore`] backed by Amazon S3.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the ambient AWS configuration (env, profile, IMDS).
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .load()
            .await;
        Self::new(Client::new(&config))
    }

    fn location_constraint(&self) -> Option<BucketLocationConstraint> {
        let region = self.client.config().region()?.as_ref();
        if region == DEFAULT_REGION {
            None
        } else {
            Some(BucketLocationConstraint::from(region))
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn probe_bucket(&self, bucket: &str) -> BucketProbe {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => BucketProbe::Exists,
            Err(e) => {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);
                if not_found {
                    BucketProbe::Missing
                } else {
                    BucketProbe::Inconclusive(DisplayErrorContext(&e).to_string())
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let mut req = self.client.create_bucket().bucket(bucket);

        if let Some(constraint) = self.location_constraint() {
            req = req.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(constraint)
                    .build(),
            );
        }

        req.send()
            .await
            .map_err(|e| StoreError::CreateBucket(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StoreError::PutObject(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}
