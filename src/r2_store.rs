use pdf_table_csv::{ObjectStore, StorageError};
use worker::{Bucket, Env, HttpMetadata};

use crate::config::WorkerConfig;

/// Object store backed by the worker's R2 bindings.
///
/// Bucket names from events are mapped to binding names through
/// [`WorkerConfig::binding_for`].
pub struct R2Store<'a> {
    env: &'a Env,
    config: &'a WorkerConfig,
}

impl<'a> R2Store<'a> {
    pub fn new(env: &'a Env, config: &'a WorkerConfig) -> Self {
        Self { env, config }
    }

    fn bucket(&self, bucket: &str) -> Result<Bucket, StorageError> {
        self.env
            .bucket(self.config.binding_for(bucket))
            .map_err(|_| StorageError::BucketNotFound {
                bucket: bucket.to_string(),
            })
    }
}

impl ObjectStore for R2Store<'_> {
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let object = self
            .bucket(bucket)?
            .get(key)
            .execute()
            .await
            .map_err(|error| StorageError::access(bucket, key, error))?
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        let body = object
            .body()
            .ok_or_else(|| StorageError::access(bucket, key, "object has no body"))?;
        body.bytes()
            .await
            .map_err(|error| StorageError::access(bucket, key, error))
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.bucket(bucket)?
            .put(key, bytes)
            .http_metadata(HttpMetadata {
                content_type: Some(content_type.to_string()),
                ..HttpMetadata::default()
            })
            .execute()
            .await
            .map_err(|error| StorageError::access(bucket, key, error))?;
        Ok(())
    }
}
