use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

/// Object storage as the pipeline sees it: whole-object download and upload.
///
/// One handle is created by the caller and lent to every stage.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Buckets as directories under a root: `<root>/<bucket>/<key>`.
///
/// Lets storage events be replayed locally against a copy of a bucket.
#[derive(Debug, Clone)]
pub struct DirObjectStore {
    root: PathBuf,
}

impl DirObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        if bucket.is_empty() || bucket.contains('/') || !is_plain_relative(Path::new(bucket)) {
            return Err(StorageError::BucketNotFound {
                bucket: bucket.to_string(),
            });
        }
        let dir = self.root.join(bucket);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(StorageError::BucketNotFound {
                bucket: bucket.to_string(),
            })
        }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let dir = self.bucket_dir(bucket)?;
        if key.is_empty() || !is_plain_relative(Path::new(key)) {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(dir.join(key))
    }
}

fn is_plain_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}

impl ObjectStore for DirObjectStore {
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|error| match error.kind() {
            io::ErrorKind::NotFound => StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            _ => StorageError::access(bucket, key, error),
        })
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| StorageError::access(bucket, key, error))?;
        }
        fs::write(&path, bytes).map_err(|error| StorageError::access(bucket, key, error))
    }
}
