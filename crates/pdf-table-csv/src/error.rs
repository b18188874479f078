use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning PDF bytes into table regions.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("PDF is encrypted")]
    Encrypted,

    #[error("PDF has no pages")]
    NoPages,

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

/// Failures talking to the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket '{bucket}' does not exist")]
    BucketNotFound { bucket: String },

    #[error("object '{key}' does not exist in bucket '{bucket}'")]
    ObjectNotFound { bucket: String, key: String },

    #[error("invalid object key '{key}'")]
    InvalidKey { key: String },

    #[error("storage access failed for '{bucket}/{key}': {message}")]
    Access {
        bucket: String,
        key: String,
        message: String,
    },
}

impl StorageError {
    pub fn access(bucket: &str, key: &str, message: impl ToString) -> Self {
        Self::Access {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("local file '{}': {source}", path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    pub(crate) fn local_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LocalFile {
            path: path.into(),
            source,
        }
    }
}
