use std::fmt::{Display, Formatter};

use pdf_table_csv::{PipelineError, StorageError};

#[derive(Debug)]
pub enum WorkerError {
    BadEvent(String),
    Config(String),
    NotFound(String),
    Storage(String),
    Parse(String),
    Filesystem(String),
    Internal(String),
}

impl WorkerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadEvent(_) => "bad_event",
            Self::Config(_) => "config_error",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage_error",
            Self::Parse(_) => "parse_error",
            Self::Filesystem(_) => "filesystem_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadEvent(message)
            | Self::Config(message)
            | Self::NotFound(message)
            | Self::Storage(message)
            | Self::Parse(message)
            | Self::Filesystem(message)
            | Self::Internal(message) => message,
        }
    }

    /// Whether handing the message back to the queue can help. A payload
    /// that does not decode never will.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::BadEvent(_))
    }
}

impl Display for WorkerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for WorkerError {}

impl From<PipelineError> for WorkerError {
    fn from(error: PipelineError) -> Self {
        let message = error.to_string();
        match error {
            PipelineError::Storage(
                StorageError::BucketNotFound { .. } | StorageError::ObjectNotFound { .. },
            ) => Self::NotFound(message),
            PipelineError::Storage(_) => Self::Storage(message),
            PipelineError::Extract(_) => Self::Parse(message),
            PipelineError::LocalFile { .. } => Self::Filesystem(message),
            PipelineError::Csv(_) => Self::Internal(message),
        }
    }
}

impl From<serde_json::Error> for WorkerError {
    fn from(error: serde_json::Error) -> Self {
        Self::BadEvent(error.to_string())
    }
}
