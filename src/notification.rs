use chrono::{DateTime, Utc};
use pdf_table_csv::StorageEvent;
use serde::Deserialize;

use crate::error::WorkerError;

const DELETION_ACTIONS: [&str; 2] = ["DeleteObject", "LifecycleDeletion"];

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct R2ObjectRef {
    pub key: String,
}

/// Message body R2 event notifications put on the queue.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct R2Notification {
    pub bucket: String,
    #[serde(default)]
    pub action: Option<String>,
    pub object: R2ObjectRef,
    #[serde(default)]
    pub event_time: Option<DateTime<Utc>>,
}

/// Queue payloads the worker accepts: an R2 notification, or a bare
/// `{bucket, name}` record produced by another publisher.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EventPayload {
    R2(R2Notification),
    Storage(StorageEvent),
}

impl EventPayload {
    pub fn from_json(value: serde_json::Value) -> Result<Self, WorkerError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Deletions name an object that no longer exists.
    pub fn is_deletion(&self) -> bool {
        match self {
            Self::R2(notification) => notification
                .action
                .as_deref()
                .is_some_and(|action| DELETION_ACTIONS.contains(&action)),
            Self::Storage(_) => false,
        }
    }

    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::R2(notification) => notification.event_time,
            Self::Storage(_) => None,
        }
    }

    pub fn into_event(self) -> StorageEvent {
        match self {
            Self::R2(notification) => StorageEvent::new(notification.bucket, notification.object.key),
            Self::Storage(event) => event,
        }
    }
}
