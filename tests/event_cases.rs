use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::executor::block_on;
use pretty_assertions::assert_eq;
use serde_json::json;

use pdf_table_csv::{
    ContinuationRule, EventHandler, ExtractError, MemScratch, ObjectStore, Outcome, StorageError,
    StorageEvent, TableExtractor, TableRegion,
};
use pdf_table_worker::config::WorkerConfig;
use pdf_table_worker::error::WorkerError;
use pdf_table_worker::notification::EventPayload;
use pdf_table_worker::queue_consumer::{Processed, describe, process_message};

#[derive(Default)]
struct MemStore {
    objects: RefCell<HashMap<(String, String), Vec<u8>>>,
}

impl MemStore {
    fn with_object(bucket: &str, key: &str) -> Self {
        let store = Self::default();
        store
            .objects
            .borrow_mut()
            .insert((bucket.to_string(), key.to_string()), b"%PDF-1.5".to_vec());
        store
    }

    fn object(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl ObjectStore for MemStore {
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects
            .borrow_mut()
            .insert((bucket.to_string(), key.to_string()), bytes);
        Ok(())
    }
}

struct OneTable;

impl TableExtractor for OneTable {
    fn extract_regions(&self, _pdf: &[u8]) -> Result<Vec<TableRegion>, ExtractError> {
        Ok(vec![TableRegion::new(
            1,
            vec![
                vec!["Truck".to_string(), "Stops".to_string()],
                vec!["Tacos".to_string(), "4".to_string()],
            ],
        )])
    }
}

fn handler(store: MemStore) -> EventHandler<MemStore, OneTable, MemScratch> {
    EventHandler::new(store, OneTable, MemScratch::new("/tmp"))
}

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars = vars
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect::<HashMap<_, _>>();
    move |name| vars.get(name).cloned()
}

#[test]
fn config_defaults_when_nothing_is_set() {
    let config = WorkerConfig::from_lookup(lookup(&[])).expect("defaults");
    assert_eq!(config, WorkerConfig::default());
    assert_eq!(config.scratch_dir, PathBuf::from("/tmp"));
    assert_eq!(config.binding_for("anything"), "BUCKET");
    assert_eq!(config.continuation, ContinuationRule::new(0, 2));
}

#[test]
fn config_reads_bindings_and_skip_overrides() {
    let config = WorkerConfig::from_lookup(lookup(&[
        ("SCRATCH_DIR", "/scratch"),
        ("R2_BINDING", "UPLOADS"),
        ("BUCKET_BINDINGS", r#"{"dc-gov-pdfs": "DCGOV"}"#),
        ("FIRST_REGION_SKIP", "1"),
    ]))
    .expect("config should parse");

    assert_eq!(config.scratch_dir, PathBuf::from("/scratch"));
    assert_eq!(config.binding_for("dc-gov-pdfs"), "DCGOV");
    assert_eq!(config.binding_for("other"), "UPLOADS");
    assert_eq!(config.continuation, ContinuationRule::new(1, 2));
}

#[test]
fn config_rejects_malformed_values() {
    let err = WorkerConfig::from_lookup(lookup(&[("BUCKET_BINDINGS", "DCGOV")]))
        .expect_err("bindings must be JSON");
    assert_eq!(err.code(), "config_error");

    let err = WorkerConfig::from_lookup(lookup(&[("CONTINUATION_SKIP", "-1")]))
        .expect_err("skip must be unsigned");
    assert!(err.message().contains("CONTINUATION_SKIP"));
}

#[test]
fn decodes_r2_notifications() {
    let payload = EventPayload::from_json(json!({
        "account": "3f4b7e3dcab231cbfdaa90a6a28bd548",
        "action": "PutObject",
        "bucket": "dc-gov-pdfs",
        "object": {"key": "2024/april.pdf", "size": 65536, "eTag": "c846ff7a18f28c2e262116d6e8719ef0"},
        "eventTime": "2024-05-24T19:36:44.379Z"
    }))
    .expect("notification should decode");

    let expected_time: DateTime<Utc> = "2024-05-24T19:36:44.379Z".parse().expect("valid time");
    assert!(!payload.is_deletion());
    assert_eq!(payload.event_time(), Some(expected_time));
    assert_eq!(
        payload.into_event(),
        StorageEvent::new("dc-gov-pdfs", "2024/april.pdf")
    );
}

#[test]
fn decodes_plain_storage_events() {
    let payload = EventPayload::from_json(json!({"bucket": "b", "name": "x.pdf"}))
        .expect("plain event should decode");
    assert_eq!(payload, EventPayload::Storage(StorageEvent::new("b", "x.pdf")));
}

#[test]
fn deletions_are_acknowledged_without_fetching() {
    let store = MemStore::default();
    let mut handler = handler(store);
    let processed = block_on(process_message(
        &mut handler,
        json!({"action": "DeleteObject", "bucket": "b", "object": {"key": "gone.pdf"}}),
    ))
    .expect("deletions are not errors");

    assert_eq!(
        processed,
        Processed::IgnoredDeletion {
            key: "gone.pdf".to_string()
        }
    );
    assert_eq!(describe(&processed), "ignored deletion of gone.pdf");
}

#[test]
fn undecodable_messages_are_not_retried() {
    let mut handler = handler(MemStore::default());
    let err = block_on(process_message(&mut handler, json!({"key": "x.pdf"})))
        .expect_err("payload has no bucket");
    assert!(matches!(err, WorkerError::BadEvent(_)));
    assert!(!err.is_retryable());
}

#[test]
fn missing_objects_are_retried() {
    let mut handler = handler(MemStore::default());
    let err = block_on(process_message(
        &mut handler,
        json!({"bucket": "b", "name": "missing.pdf"}),
    ))
    .expect_err("object is missing");
    assert_eq!(err.code(), "not_found");
    assert!(err.is_retryable());
}

#[test]
fn converts_and_publishes_next_to_the_source() {
    let mut handler = handler(MemStore::with_object("b", "inbox/schedule.pdf"));
    let processed = block_on(process_message(
        &mut handler,
        json!({"action": "PutObject", "bucket": "b", "object": {"key": "inbox/schedule.pdf"}}),
    ))
    .expect("conversion should succeed");

    assert_eq!(
        processed,
        Processed::Handled {
            outcome: Outcome::Converted {
                output_key: "schedule.csv".to_string(),
                region_count: 1,
                row_count: 2,
            },
            event_time: None,
        }
    );
    assert_eq!(
        handler.store().object("b", "schedule.csv").as_deref(),
        Some("\"Truck\",\"Stops\"\n\"Tacos\",4\n")
    );
    assert_eq!(
        describe(&processed),
        "published schedule.csv: regions=1, rows=2"
    );
}

#[test]
fn non_pdf_uploads_are_skipped() {
    let mut handler = handler(MemStore::with_object("b", "schedule.csv"));
    let processed = block_on(process_message(
        &mut handler,
        json!({"bucket": "b", "name": "schedule.csv"}),
    ))
    .expect("skip is not an error");
    assert_eq!(
        processed,
        Processed::Handled {
            outcome: Outcome::Skipped,
            event_time: None,
        }
    );
    assert_eq!(describe(&processed), "skipped non-PDF object");
}

#[test]
fn log_line_carries_the_upload_time() {
    let mut handler = handler(MemStore::with_object("b", "menu.pdf"));
    let processed = block_on(process_message(
        &mut handler,
        json!({
            "action": "PutObject",
            "bucket": "b",
            "object": {"key": "menu.pdf"},
            "eventTime": "2024-05-24T19:36:44.379Z"
        }),
    ))
    .expect("conversion should succeed");

    assert_eq!(
        describe(&processed),
        "published menu.csv: regions=1, rows=2 (uploaded 2024-05-24T19:36:44.379Z)"
    );
}
