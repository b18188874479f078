use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::csv_out::{CSV_CONTENT_TYPE, rows_to_csv_bytes};
use crate::error::{PipelineError, StorageError};
use crate::extract::{TableExtractor, flatten_regions};
use crate::object_key::{base_name, csv_name_for, is_pdf_key};
use crate::options::ContinuationRule;
use crate::scratch::Scratch;
use crate::storage::ObjectStore;

/// A storage-change notification: which object in which bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageEvent {
    pub bucket: String,
    pub name: String,
}

impl StorageEvent {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The object is not a PDF; nothing was touched.
    Skipped,
    Converted {
        output_key: String,
        region_count: usize,
        row_count: usize,
    },
}

/// Rows produced by the extraction stage, with the region count kept for
/// reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRows {
    pub rows: Vec<Vec<String>>,
    pub region_count: usize,
}

/// Downloads `object_key` from `bucket` into the scratch directory, under the
/// key's base name.
pub async fn fetch<S, F>(
    store: &S,
    scratch: &mut F,
    object_key: &str,
    bucket: &str,
) -> Result<PathBuf, PipelineError>
where
    S: ObjectStore,
    F: Scratch,
{
    let file_name = base_name(object_key);
    if file_name.is_empty() {
        return Err(StorageError::InvalidKey {
            key: object_key.to_string(),
        }
        .into());
    }

    let bytes = store.download(bucket, object_key).await?;
    let path = scratch.path_for(file_name);
    scratch
        .write(&path, &bytes)
        .map_err(|error| PipelineError::local_file(&path, error))?;
    debug!(bytes = bytes.len(), path = %path.display(), "fetched object");
    Ok(path)
}

/// Reads the staged PDF and flattens every detected region into one row set.
pub fn extract_tables<X, F>(
    extractor: &X,
    scratch: &F,
    pdf_path: &Path,
    rule: ContinuationRule,
) -> Result<ExtractedRows, PipelineError>
where
    X: TableExtractor + ?Sized,
    F: Scratch,
{
    let pdf = scratch
        .read(pdf_path)
        .map_err(|error| PipelineError::local_file(pdf_path, error))?;
    let regions = extractor.extract_regions(&pdf)?;
    let rows = flatten_regions(&regions, rule);
    debug!(
        regions = regions.len(),
        rows = rows.len(),
        "flattened table regions"
    );
    Ok(ExtractedRows {
        rows,
        region_count: regions.len(),
    })
}

/// Writes `rows` as `<stem of base_name>.csv` in the scratch directory.
pub fn write_csv<F>(
    scratch: &mut F,
    rows: &[Vec<String>],
    base_name: &str,
) -> Result<PathBuf, PipelineError>
where
    F: Scratch,
{
    let bytes = rows_to_csv_bytes(rows)?;
    let path = scratch.path_for(&csv_name_for(base_name));
    scratch
        .write(&path, &bytes)
        .map_err(|error| PipelineError::local_file(&path, error))?;
    Ok(path)
}

/// Uploads a staged file to the root of `bucket`, keyed by its file name.
/// Returns the key it was stored under.
pub async fn publish<S, F>(
    store: &S,
    scratch: &F,
    local_path: &Path,
    bucket: &str,
) -> Result<String, PipelineError>
where
    S: ObjectStore,
    F: Scratch,
{
    let key = local_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| StorageError::InvalidKey {
            key: local_path.display().to_string(),
        })?;
    let bytes = scratch
        .read(local_path)
        .map_err(|error| PipelineError::local_file(local_path, error))?;
    store.upload(bucket, &key, bytes, CSV_CONTENT_TYPE).await?;
    Ok(key)
}

/// Runs fetch, extract, write and publish for one storage event.
///
/// The store, extractor and scratch area are injected once and reused for
/// every event the handler sees.
#[derive(Debug)]
pub struct EventHandler<S, X, F> {
    store: S,
    extractor: X,
    scratch: F,
    rule: ContinuationRule,
}

impl<S, X, F> EventHandler<S, X, F>
where
    S: ObjectStore,
    X: TableExtractor,
    F: Scratch,
{
    pub fn new(store: S, extractor: X, scratch: F) -> Self {
        Self {
            store,
            extractor,
            scratch,
            rule: ContinuationRule::default(),
        }
    }

    #[must_use]
    pub fn with_continuation(mut self, rule: ContinuationRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scratch(&self) -> &F {
        &self.scratch
    }

    /// Handles one event. In-memory scratch only ever holds the files of the
    /// event being handled.
    pub async fn handle(&mut self, event: &StorageEvent) -> Result<Outcome, PipelineError> {
        info!("processing {}", event.name);
        self.scratch.release();
        if !is_pdf_key(&event.name) {
            debug!(name = %event.name, "not a PDF; skipping");
            return Ok(Outcome::Skipped);
        }

        let pdf_path = fetch(&self.store, &mut self.scratch, &event.name, &event.bucket).await?;
        let extracted = extract_tables(&self.extractor, &self.scratch, &pdf_path, self.rule)?;
        let csv_path = write_csv(&mut self.scratch, &extracted.rows, base_name(&event.name))?;
        let output_key = publish(&self.store, &self.scratch, &csv_path, &event.bucket).await?;

        info!(
            bucket = %event.bucket,
            output_key = %output_key,
            regions = extracted.region_count,
            rows = extracted.rows.len(),
            "published csv"
        );
        Ok(Outcome::Converted {
            output_key,
            region_count: extracted.region_count,
            row_count: extracted.rows.len(),
        })
    }
}
