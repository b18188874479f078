mod csv_out;
mod error;
mod extract;
mod model;
pub mod object_key;
mod options;
mod pdf_reader;
mod pipeline;
mod scratch;
mod storage;
mod table_detect;
mod table_parse;

use std::path::Path;

use tracing::info;

pub use csv_out::{CSV_CONTENT_TYPE, rows_to_csv_bytes};
pub use error::{ExtractError, PipelineError, StorageError};
pub use extract::{TableExtractor, TextTableExtractor, flatten_regions};
pub use model::TableRegion;
pub use options::{ContinuationRule, ExtractOptions};
pub use pipeline::{
    EventHandler, ExtractedRows, Outcome, StorageEvent, extract_tables, fetch, publish, write_csv,
};
pub use scratch::{DEFAULT_SCRATCH_DIR, DirScratch, MemScratch, Scratch};
pub use storage::{DirObjectStore, ObjectStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub row_count: usize,
    pub region_count: usize,
}

/// Extracts every table in a local PDF and writes the flattened rows to
/// `output_csv`, without going through object storage.
pub fn extract_pdf_to_csv(
    input_pdf: &Path,
    output_csv: &Path,
    options: &ExtractOptions,
    rule: ContinuationRule,
) -> Result<ExtractionReport, PipelineError> {
    let extractor = TextTableExtractor::new(options.clone())?;
    let pdf =
        std::fs::read(input_pdf).map_err(|error| PipelineError::local_file(input_pdf, error))?;
    let regions = extractor.extract_regions(&pdf)?;
    let rows = flatten_regions(&regions, rule);

    let csv = rows_to_csv_bytes(&rows)?;
    std::fs::write(output_csv, csv)
        .map_err(|error| PipelineError::local_file(output_csv, error))?;
    info!(
        regions = regions.len(),
        rows = rows.len(),
        output = %output_csv.display(),
        "wrote csv"
    );

    Ok(ExtractionReport {
        row_count: rows.len(),
        region_count: regions.len(),
    })
}
