use csv::{QuoteStyle, WriterBuilder};

use crate::error::PipelineError;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Serializes rows as comma-separated values, quoting every field that does
/// not parse as a number. Rows may differ in width.
pub fn rows_to_csv_bytes(rows: &[Vec<String>]) -> Result<Vec<u8>, PipelineError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .flexible(true)
        .from_writer(Vec::<u8>::new());
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;

    writer
        .into_inner()
        .map_err(|error| PipelineError::Csv(error.into_error().into()))
}
