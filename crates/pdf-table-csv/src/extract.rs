use tracing::debug;

use crate::error::ExtractError;
use crate::model::TableRegion;
use crate::options::{ContinuationRule, ExtractOptions};
use crate::pdf_reader::read_pdf_pages;
use crate::table_detect::detect_regions;

/// A backend that finds table regions in a PDF.
///
/// Regions come back in page order. Flattening and header handling live in
/// [`flatten_regions`], so backends only have to find rows.
pub trait TableExtractor {
    fn extract_regions(&self, pdf: &[u8]) -> Result<Vec<TableRegion>, ExtractError>;
}

/// Text-layout extractor: reads page text with lopdf and pdf-extract and
/// treats runs of column-aligned lines as tables.
#[derive(Debug, Clone, Default)]
pub struct TextTableExtractor {
    options: ExtractOptions,
}

impl TextTableExtractor {
    pub fn new(options: ExtractOptions) -> Result<Self, ExtractError> {
        options.validate()?;
        Ok(Self { options })
    }
}

impl TableExtractor for TextTableExtractor {
    fn extract_regions(&self, pdf: &[u8]) -> Result<Vec<TableRegion>, ExtractError> {
        let pages = read_pdf_pages(pdf)?;
        let regions = detect_regions(&pages, self.options.min_cols);
        debug!(
            pages = pages.len(),
            regions = regions.len(),
            "table detection finished"
        );
        Ok(regions)
    }
}

/// Concatenates region rows, dropping leading rows per `rule`.
///
/// A region shorter than its skip count contributes nothing.
#[must_use]
pub fn flatten_regions(regions: &[TableRegion], rule: ContinuationRule) -> Vec<Vec<String>> {
    regions
        .iter()
        .enumerate()
        .flat_map(|(index, region)| region.rows.iter().skip(rule.skip_for(index)).cloned())
        .collect()
}
