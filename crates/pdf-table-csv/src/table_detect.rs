use crate::model::{PageText, TableRegion};
use crate::table_parse::{LineKind, classify_line};

/// A run of rows shorter than this is treated as stray text, not a table.
pub(crate) const MIN_REGION_ROWS: usize = 2;

fn single_spaced_width(kinds: &[LineKind], index: Option<usize>) -> Option<usize> {
    match index.and_then(|index| kinds.get(index)) {
        Some(LineKind::SingleSpaced { cells, .. }) => Some(cells.len()),
        _ => None,
    }
}

/// Decides which lines are rows. A single-spaced line without digits only
/// counts when a neighbouring line is single-spaced to the same width, so a
/// title above a gap-aligned header stays out of the table.
fn resolve_rows(kinds: &[LineKind]) -> Vec<Option<Vec<String>>> {
    kinds
        .iter()
        .enumerate()
        .map(|(index, kind)| match kind {
            LineKind::Row(cells)
            | LineKind::SingleSpaced {
                cells,
                has_digit: true,
            } => Some(cells.clone()),
            LineKind::SingleSpaced {
                cells,
                has_digit: false,
            } => {
                let width = Some(cells.len());
                (single_spaced_width(kinds, index.checked_sub(1)) == width
                    || single_spaced_width(kinds, Some(index + 1)) == width)
                    .then(|| cells.clone())
            }
            LineKind::Text => None,
        })
        .collect()
}

fn append_to_last_cell(rows: &mut [Vec<String>], text: &str) {
    if let Some(cell) = rows.last_mut().and_then(|row| row.last_mut()) {
        if !cell.is_empty() {
            cell.push(' ');
        }
        cell.push_str(text.trim());
    }
}

/// Finds table regions on one page.
///
/// Consecutive rows form a region. One non-blank text line between two rows
/// is a wrapped cell and is folded into the row above; a blank line or two
/// text lines in a row end the region.
fn detect_regions_in_page(page: &PageText, min_cols: usize) -> Vec<TableRegion> {
    let lines = page.text.lines().collect::<Vec<_>>();
    let kinds = lines
        .iter()
        .map(|line| classify_line(line, min_cols))
        .collect::<Vec<_>>();

    let mut regions = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();
    let mut wrapped: Option<&str> = None;

    let mut close_region = |rows: &mut Vec<Vec<String>>| {
        if rows.len() >= MIN_REGION_ROWS {
            regions.push(TableRegion::new(page.page_number, std::mem::take(rows)));
        } else {
            rows.clear();
        }
    };

    for (line, cells) in lines.iter().zip(resolve_rows(&kinds)) {
        match cells {
            Some(cells) => {
                if let Some(text) = wrapped.take() {
                    append_to_last_cell(&mut current, text);
                }
                current.push(cells);
            }
            None if line.trim().is_empty() || current.is_empty() || wrapped.is_some() => {
                wrapped = None;
                close_region(&mut current);
            }
            None => wrapped = Some(*line),
        }
    }
    close_region(&mut current);

    regions
}

/// Runs detection across every page, keeping page order and the order of
/// regions within each page.
pub(crate) fn detect_regions(pages: &[PageText], min_cols: usize) -> Vec<TableRegion> {
    pages
        .iter()
        .flat_map(|page| detect_regions_in_page(page, min_cols))
        .collect()
}
