/// Splits a text line on tabs and on runs of two or more spaces.
///
/// Single spaces stay inside a cell, so `"New York  10"` gives two cells.
pub(crate) fn split_line_into_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut pending_space = false;

    let flush = |current: &mut String, cells: &mut Vec<String>| {
        if !current.is_empty() {
            cells.push(std::mem::take(current));
        }
    };

    let mut chars = line.trim().chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\t' {
            pending_space = false;
            flush(&mut current, &mut cells);
            continue;
        }

        if ch.is_whitespace() {
            if chars.peek().is_some_and(|next| next.is_whitespace()) {
                pending_space = false;
                flush(&mut current, &mut cells);
                while chars.next_if(|next| next.is_whitespace()).is_some() {}
            } else {
                pending_space = true;
            }
            continue;
        }

        if pending_space && !current.is_empty() {
            current.push(' ');
        }
        pending_space = false;
        current.push(ch);
    }
    flush(&mut current, &mut cells);

    cells
}

/// Splits on any whitespace; used when a line carries no wide gaps at all.
pub(crate) fn soft_split_line_into_cells(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// How a single line of page text reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LineKind {
    /// Cells separated by tabs or wide gaps.
    Row(Vec<String>),
    /// Cells only separable at single spaces. Without digits this is as
    /// likely a title as a row, so table detection checks the neighbours.
    SingleSpaced { cells: Vec<String>, has_digit: bool },
    Text,
}

/// Classifies `line` against a minimum of `min_cols` cells.
///
/// Wide-gap splitting wins. Single-space splitting is only trusted for short
/// lines or lines with digits that do not end like a sentence.
pub(crate) fn classify_line(line: &str, min_cols: usize) -> LineKind {
    let cells = split_line_into_cells(line);
    if cells.len() >= min_cols {
        return LineKind::Row(cells);
    }

    let soft = soft_split_line_into_cells(line);
    let has_digit = soft
        .iter()
        .any(|cell| cell.chars().any(|ch| ch.is_ascii_digit()));
    let sentence_like = line.trim_end().ends_with(['.', '!', '?']);
    if soft.len() >= min_cols && !sentence_like && (has_digit || soft.len() <= 6) {
        LineKind::SingleSpaced {
            cells: soft,
            has_digit,
        }
    } else {
        LineKind::Text
    }
}
