use std::collections::BTreeMap;

use encoding_rs::{BIG5, Encoding, UTF_16BE};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use crate::error::ExtractError;
use crate::model::PageText;
use crate::table_parse::{LineKind, classify_line};

/// Kerning offsets wider than this inside a `TJ` array are read as a gap
/// between words.
const TJ_GAP_THRESHOLD: i64 = -100;

fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw_text.split('\u{000C}').map(str::to_string).collect();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn looks_garbled(text: &str) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    if text.contains("?Identity-H Unimplemented?") {
        return true;
    }

    let replacement = text.matches('\u{FFFD}').count();
    let control = text
        .chars()
        .filter(|ch| ch.is_control() && !matches!(ch, '\n' | '\r' | '\t'))
        .count();
    replacement * 8 > total || control * 5 > total
}

/// Decodes a PDF string operand, falling back to the font's encoding label
/// (as understood by `encoding_rs`) when lopdf's own decoding looks broken.
fn decode_pdf_bytes(encoding: Option<&str>, bytes: &[u8]) -> String {
    let decoded = Document::decode_text(encoding, bytes);
    if !looks_garbled(&decoded) {
        return decoded;
    }

    if let Some(stripped) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let (text, had_errors) = UTF_16BE.decode_without_bom_handling(stripped);
        if !had_errors {
            return text.into_owned();
        }
    }

    let hinted = encoding.and_then(|label| {
        let lower = label.to_ascii_lowercase();
        if lower.contains("identity-h") || lower.contains("ucs2") || lower.contains("utf16") {
            Some(UTF_16BE)
        } else if lower.contains("big5") || lower.contains("b5") {
            Some(BIG5)
        } else {
            Encoding::for_label(lower.trim_end_matches("-h").as_bytes())
        }
    });
    if let Some(hinted) = hinted {
        let (text, _, had_errors) = hinted.decode(bytes);
        if !had_errors && !text.is_empty() {
            return text.into_owned();
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Scores a candidate page text by how table-like it reads.
fn table_likeness(text: &str) -> i64 {
    if text.trim().is_empty() {
        return i64::MIN / 4;
    }

    let mut score = 0_i64;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        score += 1;
        if classify_line(line, 2) != LineKind::Text {
            score += 50;
        }
    }
    if looks_garbled(text) {
        score -= 800;
    }
    score
}

/// Walks the page content stream and rebuilds text lines from the text
/// positioning operators.
fn text_from_content_stream(document: &Document, page_id: ObjectId) -> Option<String> {
    fn push_operands(out: &mut String, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => out.push_str(&decode_pdf_bytes(encoding, bytes)),
                Object::Array(items) => {
                    push_operands(out, encoding, items);
                    out.push(' ');
                }
                Object::Integer(offset) if *offset < TJ_GAP_THRESHOLD => out.push(' '),
                _ => {}
            }
        }
    }

    let raw = document.get_page_content(page_id).ok()?;
    let content = Content::decode(&raw).ok()?;
    let encodings: BTreeMap<Vec<u8>, &str> = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect();

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut encoding = None;
    for operation in content.operations {
        match operation.operator.as_str() {
            "Tf" => {
                encoding = operation
                    .operands
                    .first()
                    .and_then(|operand| operand.as_name().ok())
                    .and_then(|name| encodings.get(name).copied());
            }
            "Tj" | "TJ" | "'" | "\"" => push_operands(&mut current, encoding, &operation.operands),
            "T*" | "Td" | "TD" | "Tm" | "ET" => {
                if !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            _ => {}
        }
    }
    if !current.trim().is_empty() {
        lines.push(current);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Loads a PDF from memory and returns the best text reading of every page.
///
/// Each page is read three ways (pdf-extract, a content-stream walk and
/// lopdf's own extractor) and the most table-like reading wins.
pub(crate) fn read_pdf_pages(input_pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
    let document = Document::load_mem(input_pdf)?;
    if document.is_encrypted() {
        return Err(ExtractError::Encrypted);
    }

    let page_map = document.get_pages();
    if page_map.is_empty() {
        return Err(ExtractError::NoPages);
    }

    let extracted_pages = pdf_extract::extract_text_from_mem(input_pdf)
        .ok()
        .map(|text| split_text_into_pages(&text))
        .filter(|pages| pages.len() == page_map.len());
    if extracted_pages.is_none() {
        debug!("pdf-extract page split unavailable; using content streams only");
    }

    let pages = page_map
        .iter()
        .enumerate()
        .map(|(index, (&page_number, &page_id))| {
            let mut candidates = Vec::with_capacity(3);
            if let Some(text) = extracted_pages.as_ref().and_then(|pages| pages.get(index)) {
                candidates.push(text.clone());
            }
            if let Some(text) = text_from_content_stream(&document, page_id) {
                candidates.push(text);
            }
            if let Ok(text) = document.extract_text(&[page_number]) {
                candidates.push(text);
            }

            let text = candidates
                .into_iter()
                .max_by_key(|text| table_likeness(text))
                .unwrap_or_default();
            PageText { page_number, text }
        })
        .collect();

    Ok(pages)
}
