//! Helpers for slash-separated object keys.

/// The last path component of `key`. Empty when the key ends in `/`.
#[must_use]
pub fn base_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Splits a base name into stem and extension (including the dot).
///
/// Leading dots belong to the stem, so `.pdf` has no extension.
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(dot) => name.split_at(leading + dot),
        None => (name, ""),
    }
}

/// True when the key's base name ends in exactly `.pdf`.
#[must_use]
pub fn is_pdf_key(key: &str) -> bool {
    split_extension(base_name(key)).1 == ".pdf"
}

/// `<stem>.csv` for the base name of `key`.
#[must_use]
pub fn csv_name_for(key: &str) -> String {
    let (stem, _) = split_extension(base_name(key));
    format!("{stem}.csv")
}
