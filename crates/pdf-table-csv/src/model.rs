/// Text recovered from a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// One detected table area, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion {
    pub page: u32,
    pub rows: Vec<Vec<String>>,
}

impl TableRegion {
    #[must_use]
    pub fn new(page: u32, rows: Vec<Vec<String>>) -> Self {
        Self { page, rows }
    }
}
