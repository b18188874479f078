use crate::error::ExtractError;

/// How many leading rows to drop from each detected region before the
/// regions are concatenated.
///
/// Tables that run across pages repeat their header on every continuation
/// page, followed by one more row that carries no data. The first region
/// keeps its header by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationRule {
    pub first_region_skip: usize,
    pub continuation_skip: usize,
}

impl ContinuationRule {
    #[must_use]
    pub const fn new(first_region_skip: usize, continuation_skip: usize) -> Self {
        Self {
            first_region_skip,
            continuation_skip,
        }
    }

    /// Rows to drop from the region at `index` (0-based, in detection order).
    #[must_use]
    pub const fn skip_for(self, index: usize) -> usize {
        if index == 0 {
            self.first_region_skip
        } else {
            self.continuation_skip
        }
    }
}

impl Default for ContinuationRule {
    fn default() -> Self {
        Self::new(0, 2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Minimum cells a line needs to count as a table row.
    pub min_cols: usize,
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.min_cols < 2 {
            return Err(ExtractError::InvalidOption(
                "min_cols must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { min_cols: 2 }
    }
}
