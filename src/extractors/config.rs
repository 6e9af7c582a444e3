// src/extractors/config.rs

pub const EXPECTED_COLUMN_COUNT: usize = 9;
pub const MAX_COLUMNS_TO_SCAN: u32 = 15;
pub const MAX_ROWS_TO_SCAN: u32 = 150;

/// Header detection only looks at rows `0..=HEADER_SEARCH_LAST_ROW`.
pub const HEADER_SEARCH_LAST_ROW: u32 = 5;
pub const MIN_PERIOD_MATCHES: usize = 3;

/// Row assumed to hold the headers when none is detected. This is the header position of the
/// standard funder template and is not derived from sheet content; override it per template.
pub const FALLBACK_HEADER_ROW: u32 = 3;
pub const SYNTHETIC_HEADER_COUNT: usize = 8;

pub const SHEET_PRIORITY: [&str; 4] = [
    "Financial Analysis",
    "F. Ratios",
    "Financials",
    "Income Statement",
];

/// Tunables for a single extraction.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub expected_column_count: usize,
    pub max_rows_to_scan: u32,
    pub max_columns_to_scan: u32,
    pub header_search_last_row: u32,
    pub min_period_matches: usize,
    pub fallback_header_row: u32,
    pub synthetic_header_count: usize,
    pub sheet_priority: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            expected_column_count: EXPECTED_COLUMN_COUNT,
            max_rows_to_scan: MAX_ROWS_TO_SCAN,
            max_columns_to_scan: MAX_COLUMNS_TO_SCAN,
            header_search_last_row: HEADER_SEARCH_LAST_ROW,
            min_period_matches: MIN_PERIOD_MATCHES,
            fallback_header_row: FALLBACK_HEADER_ROW,
            synthetic_header_count: SYNTHETIC_HEADER_COUNT,
            sheet_priority: SHEET_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExtractorConfig {
    /// Last row and column index (inclusive) to scan for a sheet whose extent is `extent`.
    pub fn scan_bounds(&self, extent: (u32, u32)) -> (u32, u32) {
        let max_row = extent.0.min(self.max_rows_to_scan.saturating_sub(1));
        let max_col = extent.1.min(self.max_columns_to_scan.saturating_sub(1));
        (max_row, max_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_bounds_clamp_large_sheets() {
        let config = ExtractorConfig::default();
        assert_eq!(config.scan_bounds((10_000, 400)), (149, 14));
        assert_eq!(config.scan_bounds((20, 6)), (20, 6));
    }

    #[test]
    fn defaults_match_constants() {
        let config = ExtractorConfig::default();
        assert_eq!(config.expected_column_count, 9);
        assert_eq!(config.fallback_header_row, 3);
        assert_eq!(config.sheet_priority[0], "Financial Analysis");
    }
}
