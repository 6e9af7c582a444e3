// src/extractors/periods.rs
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::config::ExtractorConfig;
use crate::workbook::Sheet;

// --- Period Patterns (Lazy Static) ---
static PERIOD_TEXT_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Plain or fiscal year: 2023, FY2023
        r"(?i)^(?:FY\s*)?\d{4}$",
        // Split financial year: 2023/24, 2023-24, 2023/2024
        r"^\d{4}\s*[/-]\s*(?:\d{2}|\d{4})$",
        // Relative periods: Y, Y-1, Y+2, P+1
        r"(?i)^[YP](?:\s*[-+]\s*\d{1,2})?$",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

/// Whether a header cell looks like a time period.
pub fn is_period_label(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && PERIOD_TEXT_RE.iter().any(|re| re.is_match(text))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
    pub row: u32,
    pub headers: Vec<String>,
}

/// Finds the first row near the top of the sheet with enough period-like cells.
///
/// Column 0 holds line-item labels and is ignored. Only matching cells become headers.
pub fn detect_header_row(
    sheet: &Sheet,
    config: &ExtractorConfig,
    max_row: u32,
    max_col: u32,
) -> Option<HeaderRow> {
    let last_row = config.header_search_last_row.min(max_row);

    for row in 0..=last_row {
        let periods: Vec<String> = (1..=max_col)
            .map(|col| sheet.text(row, col))
            .filter(|text| !text.is_empty())
            .filter(|text| is_period_label(text))
            .collect();

        tracing::trace!("Row {} has {} period-like cell(s)", row, periods.len());
        if periods.len() >= config.min_period_matches {
            let headers = periods
                .into_iter()
                .take(config.expected_column_count)
                .collect();
            return Some(HeaderRow { row, headers });
        }
    }
    None
}

/// Sequential years centred on `current_year`, e.g. 2021..=2028 for 2025 and a count of 8.
pub fn synthetic_headers(current_year: i32, count: usize) -> Vec<String> {
    let start = current_year - (count / 2) as i32;
    (0..count as i32).map(|i| (start + i).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::fixtures::{sheet, C};

    #[test]
    fn recognises_period_formats() {
        for text in ["2023", "FY2024", "2021/22", "2022-23", "2023/2024", "Y", "Y-1", "Y+2", "P+1", "p - 3"] {
            assert!(is_period_label(text), "{} should be a period", text);
        }
        for text in ["Revenue", "23", "20234", "2023/2", "Year", "Y-123", ""] {
            assert!(!is_period_label(text), "{} should not be a period", text);
        }
    }

    #[test]
    fn detects_split_year_header_row() {
        let s = sheet(
            "Financials",
            &[
                vec![C::S("Company X")],
                vec![C::S("Amounts in ZAR")],
                vec![C::E, C::S("2021/22"), C::S("2022/23"), C::S("2023/24"), C::S("2024/25")],
                vec![C::S("Revenue"), C::N(1.0), C::N(2.0), C::N(3.0), C::N(4.0)],
            ],
        );
        let config = ExtractorConfig::default();
        let header = detect_header_row(&s, &config, 3, 4).unwrap();
        assert_eq!(header.row, 2);
        assert_eq!(header.headers, vec!["2021/22", "2022/23", "2023/24", "2024/25"]);
    }

    #[test]
    fn numeric_years_count_as_periods() {
        let s = sheet(
            "S",
            &[vec![C::S("Line item"), C::N(2022.0), C::N(2023.0), C::N(2024.0)]],
        );
        let header = detect_header_row(&s, &ExtractorConfig::default(), 0, 3).unwrap();
        assert_eq!(header.headers, vec!["2022", "2023", "2024"]);
    }

    #[test]
    fn year_in_label_column_is_ignored() {
        let s = sheet("S", &[vec![C::S("2020"), C::S("2021"), C::S("2022")]]);
        assert!(detect_header_row(&s, &ExtractorConfig::default(), 0, 2).is_none());
    }

    #[test]
    fn header_rows_are_capped_to_expected_columns() {
        let row: Vec<C> = std::iter::once(C::E)
            .chain((0..12).map(|_| C::S("2020")))
            .collect();
        let s = sheet("S", &[row]);
        let header = detect_header_row(&s, &ExtractorConfig::default(), 0, 12).unwrap();
        assert_eq!(header.headers.len(), 9);
    }

    #[test]
    fn rows_below_search_window_are_not_considered() {
        let mut rows: Vec<Vec<C>> = (0..6).map(|_| vec![C::S("filler")]).collect();
        rows.push(vec![C::E, C::S("2021"), C::S("2022"), C::S("2023")]);
        let s = sheet("S", &rows);
        assert!(detect_header_row(&s, &ExtractorConfig::default(), 6, 3).is_none());
    }

    #[test]
    fn synthetic_headers_centre_on_current_year() {
        assert_eq!(
            synthetic_headers(2025, 8),
            vec!["2021", "2022", "2023", "2024", "2025", "2026", "2027", "2028"]
        );
    }
}
