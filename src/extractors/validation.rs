// src/extractors/validation.rs
use crate::extractors::config::ExtractorConfig;
use crate::extractors::labels::{FINANCIAL_RATIO_LABELS, INCOME_STATEMENT_LABELS};
use crate::extractors::models::{ParseValidation, ParsedFinancialData};

/// More missing canonical rows than this in one bank produces a warning.
const MAX_MISSING_BEFORE_WARNING: usize = 3;

/// Checks a parse result for usable data and canonical coverage.
///
/// Only an all-zero (or empty) extraction is an error; everything else is advisory.
/// The period count is checked against the same config the extraction ran with.
pub fn validate(data: &ParsedFinancialData, config: &ExtractorConfig) -> ParseValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let income_labels: Vec<&str> = data.income_statement.iter().map(|r| r.label.as_str()).collect();
    let ratio_labels: Vec<&str> = data.financial_ratios.iter().map(|r| r.row.label.as_str()).collect();

    if let Some(warning) = coverage_warning("income statement", &INCOME_STATEMENT_LABELS, &income_labels) {
        warnings.push(warning);
    }
    if let Some(warning) = coverage_warning("financial ratio", &FINANCIAL_RATIO_LABELS, &ratio_labels) {
        warnings.push(warning);
    }

    let has_data = data.rows().any(|row| row.values.iter().any(|v| *v != 0.0));
    if !has_data {
        errors.push(format!(
            "No usable numeric data found ({} income statement and {} ratio row(s), all values zero)",
            data.income_statement.len(),
            data.financial_ratios.len()
        ));
    }

    if data.column_headers.len() != config.expected_column_count {
        warnings.push(format!(
            "Expected {} period columns, found {}",
            config.expected_column_count,
            data.column_headers.len()
        ));
    }

    ParseValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn coverage_warning(bank_name: &str, bank: &[&str], found: &[&str]) -> Option<String> {
    let missing: Vec<&str> = bank
        .iter()
        .copied()
        .filter(|canonical| !found.contains(canonical))
        .collect();
    if missing.len() <= MAX_MISSING_BEFORE_WARNING {
        return None;
    }

    let present = bank.len() - missing.len();
    let pct = present as f64 / bank.len() as f64 * 100.0;
    Some(format!(
        "Missing {} {} row(s), coverage {}/{} ({:.0}%): {}",
        missing.len(),
        bank_name,
        present,
        bank.len(),
        pct,
        missing.join(", ")
    ))
}
