// src/extractors/financial.rs

// --- Imports ---
use std::sync::Arc;

use chrono::{Datelike, Utc};

use crate::extractors::config::ExtractorConfig;
use crate::extractors::diagnostics::{DiagnosticSink, ScanEvent, Section, TracingSink};
use crate::extractors::labels::{
    self, is_income_editable, is_ratio_editable, match_income_label, match_ratio_label,
};
use crate::extractors::models::{
    FinancialRatioRow, FinancialRow, ParseValidation, ParsedFinancialData,
};
use crate::extractors::periods::{detect_header_row, synthetic_headers, HeaderRow};
use crate::extractors::progress::{report, ParseStage, ProgressListener};
use crate::extractors::validation::validate;
use crate::utils::error::ParseError;
use crate::workbook::{Sheet, Workbook};

/// Where the period headers and data sit on the chosen sheet.
struct SheetLayout<'a> {
    sheet: &'a Sheet,
    header: HeaderRow,
    synthetic: bool,
    max_row: u32,
    max_col: u32,
}

/// Extracts income-statement and ratio tables from an uploaded workbook.
///
/// Holds no per-parse state; one instance can serve any number of concurrent parses.
pub struct FinancialStatementExtractor {
    config: ExtractorConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for FinancialStatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FinancialStatementExtractor {
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default(), Arc::new(TracingSink))
    }

    pub fn with_config(config: ExtractorConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parses workbook bytes into validated financial tables.
    ///
    /// Fails when the bytes are not a workbook, when it has no readable sheet, or when
    /// validation finds no usable numeric data. Coverage problems are logged as warnings.
    pub fn parse(
        &self,
        bytes: &[u8],
        listener: Option<&dyn ProgressListener>,
    ) -> Result<ParsedFinancialData, ParseError> {
        self.parse_with_validation(bytes, listener).map(|(data, _)| data)
    }

    /// Same as [`parse`](Self::parse), also returning the (valid) validation report.
    pub fn parse_with_validation(
        &self,
        bytes: &[u8],
        listener: Option<&dyn ProgressListener>,
    ) -> Result<(ParsedFinancialData, ParseValidation), ParseError> {
        report(listener, ParseStage::Reading, "Reading workbook");
        let workbook = Workbook::from_bytes(bytes)?;
        self.parse_workbook(&workbook, listener)
    }

    /// Parses an already-decoded workbook.
    pub fn parse_workbook(
        &self,
        workbook: &Workbook,
        listener: Option<&dyn ProgressListener>,
    ) -> Result<(ParsedFinancialData, ParseValidation), ParseError> {
        report(listener, ParseStage::Parsing, "Locating financial sheet");
        let layout = self.locate(workbook)?;

        report(listener, ParseStage::Extracting, format!("Extracting rows from '{}'", layout.sheet.name));
        let data = self.scan_rows(&layout);

        report(listener, ParseStage::Validating, "Validating extracted data");
        let validation = validate(&data, &self.config);
        if !validation.is_valid {
            tracing::error!("Validation failed for sheet '{}': {:?}", data.sheet_name, validation.errors);
            return Err(ParseError::Validation {
                errors: validation.errors,
                warnings: validation.warnings,
            });
        }
        for warning in &validation.warnings {
            tracing::warn!("{}", warning);
        }

        tracing::info!(
            "Extracted {} income statement and {} ratio row(s) from '{}'",
            data.income_statement.len(),
            data.financial_ratios.len(),
            data.sheet_name
        );
        report(listener, ParseStage::Complete, "Parse complete");
        Ok((data, validation))
    }

    /// Runs sheet selection, header detection and row extraction without validating.
    pub fn extract(&self, workbook: &Workbook) -> Result<ParsedFinancialData, ParseError> {
        let layout = self.locate(workbook)?;
        Ok(self.scan_rows(&layout))
    }

    /// First sheet whose name contains a priority name, in priority order; else the first sheet.
    pub fn select_sheet<'a>(&self, workbook: &'a Workbook) -> Option<(&'a Sheet, Option<&str>)> {
        for wanted in &self.config.sheet_priority {
            let wanted_lower = wanted.to_lowercase();
            if let Some(sheet) = workbook
                .sheets()
                .iter()
                .find(|s| s.name.to_lowercase().contains(&wanted_lower))
            {
                return Some((sheet, Some(wanted.as_str())));
            }
        }
        workbook.sheets().first().map(|sheet| (sheet, None))
    }

    fn locate<'a>(&self, workbook: &'a Workbook) -> Result<SheetLayout<'a>, ParseError> {
        let (sheet, matched) = self.select_sheet(workbook).ok_or(ParseError::NoSheets)?;
        self.sink.record(ScanEvent::SheetSelected {
            name: sheet.name.clone(),
            matched_priority: matched.map(str::to_string),
        });

        let (max_row, max_col) = self.config.scan_bounds(sheet.extent().unwrap_or((0, 0)));
        tracing::debug!("Scanning '{}' up to row {} and column {}", sheet.name, max_row, max_col);

        let (header, synthetic) = match detect_header_row(sheet, &self.config, max_row, max_col) {
            Some(header) => {
                self.sink.record(ScanEvent::HeaderDetected {
                    row: header.row,
                    headers: header.headers.clone(),
                });
                (header, false)
            }
            None => {
                let header = HeaderRow {
                    row: self.config.fallback_header_row,
                    headers: synthetic_headers(Utc::now().year(), self.config.synthetic_header_count),
                };
                tracing::warn!(
                    "No header row found on '{}', assuming row {} with synthetic periods",
                    sheet.name,
                    header.row
                );
                self.sink.record(ScanEvent::HeaderSynthesized {
                    row: header.row,
                    headers: header.headers.clone(),
                });
                (header, true)
            }
        };

        Ok(SheetLayout { sheet, header, synthetic, max_row, max_col })
    }

    fn scan_rows(&self, layout: &SheetLayout<'_>) -> ParsedFinancialData {
        let sheet = layout.sheet;
        let mut income_statement: Vec<FinancialRow> = Vec::new();
        let mut financial_ratios: Vec<FinancialRatioRow> = Vec::new();
        let mut section = Section::Unknown;

        for row in layout.header.row.saturating_add(1)..=layout.max_row {
            let raw = sheet.text(row, 0);
            if raw.is_empty() {
                continue;
            }

            if let Some(next) = divider_section(&raw, section) {
                section = next;
                self.sink.record(ScanEvent::SectionChanged { row, label: raw, section });
                continue;
            }

            let values = self.extract_values(sheet, row, layout.max_col);
            let income = match_income_label(&raw);
            let ratio = match_ratio_label(&raw);
            // A longer ratio label such as "Gross profit margin" outranks its income prefix
            let ratio_preferred = matches!((income, ratio), (Some(i), Some(r)) if r.strength > i.strength);

            if !ratio_preferred && (income.is_some() || section == Section::Income) {
                let label = income.map_or_else(|| raw.clone(), |m| m.canonical.to_string());
                let editable = is_income_editable(&label);
                self.sink.record(ScanEvent::IncomeRow { row, raw, label: label.clone(), editable });
                income_statement.push(FinancialRow { label, values, editable });
            } else if ratio.is_some() || section == Section::Ratios {
                let label = ratio.map_or_else(|| raw.clone(), |m| m.canonical.to_string());
                let ratio_type = labels::ratio_type(&label);
                let editable = is_ratio_editable(&label);
                self.sink.record(ScanEvent::RatioRow {
                    row,
                    raw,
                    label: label.clone(),
                    ratio_type,
                    editable,
                });
                financial_ratios.push(FinancialRatioRow {
                    row: FinancialRow { label, values, editable },
                    ratio_type,
                });
            } else {
                self.sink.record(ScanEvent::RowDropped { row, label: raw });
                continue;
            }

            if income_statement.len() >= labels::INCOME_STATEMENT_LABELS.len()
                && financial_ratios.len() >= labels::FINANCIAL_RATIO_LABELS.len()
            {
                self.sink.record(ScanEvent::EarlyStop { row });
                break;
            }
        }

        ParsedFinancialData {
            income_statement,
            financial_ratios,
            column_headers: layout.header.headers.clone(),
            last_updated: Utc::now(),
            sheet_name: sheet.name.clone(),
            header_row: layout.header.row,
            synthetic_headers: layout.synthetic,
        }
    }

    /// Reads the period values to the right of the label, padded or cut to the expected width.
    fn extract_values(&self, sheet: &Sheet, row: u32, max_col: u32) -> Vec<f64> {
        let width = self.config.expected_column_count;
        let mut values: Vec<f64> = (1..=max_col)
            .take(width)
            .map(|col| sheet.number(row, col))
            .collect();
        values.resize(width, 0.0);
        values
    }
}

/// Section announced by a divider row, or `None` when the row is not a divider.
/// "Amounts in ..." captions are dividers that keep the current section.
fn divider_section(label: &str, current: Section) -> Option<Section> {
    let lower = label.to_lowercase();
    if lower.contains("income statement") {
        Some(Section::Income)
    } else if lower.contains("financial ratio") {
        Some(Section::Ratios)
    } else if lower.contains("amounts in") {
        Some(current)
    } else {
        None
    }
}
