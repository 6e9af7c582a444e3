// src/workbook/mod.rs
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::utils::error::ParseError;

/// A single named sheet. Coordinates are absolute and 0-based.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    range: Range<Data>,
}

/// Read-only view of an uploaded workbook: its readable sheets in workbook order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self { name: name.into(), range }
    }

    /// Last populated (row, column), or `None` for an empty sheet.
    pub fn extent(&self) -> Option<(u32, u32)> {
        if self.range.is_empty() {
            return None;
        }
        self.range.end()
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Data> {
        self.range.get_value((row, col))
    }

    /// Text rendering of a cell, trimmed. Empty for blanks, booleans and error cells.
    pub fn text(&self, row: u32, col: u32) -> String {
        match self.cell(row, col) {
            Some(Data::String(s)) | Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => {
                s.trim().to_string()
            }
            Some(Data::Int(i)) => i.to_string(),
            Some(Data::Float(f)) => format_number(*f),
            Some(Data::DateTime(dt)) => format_number(dt.as_f64()),
            _ => String::new(),
        }
    }

    /// Numeric value of a cell. Text is coerced with [`coerce_number`]; anything else is 0.
    pub fn number(&self, row: u32, col: u32) -> f64 {
        match self.cell(row, col) {
            Some(Data::Int(i)) => *i as f64,
            Some(Data::Float(f)) if f.is_finite() => *f,
            Some(Data::DateTime(dt)) => dt.as_f64(),
            Some(Data::String(s)) => coerce_number(s),
            _ => 0.0,
        }
    }
}

impl Workbook {
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Decodes workbook bytes in any format calamine understands.
    ///
    /// Sheets that fail to load are skipped; a workbook left with no sheets is an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| ParseError::Unreadable(e.to_string()))?;

        let mut sheets = Vec::new();
        for name in reader.sheet_names() {
            match reader.worksheet_range(&name) {
                Ok(range) => sheets.push(Sheet::new(name, range)),
                Err(e) => tracing::warn!("Skipping unreadable sheet '{}': {}", name, e),
            }
        }

        if sheets.is_empty() {
            return Err(ParseError::NoSheets);
        }
        tracing::debug!("Loaded workbook with {} sheet(s)", sheets.len());
        Ok(Self { sheets })
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Lenient number parsing for text cells: strips commas and whitespace, then reads the
/// leading decimal literal. Returns 0 when there is none.
pub fn coerce_number(raw: &str) -> f64 {
    use once_cell::sync::Lazy;
    use regex::Regex;

    static LEADING_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("Failed to compile LEADING_NUMBER_RE")
    });

    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    LEADING_NUMBER_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
