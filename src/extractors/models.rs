// src/extractors/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line item across a fixed number of periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRow {
    pub label: String,
    pub values: Vec<f64>,
    pub editable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioType {
    Ratio,
    Percentage,
    Currency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatioRow {
    #[serde(flatten)]
    pub row: FinancialRow,
    #[serde(rename = "type")]
    pub ratio_type: RatioType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFinancialData {
    pub income_statement: Vec<FinancialRow>,
    pub financial_ratios: Vec<FinancialRatioRow>,
    pub column_headers: Vec<String>,
    pub last_updated: DateTime<Utc>,
    // Where the data came from in the workbook
    pub sheet_name: String,
    pub header_row: u32,
    pub synthetic_headers: bool,
}

impl ParsedFinancialData {
    /// All extracted rows, income statement first.
    pub fn rows(&self) -> impl Iterator<Item = &FinancialRow> {
        self.income_statement
            .iter()
            .chain(self.financial_ratios.iter().map(|r| &r.row))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_row_serializes_flat_with_type() {
        let row = FinancialRatioRow {
            row: FinancialRow {
                label: "Current Ratio".to_string(),
                values: vec![1.5],
                editable: true,
            },
            ratio_type: RatioType::Ratio,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["label"], "Current Ratio");
        assert_eq!(json["type"], "ratio");
        assert_eq!(json["editable"], true);
    }

    #[test]
    fn parsed_data_uses_camel_case_keys() {
        let data = ParsedFinancialData {
            income_statement: vec![],
            financial_ratios: vec![],
            column_headers: vec!["2024".to_string()],
            last_updated: Utc::now(),
            sheet_name: "Financials".to_string(),
            header_row: 2,
            synthetic_headers: false,
        };
        let json = serde_json::to_value(&data).unwrap();
        for key in ["incomeStatement", "financialRatios", "columnHeaders", "lastUpdated"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }
}
