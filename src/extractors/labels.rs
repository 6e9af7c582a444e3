// src/extractors/labels.rs
use std::cmp::Reverse;

use crate::extractors::models::RatioType;

pub const INCOME_STATEMENT_LABELS: [&str; 11] = [
    "Revenue",
    "Cost of sales",
    "Gross Profit",
    "Administrative expenses",
    "Other Operating Expenses (Excl depreciation & amortisation)",
    "Salaries & Staff Cost",
    "EBITDA",
    "Interest Income",
    "Finances Cost",
    "Depreciation & Amortisation",
    "Profit before tax",
];

pub const FINANCIAL_RATIO_LABELS: [&str; 12] = [
    "Return on Equity (ROE)",
    "Debt Equity Ratio (Total liabilities)",
    "Current Ratio",
    "Acid Test Ratio (Quick Ratio)",
    "Equity Investment Value",
    "Return on Investment (ROI)",
    "Sales Growth",
    "Gross profit margin",
    "Cost to Income ratio",
    "Operating margin (EBITDA)",
    "Interest Cover Ratio",
    "Net Operating Profit Margin",
];

// Derived from other lines, so not user-entered
const COMPUTED_INCOME_LABELS: [&str; 3] = ["Gross Profit", "EBITDA", "Profit before tax"];

const COMPUTED_RATIO_LABELS: [&str; 8] = [
    "Return on Equity (ROE)",
    "Return on Investment (ROI)",
    "Sales Growth",
    "Gross profit margin",
    "Cost to Income ratio",
    "Operating margin (EBITDA)",
    "Interest Cover Ratio",
    "Net Operating Profit Margin",
];

/// Strength of a fuzzy match. Exact beats containment; among containments, more shared text
/// wins, then fewer unmatched characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStrength {
    Contained(usize, Reverse<usize>),
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatch {
    pub canonical: &'static str,
    pub strength: MatchStrength,
}

/// Lowercase, alphanumeric-only form of a label.
pub fn normalize(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Bidirectional containment on normalized text. Labels that normalize to nothing never match.
pub fn fuzzy_match(label: &str, canonical: &str) -> Option<MatchStrength> {
    let a = normalize(label);
    let b = normalize(canonical);
    if a.is_empty() || b.is_empty() {
        return None;
    }
    if a == b {
        Some(MatchStrength::Exact)
    } else if a.contains(&b) || b.contains(&a) {
        let shared = a.len().min(b.len());
        let excess = a.len().max(b.len()) - shared;
        Some(MatchStrength::Contained(shared, Reverse(excess)))
    } else {
        None
    }
}

/// Strongest canonical match in `bank`; the earliest label wins ties.
pub fn best_match(label: &str, bank: &[&'static str]) -> Option<LabelMatch> {
    let mut best: Option<LabelMatch> = None;
    for &canonical in bank {
        if let Some(strength) = fuzzy_match(label, canonical) {
            if best.map_or(true, |b| strength > b.strength) {
                best = Some(LabelMatch { canonical, strength });
            }
        }
    }
    best
}

pub fn match_income_label(label: &str) -> Option<LabelMatch> {
    best_match(label, &INCOME_STATEMENT_LABELS)
}

pub fn match_ratio_label(label: &str) -> Option<LabelMatch> {
    best_match(label, &FINANCIAL_RATIO_LABELS)
}

const CURRENCY_RATIO_KEYWORD: &str = "Equity Investment Value";
const PERCENTAGE_RATIO_KEYWORDS: [&str; 4] = ["margin", "Growth", "ROE", "ROI"];

/// How a ratio line's values are interpreted. Keywords are matched case-sensitively.
pub fn ratio_type(label: &str) -> RatioType {
    if label.contains(CURRENCY_RATIO_KEYWORD) {
        RatioType::Currency
    } else if PERCENTAGE_RATIO_KEYWORDS.iter().any(|k| label.contains(*k)) {
        RatioType::Percentage
    } else {
        RatioType::Ratio
    }
}

pub fn is_income_editable(label: &str) -> bool {
    !COMPUTED_INCOME_LABELS.contains(&label)
}

pub fn is_ratio_editable(label: &str) -> bool {
    !COMPUTED_RATIO_LABELS.contains(&label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Salaries & Staff Cost"), "salariesstaffcost");
        assert_eq!(normalize("  Return on Equity (ROE) "), "returnonequityroe");
        assert_eq!(normalize("%"), "");
    }

    #[test]
    fn fuzzy_match_is_bidirectional() {
        assert_eq!(fuzzy_match("revenue", "Revenue"), Some(MatchStrength::Exact));
        assert_eq!(
            fuzzy_match("Total Revenue (ZAR)", "Revenue"),
            Some(MatchStrength::Contained(7, Reverse(8)))
        );
        assert_eq!(
            fuzzy_match("Depreciation", "Depreciation & Amortisation"),
            Some(MatchStrength::Contained(12, Reverse(12)))
        );
        assert_eq!(fuzzy_match("Dividends", "Revenue"), None);
        assert_eq!(fuzzy_match("--", "Revenue"), None);
    }

    #[test]
    fn gross_profit_margin_prefers_longer_ratio_label() {
        let income = match_income_label("Gross profit margin %").unwrap();
        let ratio = match_ratio_label("Gross profit margin %").unwrap();
        assert_eq!(income.canonical, "Gross Profit");
        assert_eq!(ratio.canonical, "Gross profit margin");
        assert!(ratio.strength > income.strength);
    }

    #[test]
    fn containment_ties_prefer_the_closer_label() {
        let m = match_income_label("Depreciation").unwrap();
        assert_eq!(m.canonical, "Depreciation & Amortisation");
    }

    #[test]
    fn exact_ebitda_beats_operating_margin() {
        let income = match_income_label("EBITDA").unwrap();
        let ratio = match_ratio_label("EBITDA").unwrap();
        assert_eq!(income.strength, MatchStrength::Exact);
        assert_eq!(ratio.canonical, "Operating margin (EBITDA)");
        assert!(income.strength > ratio.strength);
    }

    #[test]
    fn ratio_types_follow_label_keywords() {
        assert_eq!(ratio_type("Equity Investment Value"), RatioType::Currency);
        assert_eq!(ratio_type("Gross profit margin"), RatioType::Percentage);
        assert_eq!(ratio_type("Operating margin (EBITDA)"), RatioType::Percentage);
        assert_eq!(ratio_type("Net Operating Profit Margin"), RatioType::Ratio);
        assert_eq!(ratio_type("EBIT MARGIN"), RatioType::Ratio);
        assert_eq!(ratio_type("sales growth"), RatioType::Ratio);
        assert_eq!(ratio_type("Sales Growth"), RatioType::Percentage);
        assert_eq!(ratio_type("Return on Equity (ROE)"), RatioType::Percentage);
        assert_eq!(ratio_type("Return on Investment (ROI)"), RatioType::Percentage);
        assert_eq!(ratio_type("Current Ratio"), RatioType::Ratio);
        assert_eq!(ratio_type("Interest Cover Ratio"), RatioType::Ratio);
    }

    #[test]
    fn computed_lines_are_not_editable() {
        assert!(!is_income_editable("EBITDA"));
        assert!(!is_income_editable("Gross Profit"));
        assert!(is_income_editable("Revenue"));
        assert!(!is_ratio_editable("Interest Cover Ratio"));
        assert!(is_ratio_editable("Current Ratio"));
        assert!(is_ratio_editable("Equity Investment Value"));
        assert_eq!(
            FINANCIAL_RATIO_LABELS.iter().filter(|l| !is_ratio_editable(l)).count(),
            8
        );
    }
}
