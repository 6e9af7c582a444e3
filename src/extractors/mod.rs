// src/extractors/mod.rs
pub mod config;
pub mod diagnostics;
pub mod financial;
pub mod labels;
pub mod models;
pub mod periods;
pub mod progress;
pub mod validation;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use financial::FinancialStatementExtractor;
#[allow(unused_imports)]
pub use models::{FinancialRatioRow, FinancialRow, ParseValidation, ParsedFinancialData, RatioType};
#[allow(unused_imports)]
pub use validation::validate;
