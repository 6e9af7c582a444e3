// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use crate::extractors::models::{ParseValidation, ParsedFinancialData};
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory for one upload: /base_dir/<stem>/
    pub fn target_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(stem);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the parsed tables as JSON
    pub fn save_financials(&self, stem: &str, data: &ParsedFinancialData) -> Result<PathBuf, StorageError> {
        let file_path = self.target_dir(stem)?.join(format!("{}_financials.json", stem));

        let json = render_financials(data)?;
        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved financials to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves metadata about the extraction in JSON format
    pub fn save_metadata(
        &self,
        stem: &str,
        source: &str,
        data: &ParsedFinancialData,
        validation: &ParseValidation,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.target_dir(stem)?.join(format!("{}_financials_meta.json", stem));

        let metadata = serde_json::json!({
            "source": source,
            "sheet_name": data.sheet_name,
            "header_row": data.header_row,
            "synthetic_headers": data.synthetic_headers,
            "column_headers": data.column_headers,
            "income_statement_rows": data.income_statement.len(),
            "financial_ratio_rows": data.financial_ratios.len(),
            "warnings": validation.warnings,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }
}

/// Pretty JSON rendering of the parsed tables, as saved and as printed by `--print`.
pub fn render_financials(data: &ParsedFinancialData) -> Result<String, StorageError> {
    serde_json::to_string_pretty(data).map_err(|e| StorageError::SerializationError(e.to_string()))
}

/// File stem used to group outputs for an input path or URL.
pub fn output_stem(input: &str) -> String {
    let last = input
        .trim_end_matches('/')
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(input);
    let last = last.split(|c: char| c == '?' || c == '#').next().unwrap_or(last);
    let stem = Path::new(last)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
