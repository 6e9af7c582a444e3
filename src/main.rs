// src/main.rs
mod extractors;
mod source;
mod storage;
mod utils;
mod workbook;

use std::sync::Arc;

use clap::Parser;
use extractors::config::ExtractorConfig;
use extractors::diagnostics::{DiagnosticSink, MemorySink, TracingSink};
use extractors::progress::ParseProgress;
use extractors::{FinancialStatementExtractor, ParseValidation};
use storage::StorageManager;
use utils::error::ParseError;
use utils::AppError;

/// Extracts income statement and financial ratio tables from an SME financial workbook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workbook to parse: a local path or an http(s) URL
    #[arg(short, long)]
    input: String,

    /// Output directory for extracted tables
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Debug mode - save a scan trace of every heuristic decision
    #[arg(short, long)]
    debug: bool,

    /// Print the parsed tables as JSON to stdout
    #[arg(long)]
    print: bool,

    /// Row assumed to hold period headers when none is detected (template specific)
    #[arg(long, env = "KAPIFY_FALLBACK_HEADER_ROW", default_value_t = extractors::config::FALLBACK_HEADER_ROW)]
    fallback_header_row: u32,

    /// Maximum number of rows scanned
    #[arg(long, env = "KAPIFY_MAX_ROWS", default_value_t = extractors::config::MAX_ROWS_TO_SCAN)]
    max_rows: u32,

    /// Maximum number of columns scanned
    #[arg(long, env = "KAPIFY_MAX_COLUMNS", default_value_t = extractors::config::MAX_COLUMNS_TO_SCAN)]
    max_columns: u32,
}

impl Args {
    fn extractor_config(&self) -> Result<ExtractorConfig, AppError> {
        if self.max_rows == 0 || self.max_columns < 2 {
            return Err(AppError::Config(format!(
                "Scan bounds too small: {} row(s), {} column(s)",
                self.max_rows, self.max_columns
            )));
        }
        Ok(ExtractorConfig {
            fallback_header_row: self.fallback_header_row,
            max_rows_to_scan: self.max_rows,
            max_columns_to_scan: self.max_columns,
            ..ExtractorConfig::default()
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);
    let config = args.extractor_config()?;

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;
    let stem = storage::output_stem(&args.input);

    // 4. Initialize the extractor; debug mode keeps every scan event for the trace file
    let memory = args.debug.then(|| Arc::new(MemorySink::new()));
    let sink: Arc<dyn DiagnosticSink> = match &memory {
        Some(memory) => memory.clone() as Arc<dyn DiagnosticSink>,
        None => Arc::new(TracingSink),
    };
    let extractor = FinancialStatementExtractor::with_config(config, sink);
    tracing::debug!("Extractor config: {:?}", extractor.config());

    // 5. Load the workbook bytes
    let bytes = source::load_workbook_bytes(&args.input).await?;
    tracing::info!("Loaded workbook ({} bytes)", bytes.len());

    // 6. Parse
    let listener = |progress: ParseProgress| {
        tracing::info!("[{:>3}%] {}: {}", progress.percent, progress.stage, progress.message);
    };
    let result = extractor.parse_with_validation(&bytes, Some(&listener));

    // 7. Save the scan trace before surfacing any failure
    if let Some(memory) = &memory {
        let validation = match &result {
            Ok((_, validation)) => Some(validation.clone()),
            Err(ParseError::Validation { errors, warnings }) => Some(ParseValidation {
                is_valid: false,
                errors: errors.clone(),
                warnings: warnings.clone(),
            }),
            Err(_) => None,
        };
        let trace_path = storage.target_dir(&stem)?.join("scan_trace.txt");
        if let Err(e) = utils::scan_debug::save_scan_trace(&trace_path, &args.input, &memory.events(), validation.as_ref()) {
            tracing::warn!("Failed to save scan trace: {}", e);
        }
    }

    let (data, validation) = result?;
    for warning in &validation.warnings {
        eprintln!("warning: {}", warning);
    }

    // 8. Persist results
    storage.save_financials(&stem, &data)?;
    storage.save_metadata(&stem, &args.input, &data, &validation)?;

    if args.print {
        println!("{}", storage::render_financials(&data)?);
    }

    tracing::info!(
        "Processing finished: {} income statement row(s), {} ratio row(s), {} warning(s)",
        data.income_statement.len(),
        data.financial_ratios.len(),
        validation.warnings.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_build_extractor_config() {
        let args = Args::parse_from([
            "kapify_financials",
            "--input",
            "upload.xlsx",
            "--fallback-header-row",
            "5",
            "--max-rows",
            "80",
        ]);
        let config = args.extractor_config().unwrap();
        assert_eq!(config.fallback_header_row, 5);
        assert_eq!(config.max_rows_to_scan, 80);
        assert_eq!(config.max_columns_to_scan, 15);
        assert_eq!(config.expected_column_count, 9);
    }

    #[test]
    fn zero_row_bound_is_rejected() {
        let args = Args::parse_from(["kapify_financials", "-i", "a.xlsx", "--max-rows", "0"]);
        assert!(matches!(args.extractor_config(), Err(AppError::Config(_))));
    }
}
