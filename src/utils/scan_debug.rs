// src/utils/scan_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::extractors::diagnostics::ScanEvent;
use crate::extractors::models::ParseValidation;
use crate::utils::error::AppError;

/// Renders scan events as a plain-text trace, one decision per line.
pub fn render_scan_trace(source: &str, events: &[ScanEvent], validation: Option<&ParseValidation>) -> String {
    let mut trace = format!("# Scan trace for {}\n", source);
    trace.push_str(&format!("# {} event(s)\n\n", events.len()));

    for event in events {
        trace.push_str(&event.to_string());
        trace.push('\n');
    }

    if let Some(validation) = validation {
        trace.push_str(&format!("\nvalid: {}\n", validation.is_valid));
        for error in &validation.errors {
            trace.push_str(&format!("error: {}\n", error));
        }
        for warning in &validation.warnings {
            trace.push_str(&format!("warning: {}\n", warning));
        }
    }
    trace
}

/// Saves the scan trace to `filename`
pub fn save_scan_trace(
    filename: &Path,
    source: &str,
    events: &[ScanEvent],
    validation: Option<&ParseValidation>,
) -> Result<(), AppError> {
    let mut file = File::create(filename)?;
    file.write_all(render_scan_trace(source, events, validation).as_bytes())?;

    tracing::info!("Saved scan trace to {}", filename.display());
    Ok(())
}
