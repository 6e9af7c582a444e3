// src/extractors/diagnostics.rs
use std::fmt;
use std::sync::Mutex;

use crate::extractors::models::RatioType;

/// Section tracked while scanning rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Income,
    Ratios,
    Unknown,
}

/// A heuristic decision taken during extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    SheetSelected { name: String, matched_priority: Option<String> },
    HeaderDetected { row: u32, headers: Vec<String> },
    HeaderSynthesized { row: u32, headers: Vec<String> },
    SectionChanged { row: u32, label: String, section: Section },
    IncomeRow { row: u32, raw: String, label: String, editable: bool },
    RatioRow { row: u32, raw: String, label: String, ratio_type: RatioType, editable: bool },
    RowDropped { row: u32, label: String },
    EarlyStop { row: u32 },
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanEvent::SheetSelected { name, matched_priority: Some(p) } => {
                write!(f, "sheet '{}' selected (matches '{}')", name, p)
            }
            ScanEvent::SheetSelected { name, matched_priority: None } => {
                write!(f, "sheet '{}' selected (first sheet fallback)", name)
            }
            ScanEvent::HeaderDetected { row, headers } => {
                write!(f, "row {}: header row [{}]", row, headers.join(", "))
            }
            ScanEvent::HeaderSynthesized { row, headers } => {
                write!(f, "row {}: assumed header row, synthetic [{}]", row, headers.join(", "))
            }
            ScanEvent::SectionChanged { row, label, section } => {
                write!(f, "row {}: divider '{}' -> {:?}", row, label, section)
            }
            ScanEvent::IncomeRow { row, raw, label, editable } => {
                write!(f, "row {}: income '{}' as '{}' (editable: {})", row, raw, label, editable)
            }
            ScanEvent::RatioRow { row, raw, label, ratio_type, editable } => write!(
                f,
                "row {}: ratio '{}' as '{}' ({:?}, editable: {})",
                row, raw, label, ratio_type, editable
            ),
            ScanEvent::RowDropped { row, label } => write!(f, "row {}: dropped '{}'", row, label),
            ScanEvent::EarlyStop { row } => write!(f, "row {}: all canonical rows found, stopping", row),
        }
    }
}

/// Receives scan events from the extractor.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: ScanEvent);
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: ScanEvent) {
        tracing::debug!("{}", event);
    }
}

/// Keeps every event in memory, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ScanEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScanEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: ScanEvent) {
        tracing::trace!("{}", event);
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.record(ScanEvent::EarlyStop { row: 4 });
        sink.record(ScanEvent::RowDropped { row: 5, label: "Notes".to_string() });
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ScanEvent::EarlyStop { row: 4 });
        assert_eq!(events[1].to_string(), "row 5: dropped 'Notes'");
    }
}
