// src/extractors/progress.rs
use std::fmt;

/// Fixed checkpoints reported while parsing an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    Reading,
    Parsing,
    Extracting,
    Validating,
    Complete,
}

impl ParseStage {
    pub fn percent(self) -> u8 {
        match self {
            ParseStage::Reading => 10,
            ParseStage::Parsing => 30,
            ParseStage::Extracting => 50,
            ParseStage::Validating => 80,
            ParseStage::Complete => 100,
        }
    }
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseStage::Reading => "reading",
            ParseStage::Parsing => "parsing",
            ParseStage::Extracting => "extracting",
            ParseStage::Validating => "validating",
            ParseStage::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProgress {
    pub stage: ParseStage,
    pub percent: u8,
    pub message: String,
}

/// Fire-and-forget observer for parse progress.
pub trait ProgressListener {
    fn on_progress(&self, progress: ParseProgress);
}

impl<F> ProgressListener for F
where
    F: Fn(ParseProgress),
{
    fn on_progress(&self, progress: ParseProgress) {
        self(progress)
    }
}

pub(crate) fn report(
    listener: Option<&dyn ProgressListener>,
    stage: ParseStage,
    message: impl Into<String>,
) {
    if let Some(listener) = listener {
        listener.on_progress(ParseProgress {
            stage,
            percent: stage.percent(),
            message: message.into(),
        });
    }
}
