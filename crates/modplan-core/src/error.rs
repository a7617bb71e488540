use crate::Range;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Configuration error: {0}")]
    Config(#[from] modplan_config::ConfigError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] modplan_analysis::AnalysisError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Position conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Overlapping edits in {}: {first} overlaps {second}", file.display())]
    OverlappingEdits {
        file: PathBuf,
        first: Range,
        second: Range,
    },
}

/// Failure to map between offsets and line/character positions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("offset {offset} is past the end of the text (length {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("offset {offset} splits a surrogate pair")]
    SplitsCharacter { offset: usize },

    #[error("position {line}:{character} is outside of the text")]
    PositionOutOfBounds { line: usize, character: usize },
}
