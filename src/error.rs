use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while turning a CSV file into a table.
///
/// Inside the fallback chain most of these are recoverable: a strategy that
/// fails hands over to the next one. Whatever escapes `load_universities` is
/// fatal and must be shown to the user instead of any data.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("CSV is empty")]
    Empty,

    #[error("could not detect a delimiter")]
    NoDelimiter,

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected at least 5 columns but found {found}")]
    TooFewColumns { found: usize },
}

impl LoadError {
    /// Message shown in place of the page when loading fails.
    pub fn user_message(&self) -> String {
        match self {
            LoadError::Io { .. } | LoadError::UnknownEncoding(_) => {
                format!("⚠️ Error loading CSV: {}", self)
            }
            _ => format!("⚠️ Error parsing CSV: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
