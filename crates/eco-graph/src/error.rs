//! Errors raised while loading a dataset or building the graph from it.

use std::fmt;

use thiserror::Error;

use crate::notation::MoveTokenError;

/// Errors that can occur when loading an opening dataset or building the
/// classification graph from it.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to read the dataset file.
    #[error("failed to read opening dataset: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TSV row does not fit the header.
    #[error("invalid TSV dataset at line {line}: {reason}")]
    Tsv { line: usize, reason: String },

    /// The file extension names no known dataset format.
    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),

    /// One or more lines could not be replayed. Construction is aborted and
    /// every offending line is listed.
    #[error("opening dataset has {} malformed line(s): {}", .errors.len(), summarize(.errors))]
    Malformed { errors: Vec<LineError> },
}

fn summarize(errors: &[LineError]) -> String {
    const SHOWN: usize = 3;
    let mut parts: Vec<String> = errors.iter().take(SHOWN).map(ToString::to_string).collect();
    if errors.len() > SHOWN {
        parts.push(format!("and {} more", errors.len() - SHOWN));
    }
    parts.join("; ")
}

/// A single malformed dataset line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    /// Zero-based index of the line in the dataset.
    pub index: usize,
    /// The line's ECO tag as written in the dataset.
    pub eco: String,
    /// Zero-based ply of the offending move, if the error is about a move.
    pub ply: Option<usize>,
    /// The offending token (move or ECO code), if any.
    pub token: Option<String>,
    pub kind: LineErrorKind,
}

/// What is wrong with a malformed line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineErrorKind {
    #[error("invalid ECO code")]
    InvalidEco,
    #[error("line has no moves")]
    Empty,
    #[error(transparent)]
    Move(#[from] MoveTokenError),
    #[error("expected FEN is not valid")]
    InvalidFen,
    #[error("final position does not match the expected FEN")]
    FenMismatch,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {} ({})", self.index, self.eco)?;
        if let Some(ply) = self.ply {
            write!(f, " ply {}", ply)?;
        }
        if let Some(token) = &self.token {
            write!(f, " '{}'", token)?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for LineError {}
