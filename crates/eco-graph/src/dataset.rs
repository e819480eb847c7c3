//! Opening datasets: an ordered list of ECO-tagged lines.
//!
//! Two on-disk layouts are understood:
//! - JSON: an array of [`OpeningLine`] objects.
//! - TSV: the lichess `chess-openings` layout with a header row naming the
//!   `eco`, `name` and `pgn` (or `uci`) columns, plus an optional `fen`
//!   column.
//!
//! Dataset order matters: it decides the discovery rank of every move in
//! the classification graph.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::notation::movetext_tokens;
use crate::opening::OpeningLine;

/// An ordered collection of opening lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    lines: Vec<OpeningLine>,
}

impl Dataset {
    /// Creates a new empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dataset with the given lines, keeping their order.
    #[must_use]
    pub fn with_lines(lines: Vec<OpeningLine>) -> Self {
        Self { lines }
    }

    /// Returns the number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the dataset has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends a line.
    pub fn add(&mut self, line: OpeningLine) {
        self.lines.push(line);
    }

    /// Returns all lines in dataset order.
    #[must_use]
    pub fn lines(&self) -> &[OpeningLine] {
        &self.lines
    }

    /// Parses a JSON array of opening lines.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Json`] if the text is not a valid array of lines.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a tab-separated dataset with a header row.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Tsv`] if the header lacks a required column or
    /// a row has too few fields.
    pub fn from_tsv_str(tsv: &str) -> Result<Self, DatasetError> {
        let mut rows = tsv
            .lines()
            .enumerate()
            .map(|(i, row)| (i + 1, row.trim_end_matches('\r')))
            .filter(|(_, row)| !row.trim().is_empty() && !row.starts_with('#'));

        let Some((header_line, header)) = rows.next() else {
            return Ok(Self::new());
        };
        let columns = TsvColumns::from_header(header).ok_or_else(|| DatasetError::Tsv {
            line: header_line,
            reason: "header must name 'eco', 'name' and 'pgn' or 'uci' columns".to_string(),
        })?;

        let mut lines = Vec::new();
        for (line, row) in rows {
            let fields: Vec<&str> = row.split('\t').collect();
            let field = |idx: usize| {
                fields.get(idx).map(|f| f.trim()).ok_or_else(|| DatasetError::Tsv {
                    line,
                    reason: format!("expected at least {} fields, found {}", idx + 1, fields.len()),
                })
            };

            let moves = match columns.moves {
                MovesColumn::Pgn(idx) => movetext_tokens(field(idx)?),
                MovesColumn::Uci(idx) => field(idx)?.split_whitespace().map(String::from).collect(),
            };
            let fen = match columns.fen {
                Some(idx) => Some(field(idx)?.to_string()).filter(|f| !f.is_empty()),
                None => None,
            };

            lines.push(OpeningLine {
                eco: field(columns.eco)?.to_string(),
                name: field(columns.name)?.to_string(),
                moves,
                fen,
            });
        }

        Ok(Self { lines })
    }

    /// Loads a dataset from a file, choosing the format by extension
    /// (`.json` or `.tsv`).
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnsupportedFormat`] for other extensions, an
    /// I/O error if the file cannot be read, or a parse error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?),
            "tsv" => Self::from_tsv_str(&std::fs::read_to_string(path)?),
            _ => Err(DatasetError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl FromIterator<OpeningLine> for Dataset {
    fn from_iter<I: IntoIterator<Item = OpeningLine>>(iter: I) -> Self {
        Self::with_lines(iter.into_iter().collect())
    }
}

enum MovesColumn {
    Pgn(usize),
    Uci(usize),
}

struct TsvColumns {
    eco: usize,
    name: usize,
    moves: MovesColumn,
    fen: Option<usize>,
}

impl TsvColumns {
    fn from_header(header: &str) -> Option<Self> {
        let names: Vec<String> = header.split('\t').map(|h| h.trim().to_ascii_lowercase()).collect();
        let find = |name: &str| names.iter().position(|h| h == name);

        let moves = match (find("pgn"), find("uci")) {
            (Some(idx), _) => MovesColumn::Pgn(idx),
            (None, Some(idx)) => MovesColumn::Uci(idx),
            (None, None) => return None,
        };

        Some(Self {
            eco: find("eco")?,
            name: find("name")?,
            moves,
            fen: find("fen"),
        })
    }
}
