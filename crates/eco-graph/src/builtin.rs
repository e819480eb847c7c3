//! Built-in ECO dataset.
//!
//! The lines are compiled into the library from `data/eco.tsv` and listed in
//! ECO order, so lower codes win the discovery rank at shared positions.

use crate::dataset::Dataset;
use crate::error::DatasetError;

const BUILTIN_TSV: &str = include_str!("../data/eco.tsv");

impl Dataset {
    /// Returns the compiled-in ECO dataset.
    ///
    /// Covers the main families of all five ECO volumes: flank openings
    /// (A), semi-open games (B), open games and the French (C), closed games
    /// and the Grünfeld (D), and the Indian defenses (E).
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Tsv`] if the embedded table is corrupt.
    pub fn builtin() -> Result<Self, DatasetError> {
        Self::from_tsv_str(BUILTIN_TSV)
    }
}
