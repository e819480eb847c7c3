//! Configuration file loading for opening books.
//!
//! A `book.toml` file selects the active book and, optionally, a
//! classification dataset to use instead of the built-in one:
//!
//! ```toml
//! dataset = "openings/eco.tsv"
//!
//! [book]
//! filename = "eco:"
//! max_length = 20
//! random = 0.5
//! ```

use std::path::{Path, PathBuf};

use eco_graph::SharedGraph;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::BookOptions;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Book configuration as stored on disk.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct BookConfig {
    /// Options applied to every registered book.
    #[serde(default)]
    pub book: BookOptions,
    /// Classification dataset (`.json` or `.tsv`). The built-in dataset is
    /// used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
}

impl BookConfig {
    /// Loads the configuration from [`Self::config_path()`].
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Loads the configuration from `path`, falling back to defaults if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// Currently returns `book.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("book.toml")
    }

    /// A lazily built classification graph over the configured dataset.
    #[must_use]
    pub fn shared_graph(&self) -> SharedGraph {
        match &self.dataset {
            Some(path) => SharedGraph::from_path(path.clone()),
            None => SharedGraph::builtin(),
        }
    }
}
