//! Book options and the book source they select.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which opening book is active.
///
/// Decoded once from the `filename` option string. The reserved tokens are
/// kept bit-compatible with existing configuration files: `"eco:"` selects
/// the ECO classification book, `"nobook:"` disables book moves, and an
/// empty string selects the internal book. Anything else is a book file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookSource {
    #[default]
    Internal,
    Disabled,
    Eco,
    File(PathBuf),
}

impl BookSource {
    /// Token selecting the ECO classification book.
    pub const ECO_TOKEN: &'static str = "eco:";
    /// Token disabling book moves.
    pub const NO_BOOK_TOKEN: &'static str = "nobook:";

    /// Decodes an option string. Matching is exact; unknown strings are
    /// treated as file paths.
    #[must_use]
    pub fn parse(filename: &str) -> Self {
        match filename {
            "" => BookSource::Internal,
            Self::NO_BOOK_TOKEN => BookSource::Disabled,
            Self::ECO_TOKEN => BookSource::Eco,
            path => BookSource::File(PathBuf::from(path)),
        }
    }

    /// Encodes the source back into its option string.
    #[must_use]
    pub fn to_token(&self) -> String {
        match self {
            BookSource::Internal => String::new(),
            BookSource::Disabled => Self::NO_BOOK_TOKEN.to_string(),
            BookSource::Eco => Self::ECO_TOKEN.to_string(),
            BookSource::File(path) => path.display().to_string(),
        }
    }
}

impl From<String> for BookSource {
    fn from(filename: String) -> Self {
        Self::parse(&filename)
    }
}

impl From<BookSource> for String {
    fn from(source: BookSource) -> Self {
        source.to_token()
    }
}

/// Options controlling opening book use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookOptions {
    /// The active book, written as `filename` in configuration files.
    #[serde(rename = "filename")]
    pub source: BookSource,
    /// No book moves are suggested once the game is longer than this many plies.
    pub max_length: u32,
    /// Randomness of book move selection. 0 picks in proportion to the
    /// weights; larger values flatten the distribution, negative values
    /// sharpen it.
    pub random: f64,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            source: BookSource::default(),
            max_length: 1000,
            random: 0.0,
        }
    }
}

impl BookOptions {
    /// Creates options for the given `filename` token with default settings.
    #[must_use]
    pub fn new(filename: &str) -> Self {
        Self {
            source: BookSource::parse(filename),
            ..Self::default()
        }
    }

    /// Sets the maximum game length (in plies) for book use.
    #[must_use]
    pub fn with_max_length(mut self, max_length: u32) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets the selection randomness.
    #[must_use]
    pub fn with_random(mut self, random: f64) -> Self {
        self.random = random;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reserved_tokens() {
        assert_eq!(BookSource::parse("eco:"), BookSource::Eco);
        assert_eq!(BookSource::parse("nobook:"), BookSource::Disabled);
        assert_eq!(BookSource::parse(""), BookSource::Internal);
        assert_eq!(
            BookSource::parse("book.bin"),
            BookSource::File(PathBuf::from("book.bin"))
        );
    }

    #[test]
    fn test_parse_is_exact() {
        for near_miss in ["ECO:", "eco", " eco:", "eco: ", "eco:book.bin"] {
            assert_ne!(BookSource::parse(near_miss), BookSource::Eco, "{near_miss:?}");
        }
    }

    #[test]
    fn test_token_roundtrip() {
        for token in ["eco:", "nobook:", "", "books/main.ctg"] {
            assert_eq!(BookSource::parse(token).to_token(), token);
        }
    }

    #[test]
    fn test_options_defaults() {
        let options = BookOptions::default();
        assert_eq!(options.source, BookSource::Internal);
        assert_eq!(options.max_length, 1000);
        assert_eq!(options.random, 0.0);
    }

    #[test]
    fn test_options_builder() {
        let options = BookOptions::new("eco:").with_max_length(20).with_random(0.5);
        assert_eq!(options.source, BookSource::Eco);
        assert_eq!(options.max_length, 20);
        assert_eq!(options.random, 0.5);
    }

    #[test]
    fn test_options_toml() {
        let options: BookOptions = toml::from_str("filename = \"eco:\"\nmax_length = 12\n").unwrap();
        assert_eq!(options.source, BookSource::Eco);
        assert_eq!(options.max_length, 12);
        assert_eq!(options.random, 0.0);

        let text = toml::to_string(&BookOptions::new("nobook:")).unwrap();
        assert!(text.contains("filename = \"nobook:\""));
    }
}
