//! Core opening types: ECO codes, dataset lines and opening names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a valid ECO code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ECO code '{0}': expected a letter A-E followed by two digits")]
pub struct InvalidEcoCode(pub String);

/// An Encyclopedia of Chess Openings code, e.g. "B20" or "C44".
///
/// Always one uppercase letter `A`-`E` followed by two digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EcoCode([u8; 3]);

impl EcoCode {
    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII bytes pass validation.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for EcoCode {
    type Err = InvalidEcoCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [v @ b'A'..=b'E', d1 @ b'0'..=b'9', d2 @ b'0'..=b'9'] => Ok(EcoCode([*v, *d1, *d2])),
            _ => Err(InvalidEcoCode(s.to_string())),
        }
    }
}

impl TryFrom<String> for EcoCode {
    type Error = InvalidEcoCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EcoCode> for String {
    fn from(code: EcoCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for EcoCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified opening line from the dataset.
///
/// The ECO code is kept as raw text here; it is validated when the graph is
/// built so that every malformed line can be reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningLine {
    /// The ECO code for this line (e.g., "B20").
    pub eco: String,
    /// The full name, "Opening" or "Opening: Variation".
    pub name: String,
    /// Moves from the starting position in SAN or UCI notation.
    pub moves: Vec<String>,
    /// Expected FEN after the last move, checked during graph construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fen: Option<String>,
}

impl OpeningLine {
    /// Creates a new line with the given ECO code, name and moves.
    #[must_use]
    pub fn new<S: Into<String>>(eco: impl Into<String>, name: impl Into<String>, moves: Vec<S>) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            moves: moves.into_iter().map(Into::into).collect(),
            fen: None,
        }
    }

    /// Sets the FEN expected after the last move.
    #[must_use]
    pub fn with_fen(mut self, fen: impl Into<String>) -> Self {
        self.fen = Some(fen.into());
        self
    }
}

/// The classification attached to a position where a dataset line ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningName {
    pub eco: EcoCode,
    /// Opening family, e.g. "Sicilian Defense".
    pub opening: String,
    /// Variation within the family, e.g. "Najdorf Variation".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<String>,
}

impl OpeningName {
    /// Splits a full line name at the first `": "` into opening and variation.
    #[must_use]
    pub fn from_line_name(eco: EcoCode, name: &str) -> Self {
        match name.split_once(": ") {
            Some((opening, variation)) if !variation.trim().is_empty() => Self {
                eco,
                opening: opening.trim().to_string(),
                variation: Some(variation.trim().to_string()),
            },
            _ => Self {
                eco,
                opening: name.trim().to_string(),
                variation: None,
            },
        }
    }
}

impl fmt::Display for OpeningName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variation {
            Some(variation) => write!(f, "{} {}: {}", self.eco, self.opening, variation),
            None => write!(f, "{} {}", self.eco, self.opening),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eco_code_parse() {
        let code: EcoCode = "B20".parse().unwrap();
        assert_eq!(code.as_str(), "B20");
        assert_eq!(code.to_string(), "B20");
    }

    #[test]
    fn test_eco_code_rejects_malformed() {
        for bad in ["", "B2", "B200", "F00", "b20", "BXX", "20B"] {
            assert!(bad.parse::<EcoCode>().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_eco_code_ordering_follows_taxonomy() {
        let a00: EcoCode = "A00".parse().unwrap();
        let b20: EcoCode = "B20".parse().unwrap();
        let e99: EcoCode = "E99".parse().unwrap();
        assert!(a00 < b20 && b20 < e99);
    }

    #[test]
    fn test_eco_code_serde() {
        let code: EcoCode = serde_json::from_str("\"C44\"").unwrap();
        assert_eq!(code.as_str(), "C44");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"C44\"");
        assert!(serde_json::from_str::<EcoCode>("\"Z99\"").is_err());
    }

    #[test]
    fn test_opening_line_new() {
        let line = OpeningLine::new("C44", "King's Pawn Game", vec!["e4", "e5", "Nf3", "Nc6"]);
        assert_eq!(line.eco, "C44");
        assert_eq!(line.name, "King's Pawn Game");
        assert_eq!(line.moves.len(), 4);
        assert!(line.fen.is_none());
    }

    #[test]
    fn test_opening_line_json_without_fen() {
        let line: OpeningLine =
            serde_json::from_str(r#"{"eco":"B20","name":"Sicilian Defense","moves":["e4","c5"]}"#)
                .unwrap();
        assert_eq!(line.moves, vec!["e4", "c5"]);
        assert!(line.fen.is_none());
    }

    #[test]
    fn test_opening_name_split() {
        let eco = "B90".parse().unwrap();
        let name = OpeningName::from_line_name(eco, "Sicilian Defense: Najdorf Variation");
        assert_eq!(name.opening, "Sicilian Defense");
        assert_eq!(name.variation.as_deref(), Some("Najdorf Variation"));
        assert_eq!(name.to_string(), "B90 Sicilian Defense: Najdorf Variation");

        let plain = OpeningName::from_line_name(eco, "Sicilian Defense");
        assert_eq!(plain.variation, None);
        assert_eq!(plain.to_string(), "B90 Sicilian Defense");
    }
}
