//! ECO opening classification graph.
//!
//! This crate answers one question quickly: given a chess position, which
//! moves continue a classified opening line from exactly that position, and
//! in which order of preference?
//!
//! - [`PositionKey`] - Zobrist key that merges transposed positions
//! - [`Dataset`] - Ordered ECO-tagged opening lines (JSON, TSV or built-in)
//! - [`ClassificationGraph`] - Position → ranked classified successor moves
//! - [`SharedGraph`] - Graph built once, on first use, shared across threads
//!
//! # Example
//!
//! ```
//! use eco_graph::{ClassificationGraph, Dataset, OpeningLine};
//! use shakmaty::Chess;
//!
//! let dataset = Dataset::with_lines(vec![
//!     OpeningLine::new("C20", "King's Pawn Game", vec!["e4", "e5", "Nf3"]),
//!     OpeningLine::new("B20", "Sicilian Defense", vec!["e4", "c5"]),
//! ]);
//! let graph = ClassificationGraph::build(&dataset).unwrap();
//! let entries = graph.successors(&Chess::default());
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].eco.as_str(), "C20");
//! ```

mod builtin;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod notation;
pub mod opening;
pub mod shared;
mod zobrist;

pub use dataset::Dataset;
pub use error::{DatasetError, LineError, LineErrorKind};
pub use graph::{ClassificationEntry, ClassificationGraph, GameClassification};
pub use notation::{apply_move, parse_move, MoveTokenError};
pub use opening::{EcoCode, InvalidEcoCode, OpeningLine, OpeningName};
pub use shared::SharedGraph;
pub use zobrist::PositionKey;
