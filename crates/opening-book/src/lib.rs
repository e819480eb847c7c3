//! Opening book providers.
//!
//! - [`OpeningBook`] - Provider contract: enable via options, suggest weighted moves
//! - [`EcoBook`] - Suggestions that follow the ECO classification
//! - [`BookRegistry`] - Picks the active provider and chooses a move
//! - [`BookConfig`] - `book.toml` loading
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use eco_graph::SharedGraph;
//! use opening_book::{BookOptions, BookRegistry, EcoBook};
//! use shakmaty::Chess;
//!
//! let graph = Arc::new(SharedGraph::builtin());
//! let mut registry = BookRegistry::new().with_book(Box::new(EcoBook::new(graph)));
//! registry.set_options(BookOptions::new("eco:"));
//!
//! let entries = registry.book_entries(&Chess::default());
//! assert!(!entries.is_empty());
//! assert_eq!(entries[0].weight, 10000);
//! ```

pub mod book;
pub mod config;
pub mod eco;
pub mod options;
pub mod registry;

pub use book::{BookEntry, BookGame, BookPosInput, OpeningBook};
pub use config::{BookConfig, ConfigError};
pub use eco::{EcoBook, ECO_WEIGHT_CEILING};
pub use options::{BookOptions, BookSource};
pub use registry::BookRegistry;
