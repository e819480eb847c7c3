//! Book moves drawn from the ECO opening classification.
//!
//! The ECO book suggests the moves that keep the game inside a classified
//! opening line. Moves that appear earlier in the classification dataset get
//! higher weights, so the book prefers the main lines.

use std::sync::Arc;

use eco_graph::SharedGraph;

use crate::book::{BookEntry, BookPosInput, OpeningBook};
use crate::options::{BookOptions, BookSource};

/// Weight given to the first-ranked move; each later rank gets one less.
pub const ECO_WEIGHT_CEILING: u32 = 10_000;

/// Opening book backed by the shared classification graph.
#[derive(Debug)]
pub struct EcoBook {
    graph: Arc<SharedGraph>,
    enabled: bool,
}

impl EcoBook {
    /// Creates a disabled ECO book over `graph`.
    #[must_use]
    pub fn new(graph: Arc<SharedGraph>) -> Self {
        Self {
            graph,
            enabled: false,
        }
    }
}

impl OpeningBook for EcoBook {
    fn name(&self) -> &str {
        "eco"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_options(&mut self, options: &BookOptions) {
        self.enabled = options.source == BookSource::Eco;
    }

    fn book_entries(&self, input: &dyn BookPosInput) -> Vec<BookEntry> {
        let graph = match self.graph.get() {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!("ECO classification unavailable: {}", e);
                return Vec::new();
            }
        };
        graph
            .successors(&input.curr_pos())
            .iter()
            .map(|entry| {
                BookEntry::new(entry.mv, ECO_WEIGHT_CEILING.saturating_sub(u32::from(entry.rank)))
            })
            .collect()
    }

    fn is_available(&self) -> bool {
        self.graph.get().is_ok()
    }
}
