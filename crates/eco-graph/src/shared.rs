//! Lazily built, shareable classification graph.
//!
//! The application creates one [`SharedGraph`] at startup and hands an
//! `Arc<SharedGraph>` to every book provider. The graph is built on first
//! access; concurrent first callers block until that single build finishes
//! and then all observe the same instance. A failed build is cached too, so
//! the dataset is never read twice.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::graph::ClassificationGraph;

type Loader = Box<dyn Fn() -> Result<Dataset, DatasetError> + Send + Sync>;

/// A classification graph built at most once, on first use.
pub struct SharedGraph {
    loader: Loader,
    graph: OnceLock<Result<ClassificationGraph, DatasetError>>,
}

impl SharedGraph {
    /// Creates a handle that builds its graph from whatever `loader` returns.
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Dataset, DatasetError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            graph: OnceLock::new(),
        }
    }

    /// Creates a handle over the compiled-in ECO dataset.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Dataset::builtin)
    }

    /// Creates a handle that loads its dataset from a file on first use.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(move || Dataset::from_path(&path))
    }

    /// Creates a handle over an in-memory dataset.
    #[must_use]
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(move || Ok(dataset.clone()))
    }

    /// Returns the graph, building it if this is the first access.
    ///
    /// # Errors
    ///
    /// Returns the construction error on this and every later call if the
    /// dataset could not be loaded or contained malformed lines.
    pub fn get(&self) -> Result<&ClassificationGraph, &DatasetError> {
        self.graph
            .get_or_init(|| {
                tracing::debug!("Building ECO classification graph");
                (self.loader)().and_then(|dataset| ClassificationGraph::build(&dataset))
            })
            .as_ref()
    }

    /// Returns true once a build has run, whether it succeeded or not.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.graph.get().is_some()
    }
}

impl fmt::Debug for SharedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedGraph")
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
