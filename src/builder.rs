//! Explicit construction pipeline from raw inputs to a queryable corpus.
//!
//! Nothing in this crate computes at load time; the builder is the one place
//! where the stages are run, in order: similarity matrix → index binding
//! (alignment validation) → thresholded graph → optional cluster assignment.

use log::{debug, info};

use crate::clustering::{assign_clusters, ClusterAssignment};
use crate::core::{CorpusIndex, FeatureMatrix, MetadataTable};
use crate::error::Result;
use crate::graph::{GraphFactory, SimilarityGraph};
use crate::similarity::SimilarityMatrix;

/// Output of a full build: the index, its display graph, and the optional
/// cluster assignment, plus the display defaults chosen at configure time.
#[derive(Debug, Clone)]
pub struct CorpusBuild {
    pub index: CorpusIndex,
    pub graph: SimilarityGraph,
    pub clusters: Option<ClusterAssignment>,
    pub default_top_k: usize,
}

/// Builder binding features and metadata into a [`CorpusIndex`].
///
/// # Examples
///
/// ```
/// use simgraph::builder::CorpusIndexBuilder;
/// use simgraph::core::{DocumentMetadata, FeatureMatrix, MetadataTable};
///
/// let features = FeatureMatrix::from_rows(vec![
///     vec![1.0, 0.0],
///     vec![1.0, 0.1],
///     vec![0.0, 1.0],
/// ]).unwrap();
/// let metadata = MetadataTable::new(vec![
///     DocumentMetadata::new("A", "https://a.example"),
///     DocumentMetadata::new("B", "https://b.example"),
///     DocumentMetadata::new("C", "https://c.example"),
/// ]);
///
/// let build = CorpusIndexBuilder::new()
///     .with_threshold(0.5)
///     .build(&features, metadata)
///     .unwrap();
///
/// assert_eq!(build.index.len(), 3);
/// assert!(build.graph.has_edge(0, 1));
/// ```
pub struct CorpusIndexBuilder {
    threshold: f64,
    top_k: usize,
    clusters: Option<(usize, u64)>,
}

impl Default for CorpusIndexBuilder {
    fn default() -> Self {
        debug!("Creating CorpusIndexBuilder with default parameters");
        Self {
            // display defaults matching the interactive-graph use case
            threshold: 0.5,
            top_k: 5,
            clusters: None,
        }
    }
}

impl CorpusIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------- Configuration --------------------

    /// Similarity cutoff for the derived display graph. Further graphs at
    /// other thresholds can be built from the same index afterwards.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        info!("Configuring graph threshold: {}", threshold);
        self.threshold = threshold;
        self
    }

    /// Default number of neighbors returned when a query leaves `k` unset.
    pub fn with_top_k(mut self, k: usize) -> Self {
        info!("Configuring default top-k: {}", k);
        self.top_k = k;
        self
    }

    /// Enable a seeded K-Means pass assigning one of `k` group ids to every
    /// document.
    pub fn with_clusters(mut self, k: usize, seed: u64) -> Self {
        info!("Configuring clustering: k={}, seed={}", k, seed);
        self.clusters = Some((k, seed));
        self
    }

    // -------------------- Build --------------------

    /// Run the full pipeline over `features` and `metadata`.
    ///
    /// # Errors
    ///
    /// `MalformedInput` if metadata and features disagree on the document
    /// count; `InvalidArgument` if a configured cluster count is out of
    /// range for the corpus size.
    pub fn build(
        self,
        features: &FeatureMatrix,
        metadata: MetadataTable,
    ) -> Result<CorpusBuild> {
        info!(
            "Building corpus index from {} documents with {} features",
            features.len(),
            features.nfeatures()
        );
        debug!(
            "Build configuration: threshold={}, top_k={}, clusters={:?}",
            self.threshold, self.top_k, self.clusters
        );

        let sim = SimilarityMatrix::compute(features);
        let index = CorpusIndex::new(sim, metadata)?;
        let graph = GraphFactory::build_graph(index.similarity(), self.threshold);

        let clusters = match self.clusters {
            Some((k, seed)) => Some(assign_clusters(index.similarity(), k, seed)?),
            None => None,
        };

        info!("Corpus build completed: {}", graph.stats());
        Ok(CorpusBuild { index, graph, clusters, default_top_k: self.top_k })
    }
}
