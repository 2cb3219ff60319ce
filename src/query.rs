//! Top-K nearest-neighbor queries over a similarity matrix.
//!
//! The query service is independent of any graph threshold: a node can have
//! strong top-K neighbors even when none of those edges clear the display
//! cutoff, which is what lets a UI highlight "closest matches" separately
//! from "structurally connected" nodes.
//!
//! Determinism: equal scores are broken by ascending document id, so repeated
//! queries over the same matrix return identical results.

use serde::Serialize;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::similarity::SimilarityMatrix;

/// A single neighbor hit: document id and its similarity to the query node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeighborHit {
    pub id: usize,
    pub score: f64,
}

/// Ordered top-K result for one query node.
///
/// Hits are sorted descending by score, ties broken by ascending id, never
/// include the query node, and number `min(k, N-1)`.
#[derive(Debug, Clone, Serialize)]
pub struct TopKResult {
    pub node_id: usize,
    pub hits: Vec<NeighborHit>,
}

impl TopKResult {
    /// Neighbor ids in rank order.
    pub fn ids(&self) -> Vec<usize> {
        self.hits.iter().map(|h| h.id).collect()
    }
}

/// A neighbor hit joined with its document metadata.
#[derive(Debug, Clone, Serialize)]
pub struct NeighborInfo {
    pub id: usize,
    pub title: String,
    pub link: String,
    pub keywords: Vec<String>,
    pub score: f64,
}

/// Return the `k` highest-similarity neighbors of `node_id`, excluding itself.
///
/// Reads the matrix by row; symmetry is validated when the matrix is bound
/// into a [`crate::core::CorpusIndex`], which makes row and column reads
/// equivalent by invariant rather than by accident.
///
/// # Errors
///
/// `InvalidArgument` if `node_id` is outside `[0, N)` or `k` is zero. A
/// failed query has no effect on the shared matrix or on other queries.
///
/// # Examples
///
/// ```
/// use simgraph::core::FeatureMatrix;
/// use simgraph::query::top_k_neighbors;
/// use simgraph::similarity::SimilarityMatrix;
///
/// let features = FeatureMatrix::from_rows(vec![
///     vec![1.0, 0.0, 0.0],
///     vec![1.0, 0.0, 0.0],
///     vec![0.0, 1.0, 0.0],
///     vec![0.0, 0.0, 1.0],
/// ]).unwrap();
/// let sim = SimilarityMatrix::compute(&features);
///
/// let top = top_k_neighbors(&sim, 0, 2).unwrap();
/// assert_eq!(top.ids(), vec![1, 2]);
/// ```
pub fn top_k_neighbors(
    sim: &SimilarityMatrix,
    node_id: usize,
    k: usize,
) -> Result<TopKResult> {
    let n = sim.len();
    if node_id >= n {
        return Err(Error::InvalidArgument(format!(
            "node id {} out of range for {} documents",
            node_id, n
        )));
    }
    if k == 0 {
        return Err(Error::InvalidArgument("k must be positive".into()));
    }

    trace!("Top-{} query for node {}", k, node_id);

    let row = sim.row(node_id);
    let mut candidates: Vec<NeighborHit> = row
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != node_id)
        .map(|(j, &score)| NeighborHit { id: j, score })
        .collect();

    candidates.sort_unstable_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates.truncate(k);

    debug!(
        "Top-{} for node {}: {} hits, best score {:.4}",
        k,
        node_id,
        candidates.len(),
        candidates.first().map(|h| h.score).unwrap_or(0.0)
    );

    Ok(TopKResult { node_id, hits: candidates })
}
