//! Seeded K-Means cluster assignment over similarity profiles.
//!
//! Documents are partitioned into a fixed number of groups by clustering the
//! similarity-matrix rows as feature vectors: two documents land in the same
//! group when their similarity profiles across the whole corpus are close.
//!
//! **DETERMINISTIC**: the seed is part of the public contract, threaded into
//! smartcore's K-Means; the same seed on the same input reproduces the same
//! labels. Cluster ids are arbitrary labels with no semantic ordering;
//! downstream consumers get a stable grouping key per run, nothing more.

use serde::Serialize;

use log::{debug, info};

use smartcore::cluster::kmeans::{KMeans, KMeansParameters};
use smartcore::linalg::basic::arrays::Array2;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{Error, Result};
use crate::similarity::SimilarityMatrix;

/// Iteration cap for Lloyd's algorithm.
const KMEANS_MAX_ITER: usize = 100;

/// A cluster label per document, in `[0, k)`.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    k: usize,
    seed: u64,
}

impl ClusterAssignment {
    /// The label of document `i`.
    pub fn label(&self, i: usize) -> usize {
        assert!(
            i < self.labels.len(),
            "Document {} out of bounds for {} labels",
            i,
            self.labels.len()
        );
        self.labels[i]
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of clusters this assignment was built with.
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Document ids belonging to cluster `c`, ascending.
    pub fn members(&self, c: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == c)
            .map(|(i, _)| i)
            .collect()
    }

    /// Per-cluster member counts, indexed by cluster id.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Partition the documents into `k` groups with a seeded K-Means pass.
///
/// # Errors
///
/// `InvalidArgument` if `k` is zero or not smaller than the document count.
///
/// # Examples
///
/// ```
/// use simgraph::clustering::assign_clusters;
/// use simgraph::core::FeatureMatrix;
/// use simgraph::similarity::SimilarityMatrix;
///
/// let features = FeatureMatrix::from_rows(vec![
///     vec![1.0, 0.0],
///     vec![1.0, 0.1],
///     vec![0.0, 1.0],
///     vec![0.1, 1.0],
/// ]).unwrap();
/// let sim = SimilarityMatrix::compute(&features);
///
/// let clusters = assign_clusters(&sim, 2, 42).unwrap();
/// assert_eq!(clusters.len(), 4);
/// assert_eq!(clusters.label(0), clusters.label(1));
/// assert_eq!(clusters.label(2), clusters.label(3));
/// ```
pub fn assign_clusters(
    sim: &SimilarityMatrix,
    k: usize,
    seed: u64,
) -> Result<ClusterAssignment> {
    let n = sim.len();
    if k == 0 {
        return Err(Error::InvalidArgument("cluster count must be positive".into()));
    }
    if k >= n {
        return Err(Error::InvalidArgument(format!(
            "cluster count {} must be smaller than document count {}",
            k, n
        )));
    }

    info!("Assigning {} documents to {} clusters (seed {})", n, k, seed);

    // Flatten similarity rows into an N×N sample matrix
    let data: Vec<f64> = (0..n).flat_map(|i| sim.row(i)).collect();
    let x: DenseMatrix<f64> = DenseMatrix::from_iterator(data.into_iter(), n, n, 0);

    let params = KMeansParameters { k, max_iter: KMEANS_MAX_ITER, seed: Some(seed) };

    let km = KMeans::fit(&x, params)
        .map_err(|e| Error::InvalidArgument(format!("k-means failed to converge: {}", e)))?;
    let labels: Vec<usize> = km
        .predict(&x)
        .map_err(|e| Error::InvalidArgument(format!("k-means prediction failed: {}", e)))?;

    let assignment = ClusterAssignment { labels, k, seed };
    debug!("Cluster sizes: {:?}", assignment.cluster_sizes());
    Ok(assignment)
}
