//! # Pairwise cosine similarity over a document×feature matrix
//!
//! ## Algorithm Overview
//!
//! 1. **Norm precomputation**: L2 norms for every feature row are computed once
//! 2. **Pairwise similarity**: `dot(v_i, v_j) / (||v_i|| * ||v_j||)` for every pair,
//!    clamped to `[0, 1]` (inputs are non-negative)
//! 3. **Zero-norm policy**: any pair involving an all-zero row gets similarity 0,
//!    never NaN and never an error
//! 4. **Diagonal**: self-similarity is exactly 1 for non-zero rows, 0 for zero rows
//!
//! Rows are computed in parallel with rayon. Dot products commute and each entry
//! is evaluated with the same operation order on both sides of the diagonal, so
//! the result is exactly symmetric.
//!
//! ## Complexity
//!
//! * **Time**: O(N² × F) for N documents with F features, exact, no approximation
//! * **Space**: O(N²) for the dense output matrix
//!
//! Exact pairwise computation is the target scale here (N in the low thousands);
//! there is no incremental update path, a changed feature matrix means a full
//! recomputation.

use std::fmt;

use smartcore::linalg::basic::arrays::{Array, Array2};
use smartcore::linalg::basic::matrix::DenseMatrix;

use rayon::prelude::*;

use log::{debug, info, trace, warn};

use crate::core::FeatureMatrix;
use crate::error::{Error, Result};

/// Symmetric N×N matrix of pairwise cosine similarities in `[0, 1]`.
///
/// Immutable once computed; all query operations (top-K, graph derivation,
/// clustering) take `&SimilarityMatrix` and never mutate it, so a computed
/// matrix can be shared freely across readers.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    matrix: DenseMatrix<f64>,
    nnodes: usize,
}

impl SimilarityMatrix {
    /// Compute the full pairwise cosine similarity matrix for `features`.
    ///
    /// Pure function of the input: persistence of the result is the caller's
    /// responsibility (see [`crate::storage::save_similarity_matrix`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use simgraph::core::FeatureMatrix;
    /// use simgraph::similarity::SimilarityMatrix;
    ///
    /// let features = FeatureMatrix::from_rows(vec![
    ///     vec![1.0, 0.0, 0.0],
    ///     vec![1.0, 0.0, 0.0],
    ///     vec![0.0, 1.0, 0.0],
    /// ]).unwrap();
    ///
    /// let sim = SimilarityMatrix::compute(&features);
    /// assert_eq!(sim.len(), 3);
    /// assert!((sim.get(0, 1) - 1.0).abs() < 1e-12);
    /// assert_eq!(sim.get(0, 2), 0.0);
    /// ```
    pub fn compute(features: &FeatureMatrix) -> SimilarityMatrix {
        let n = features.len();
        info!(
            "Computing similarity matrix for {} documents with {} features",
            n,
            features.nfeatures()
        );

        let norms: Vec<f64> = features
            .rows()
            .map(|row| row.iter().map(|&x| x * x).sum::<f64>().sqrt())
            .collect();
        trace!("Precomputed norms for all documents");

        let zero_rows = norms.iter().filter(|&&v| v <= 1e-15).count();
        if zero_rows > 0 {
            warn!("{} all-zero feature rows; their similarities are defined as 0", zero_rows);
        }

        let rows: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let row_i = features.row(i);
                (0..n)
                    .map(|j| {
                        if i == j {
                            // Self-similarity is 1 by definition for non-zero rows
                            return if norms[i] > 1e-15 { 1.0 } else { 0.0 };
                        }
                        cosine_similarity(row_i, features.row(j), norms[i], norms[j])
                    })
                    .collect()
            })
            .collect();

        let matrix = DenseMatrix::from_iterator(
            rows.into_iter().flatten(),
            n,
            n,
            0,
        );

        let sim = SimilarityMatrix { matrix, nnodes: n };
        debug!("Similarity matrix built: {}", sim.stats());
        sim
    }

    /// Wrap already-computed similarity values.
    ///
    /// Used by the storage layer after reloading a persisted matrix. Fails with
    /// `MalformedInput` if the rows are ragged or the matrix is not square;
    /// recovery by truncation happens in the loader, not here.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<SimilarityMatrix> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::MalformedInput("similarity matrix has no rows".into()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::MalformedInput(format!(
                    "similarity matrix is not square: row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
        }

        let out_of_range = rows
            .iter()
            .flatten()
            .filter(|&&v| !(0.0..=1.0 + 1e-9).contains(&v))
            .count();
        if out_of_range > 0 {
            warn!("{} similarity values outside [0, 1]", out_of_range);
        }

        let matrix = DenseMatrix::from_iterator(rows.into_iter().flatten(), n, n, 0);
        Ok(SimilarityMatrix { matrix, nnodes: n })
    }

    /// Number of documents (matrix dimension).
    pub fn len(&self) -> usize {
        self.nnodes
    }

    pub fn is_empty(&self) -> bool {
        self.nnodes == 0
    }

    /// Similarity between documents `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.nnodes && j < self.nnodes,
            "Index out of bounds: ({}, {}) for {}x{} matrix",
            i,
            j,
            self.nnodes,
            self.nnodes
        );
        *self.matrix.get((i, j))
    }

    /// The i-th row as an owned vector.
    pub fn row(&self, i: usize) -> Vec<f64> {
        assert!(i < self.nnodes, "Row index {} out of bounds for {} nodes", i, self.nnodes);
        let mut row = Vec::with_capacity(self.nnodes);
        for j in 0..self.nnodes {
            row.push(*self.matrix.get((i, j)));
        }
        row
    }

    /// The j-th column as an owned vector.
    ///
    /// For a symmetric matrix this equals [`SimilarityMatrix::row`]; query code
    /// reads rows and relies on the symmetry validated at index construction.
    pub fn column(&self, j: usize) -> Vec<f64> {
        assert!(j < self.nnodes, "Column index {} out of bounds for {} nodes", j, self.nnodes);
        let mut col = Vec::with_capacity(self.nnodes);
        for i in 0..self.nnodes {
            col.push(*self.matrix.get((i, j)));
        }
        col
    }

    /// Check symmetry within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        trace!("Checking matrix symmetry with tolerance {:.2e}", tolerance);
        let mut max_asymmetry: f64 = 0.0;
        let mut violations = 0;

        for i in 0..self.nnodes {
            for j in (i + 1)..self.nnodes {
                let diff = (self.matrix.get((i, j)) - self.matrix.get((j, i))).abs();
                max_asymmetry = max_asymmetry.max(diff);
                if diff > tolerance {
                    violations += 1;
                }
            }
        }

        debug!(
            "Symmetry check: {} violations, max asymmetry: {:.2e}",
            violations, max_asymmetry
        );
        violations == 0
    }

    /// Summary statistics over the off-diagonal entries.
    pub fn stats(&self) -> SimilarityStats {
        let mut min: f64 = f64::INFINITY;
        let mut max: f64 = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;

        for i in 0..self.nnodes {
            for j in 0..self.nnodes {
                if i == j {
                    continue;
                }
                let v = *self.matrix.get((i, j));
                min = min.min(v);
                max = max.max(v);
                sum += v;
                count += 1;
            }
        }

        if count == 0 {
            min = 0.0;
            max = 0.0;
        }

        SimilarityStats {
            nnodes: self.nnodes,
            min_similarity: min,
            max_similarity: max,
            mean_similarity: if count > 0 { sum / count as f64 } else { 0.0 },
        }
    }

    /// Reference to the underlying matrix.
    pub fn matrix(&self) -> &DenseMatrix<f64> {
        &self.matrix
    }
}

/// Cosine similarity of two rows with precomputed norms.
///
/// Zero-norm rows yield 0 rather than NaN; this is the documented policy for
/// degenerate vectors, not an oversight.
fn cosine_similarity(a: &[f64], b: &[f64], norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a * norm_b;
    if denom <= 1e-15 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    (dot / denom).clamp(0.0, 1.0)
}

/// Summary statistics for a similarity matrix.
#[derive(Debug, Clone)]
pub struct SimilarityStats {
    pub nnodes: usize,
    pub min_similarity: f64,
    pub max_similarity: f64,
    pub mean_similarity: f64,
}

impl fmt::Display for SimilarityStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} documents, off-diagonal similarity range [{:.4}, {:.4}], mean {:.4}",
            self.nnodes, self.min_similarity, self.max_similarity, self.mean_similarity
        )
    }
}

impl fmt::Display for SimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SimilarityMatrix ({}×{}):", self.nnodes, self.nnodes)?;

        if self.nnodes <= 10 {
            for i in 0..self.nnodes {
                write!(f, "Row {}: [", i)?;
                for j in 0..self.nnodes {
                    write!(f, "{:8.4} ", self.matrix.get((i, j)))?;
                }
                writeln!(f, "]")?;
            }
        } else {
            writeln!(f, "Matrix too large to display ({} nodes)", self.nnodes)?;
            writeln!(f, "{}", self.stats())?;
        }

        Ok(())
    }
}
