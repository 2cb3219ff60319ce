//! Core data containers: feature matrices, document metadata, and the
//! queryable corpus index.
//!
//! This module provides the containers every other stage consumes:
//!
//! - `FeatureMatrix`: validated N×F matrix of non-negative keyword features,
//!   one row per document.
//! - `DocumentMetadata` / `MetadataTable`: per-document title, link, and
//!   keywords, index-aligned with the feature and similarity matrices.
//! - `CorpusIndex`: a similarity matrix bound to its metadata table with the
//!   cross-index alignment validated at construction. Row i of the metadata
//!   must describe the same document as row/column i of the matrix, and that
//!   is checked here rather than assumed downstream.
//!
//! Design goals:
//! - No implicit computation: nothing is derived at load time; every matrix,
//!   graph, or cluster assignment is produced by an explicit call.
//! - Construction-time validation with typed errors; indexing on
//!   already-validated data uses assertions.
//!
//! # Examples
//!
//! Validate features and look up a document:
//!
//! ```
//! use simgraph::core::{FeatureMatrix, DocumentMetadata, MetadataTable};
//!
//! let features = FeatureMatrix::from_rows(vec![
//!     vec![1.0, 0.0],
//!     vec![0.0, 2.0],
//! ]).unwrap();
//! assert_eq!(features.len(), 2);
//! assert_eq!(features.nfeatures(), 2);
//!
//! let table = MetadataTable::new(vec![
//!     DocumentMetadata::new("A", "https://a.example"),
//!     DocumentMetadata::new("B", "https://b.example"),
//! ]);
//! assert_eq!(table.get(1).unwrap().title, "B");
//! ```

use serde::{Deserialize, Serialize};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::query::{self, NeighborInfo, TopKResult};
use crate::similarity::SimilarityMatrix;

/// Symmetry tolerance applied when binding a matrix into a [`CorpusIndex`].
const SYMMETRY_TOLERANCE: f64 = 1e-6;

/// Dense N×F matrix of non-negative feature values, one row per document.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
    nfeatures: usize,
}

impl FeatureMatrix {
    /// Validate and wrap raw feature rows.
    ///
    /// Fails with `MalformedInput` if there are no rows, if any row length
    /// differs from the first, or if any value is negative or non-finite.
    /// All-zero rows are accepted; their similarities are defined as 0 later.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<FeatureMatrix> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::MalformedInput("feature matrix has no rows".into()));
        }

        let nfeatures = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != nfeatures {
                return Err(Error::MalformedInput(format!(
                    "feature row {} has {} values, expected {}",
                    i,
                    row.len(),
                    nfeatures
                )));
            }
            for (j, &v) in row.iter().enumerate() {
                if !v.is_finite() || v < 0.0 {
                    return Err(Error::MalformedInput(format!(
                        "feature value at row {}, column {} is {}; features must be finite and non-negative",
                        i, j, v
                    )));
                }
            }
        }

        debug!("Validated feature matrix: {} documents × {} features", n, nfeatures);
        Ok(FeatureMatrix { rows, nfeatures })
    }

    /// Number of documents.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of features per document.
    #[inline]
    pub fn nfeatures(&self) -> usize {
        self.nfeatures
    }

    /// The i-th document's feature row.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }

    /// Iterate over all rows without copying.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(|r| r.as_slice())
    }
}

/// Title, link, and keyword list for a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl DocumentMetadata {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self { title: title.into(), link: link.into(), keywords: Vec::new() }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }
}

/// Ordered metadata rows, index-aligned with the feature/similarity matrices.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    docs: Vec<DocumentMetadata>,
}

impl MetadataTable {
    pub fn new(docs: Vec<DocumentMetadata>) -> Self {
        Self { docs }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&DocumentMetadata> {
        self.docs.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentMetadata> {
        self.docs.iter()
    }
}

/// A similarity matrix bound to its metadata, ready to answer queries.
///
/// Construction validates the two load-bearing invariants:
/// - metadata row count equals the matrix dimension, and
/// - the matrix is symmetric (within tolerance), which is what lets the
///   query service read rows where the original data flow read columns.
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    sim: SimilarityMatrix,
    metadata: MetadataTable,
}

impl CorpusIndex {
    /// Bind `sim` and `metadata` into an index.
    ///
    /// # Errors
    ///
    /// `MalformedInput` if the row counts disagree or the matrix is not
    /// symmetric within tolerance. The operation that triggered loading must
    /// not proceed with partially-aligned data.
    pub fn new(sim: SimilarityMatrix, metadata: MetadataTable) -> Result<CorpusIndex> {
        if metadata.len() != sim.len() {
            return Err(Error::MalformedInput(format!(
                "metadata has {} rows but similarity matrix has {} documents",
                metadata.len(),
                sim.len()
            )));
        }
        if !sim.is_symmetric(SYMMETRY_TOLERANCE) {
            return Err(Error::MalformedInput(
                "similarity matrix is not symmetric".into(),
            ));
        }

        info!("Corpus index ready: {} documents", sim.len());
        Ok(CorpusIndex { sim, metadata })
    }

    /// Number of documents in the index.
    #[inline]
    pub fn len(&self) -> usize {
        self.sim.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sim.is_empty()
    }

    /// The shared, read-only similarity matrix.
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.sim
    }

    pub fn metadata(&self) -> &MetadataTable {
        &self.metadata
    }

    /// Top-K neighbors of `node_id` as bare (id, score) hits.
    pub fn top_k(&self, node_id: usize, k: usize) -> Result<TopKResult> {
        query::top_k_neighbors(&self.sim, node_id, k)
    }

    /// Top-K neighbors joined with their metadata, the shape the rendering
    /// layer and the HTTP endpoint consume.
    pub fn top_k_with_metadata(&self, node_id: usize, k: usize) -> Result<Vec<NeighborInfo>> {
        let result = self.top_k(node_id, k)?;
        Ok(result
            .hits
            .iter()
            .map(|hit| {
                // Alignment was validated at construction; ids come from the matrix
                let meta = self
                    .metadata
                    .get(hit.id)
                    .expect("neighbor id within validated metadata range");
                NeighborInfo {
                    id: hit.id,
                    title: meta.title.clone(),
                    link: meta.link.clone(),
                    keywords: meta.keywords.clone(),
                    score: hit.score,
                }
            })
            .collect())
    }
}
