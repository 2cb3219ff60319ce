//! # simgraph
//!
//! Pairwise document similarity as an interactive graph backend: a validated
//! feature matrix goes in, and out come a symmetric cosine similarity matrix,
//! thresholded node-link graphs, deterministic top-K neighbor rankings, and an
//! optional seeded cluster assignment for visual grouping.
//!
//! The pipeline, leaves first:
//!
//! 1. [`similarity`]: exact pairwise cosine similarity (O(N²·F), rayon rows)
//! 2. [`graph`]: threshold-derived undirected weighted graphs plus the
//!    forced-edge display overlay
//! 3. [`query`]: top-K neighbor queries, independent of any graph threshold
//! 4. [`clustering`]: seeded K-Means over similarity profiles
//! 5. [`storage`]: CSV input and the flat persisted matrix format
//! 6. [`server`]: the optional HTTP query surface
//!
//! Layout and rendering are downstream consumers of these outputs, not part
//! of the crate.
//!
//! # Examples
//!
//! ```
//! use simgraph::builder::CorpusIndexBuilder;
//! use simgraph::core::{DocumentMetadata, FeatureMatrix, MetadataTable};
//!
//! let features = FeatureMatrix::from_rows(vec![
//!     vec![1.0, 0.0, 0.0],
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.0, 0.0, 1.0],
//! ]).unwrap();
//! let metadata = MetadataTable::new(
//!     (0..4)
//!         .map(|i| DocumentMetadata::new(format!("Article {i}"), format!("https://example.org/{i}")))
//!         .collect(),
//! );
//!
//! let build = CorpusIndexBuilder::new()
//!     .with_threshold(0.5)
//!     .with_clusters(2, 42)
//!     .build(&features, metadata)
//!     .unwrap();
//!
//! let top = build.index.top_k_with_metadata(0, 2).unwrap();
//! assert_eq!(top[0].id, 1);
//! ```

pub mod builder;
pub mod clustering;
pub mod core;
pub mod error;
pub mod graph;
pub mod query;
pub mod server;
pub mod similarity;
pub mod storage;

pub use crate::builder::{CorpusBuild, CorpusIndexBuilder};
pub use crate::core::{CorpusIndex, DocumentMetadata, FeatureMatrix, MetadataTable};
pub use crate::error::{Error, Result};
pub use crate::similarity::SimilarityMatrix;

#[cfg(test)]
mod tests;
