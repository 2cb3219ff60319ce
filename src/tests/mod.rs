mod test_clustering;
mod test_core;
mod test_graph;

use crate::core::{DocumentMetadata, FeatureMatrix, MetadataTable};
use crate::similarity::SimilarityMatrix;

/// Worked example: documents 0 and 1 share identical vectors, 2 and 3 are
/// orthogonal to them and to each other.
pub fn sample_features() -> FeatureMatrix {
    FeatureMatrix::from_rows(vec![
        vec![1.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ])
    .unwrap()
}

pub fn sample_similarity() -> SimilarityMatrix {
    SimilarityMatrix::compute(&sample_features())
}

pub fn sample_metadata(n: usize) -> MetadataTable {
    MetadataTable::new(
        (0..n)
            .map(|i| {
                DocumentMetadata::new(
                    format!("Article {i}"),
                    format!("https://example.org/articles/{i}"),
                )
                .with_keywords(vec![format!("keyword{i}")])
            })
            .collect(),
    )
}
