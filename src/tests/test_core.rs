//! Tests for container validation and the corpus index alignment invariant.

use crate::core::{CorpusIndex, FeatureMatrix};
use crate::error::Error;
use crate::similarity::SimilarityMatrix;

use super::{sample_metadata, sample_similarity};

// -------------------- FeatureMatrix validation --------------------

#[test]
fn test_ragged_rows_are_malformed() {
    let result = FeatureMatrix::from_rows(vec![vec![1.0, 2.0], vec![1.0]]);
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

#[test]
fn test_empty_matrix_is_malformed() {
    let result = FeatureMatrix::from_rows(Vec::new());
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

#[test]
fn test_negative_feature_is_malformed() {
    let result = FeatureMatrix::from_rows(vec![vec![1.0, -0.5]]);
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

#[test]
fn test_non_finite_feature_is_malformed() {
    let result = FeatureMatrix::from_rows(vec![vec![1.0, f64::NAN]]);
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

#[test]
fn test_zero_rows_are_accepted() {
    let features = FeatureMatrix::from_rows(vec![vec![0.0, 0.0], vec![1.0, 0.0]]).unwrap();
    assert_eq!(features.len(), 2);
}

// -------------------- CorpusIndex alignment --------------------

#[test]
fn test_aligned_index_builds() {
    let index = CorpusIndex::new(sample_similarity(), sample_metadata(4)).unwrap();
    assert_eq!(index.len(), 4);
    assert_eq!(index.metadata().get(2).unwrap().title, "Article 2");
}

#[test]
fn test_row_count_mismatch_is_malformed() {
    let result = CorpusIndex::new(sample_similarity(), sample_metadata(3));
    assert!(matches!(result, Err(Error::MalformedInput(_))));

    let result = CorpusIndex::new(sample_similarity(), sample_metadata(5));
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

#[test]
fn test_asymmetric_matrix_is_malformed() {
    let sim = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.9],
        vec![0.1, 1.0],
    ])
    .unwrap();
    let result = CorpusIndex::new(sim, sample_metadata(2));
    assert!(matches!(result, Err(Error::MalformedInput(_))));
}

// -------------------- Metadata join --------------------

#[test]
fn test_top_k_with_metadata_joins_titles_and_links() {
    let index = CorpusIndex::new(sample_similarity(), sample_metadata(4)).unwrap();
    let neighbors = index.top_k_with_metadata(0, 2).unwrap();

    assert_eq!(neighbors.len(), 2);
    assert_eq!(neighbors[0].id, 1);
    assert_eq!(neighbors[0].title, "Article 1");
    assert_eq!(neighbors[0].link, "https://example.org/articles/1");
    assert_eq!(neighbors[0].keywords, vec!["keyword1".to_string()]);
}

#[test]
fn test_top_k_with_metadata_propagates_invalid_argument() {
    let index = CorpusIndex::new(sample_similarity(), sample_metadata(4)).unwrap();
    assert!(matches!(
        index.top_k_with_metadata(42, 2),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        index.top_k_with_metadata(0, 0),
        Err(Error::InvalidArgument(_))
    ));
}
