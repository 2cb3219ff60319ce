//! Tests for seeded cluster assignment: reproducibility, label ranges, and
//! argument validation.

use crate::clustering::assign_clusters;
use crate::core::FeatureMatrix;
use crate::error::Error;
use crate::similarity::SimilarityMatrix;

use super::sample_similarity;

/// Two tight groups with no exact duplicates, so k-means has an unambiguous
/// two-cluster structure to find.
fn grouped_similarity() -> SimilarityMatrix {
    let features = FeatureMatrix::from_rows(vec![
        vec![1.0, 0.0],
        vec![1.0, 0.1],
        vec![0.9, 0.05],
        vec![0.0, 1.0],
        vec![0.1, 1.0],
        vec![0.05, 0.9],
    ])
    .unwrap();
    SimilarityMatrix::compute(&features)
}

#[test]
fn test_fixed_seed_reproduces_labels() {
    let sim = grouped_similarity();
    let first = assign_clusters(&sim, 2, 42).unwrap();
    for _ in 0..3 {
        let again = assign_clusters(&sim, 2, 42).unwrap();
        assert_eq!(again.labels(), first.labels());
    }
}

#[test]
fn test_every_document_gets_exactly_one_label_in_range() {
    let sim = grouped_similarity();
    let assignment = assign_clusters(&sim, 3, 7).unwrap();

    assert_eq!(assignment.len(), sim.len());
    assert_eq!(assignment.k(), 3);
    for &label in assignment.labels() {
        assert!(label < 3, "label {} out of range", label);
    }
}

#[test]
fn test_separated_groups_land_in_different_clusters() {
    let sim = grouped_similarity();
    let assignment = assign_clusters(&sim, 2, 42).unwrap();

    // within-group labels agree
    assert_eq!(assignment.label(0), assignment.label(1));
    assert_eq!(assignment.label(0), assignment.label(2));
    assert_eq!(assignment.label(3), assignment.label(4));
    assert_eq!(assignment.label(3), assignment.label(5));
    // across-group labels differ
    assert_ne!(assignment.label(0), assignment.label(3));
}

#[test]
fn test_cluster_sizes_and_members_agree() {
    let sim = grouped_similarity();
    let assignment = assign_clusters(&sim, 2, 42).unwrap();

    let sizes = assignment.cluster_sizes();
    assert_eq!(sizes.iter().sum::<usize>(), sim.len());
    for c in 0..assignment.k() {
        assert_eq!(assignment.members(c).len(), sizes[c]);
    }
}

// -------------------- Argument validation --------------------

#[test]
fn test_zero_k_is_invalid_argument() {
    let sim = sample_similarity();
    assert!(matches!(assign_clusters(&sim, 0, 42), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_k_equal_to_n_is_invalid_argument() {
    let sim = sample_similarity();
    assert!(matches!(assign_clusters(&sim, 4, 42), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_k_above_n_is_invalid_argument() {
    let sim = sample_similarity();
    assert!(matches!(assign_clusters(&sim, 10, 42), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_seed_is_recorded() {
    let sim = grouped_similarity();
    let assignment = assign_clusters(&sim, 2, 1234).unwrap();
    assert_eq!(assignment.seed(), 1234);
}
