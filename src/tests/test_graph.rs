//! Tests for thresholded graph derivation and the forced-edge overlay.

use crate::core::FeatureMatrix;
use crate::graph::{EdgeOverlay, GraphFactory};
use crate::query::top_k_neighbors;
use crate::similarity::SimilarityMatrix;

use super::sample_similarity;

// -------------------- Threshold semantics --------------------

#[test]
fn test_edge_iff_similarity_exceeds_threshold() {
    let sim = sample_similarity();
    let graph = GraphFactory::build_graph(&sim, 0.5);

    assert_eq!(graph.nnodes(), 4);
    assert!(graph.has_edge(0, 1), "identical documents must connect");
    assert!(!graph.has_edge(0, 2));
    assert!(!graph.has_edge(2, 3));
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_threshold_above_one_yields_no_edges() {
    let sim = sample_similarity();
    let graph = GraphFactory::build_graph(&sim, 1.1);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.nnodes(), 4);
}

#[test]
fn test_threshold_is_strict() {
    // sim(0, 1) is exactly 1.0; a threshold of 1.0 must suppress the edge
    let sim = sample_similarity();
    let graph = GraphFactory::build_graph(&sim, 1.0);
    assert!(!graph.has_edge(0, 1));
}

#[test]
fn test_zero_threshold_gives_complete_graph_for_positive_matrix() {
    let features = FeatureMatrix::from_rows(vec![
        vec![1.0, 0.1, 0.1],
        vec![0.1, 1.0, 0.1],
        vec![0.1, 0.1, 1.0],
    ])
    .unwrap();
    let sim = SimilarityMatrix::compute(&features);

    let graph = GraphFactory::build_graph(&sim, 0.0);
    // complete graph minus self-loops
    assert_eq!(graph.edge_count(), 3);
    for i in 0..3 {
        assert!(!graph.has_edge(i, i));
        assert_eq!(graph.degree(i), 2);
    }
}

#[test]
fn test_negative_threshold_gives_complete_graph() {
    // orthogonal pairs sit at exactly 0; a negative cutoff admits them all
    let sim = sample_similarity();
    let graph = GraphFactory::build_graph(&sim, -0.1);
    assert_eq!(graph.edge_count(), 6);
    for i in 0..4 {
        assert_eq!(graph.degree(i), 3);
        assert!(!graph.has_edge(i, i));
    }
}

#[test]
fn test_edge_weights_carry_similarity() {
    let sim = sample_similarity();
    let graph = GraphFactory::build_graph(&sim, 0.5);
    let edge = graph.edges()[0];
    assert_eq!((edge.source, edge.target), (0, 1));
    assert_eq!(edge.weight, sim.get(0, 1));
}

#[test]
fn test_varying_threshold_without_recomputation() {
    let sim = sample_similarity();
    let loose = GraphFactory::build_graph(&sim, 0.0);
    let tight = GraphFactory::build_graph(&sim, 0.9);
    assert!(loose.edge_count() >= tight.edge_count());
    // the matrix itself is untouched either way
    assert_eq!(sim.get(0, 1), 1.0);
}

// -------------------- Node bookkeeping --------------------

#[test]
fn test_isolated_nodes_remain_visible() {
    let sim = sample_similarity();
    let graph = GraphFactory::build_graph(&sim, 0.5);
    let stats = graph.stats();

    assert_eq!(stats.nnodes, 4);
    assert_eq!(stats.isolated_nodes, 2, "documents 2 and 3 have no edges at 0.5");
    assert_eq!(graph.degree(2), 0);
}

#[test]
fn test_neighbors_sorted_by_id() {
    let features = FeatureMatrix::from_rows(vec![
        vec![1.0, 0.2],
        vec![1.0, 0.1],
        vec![1.0, 0.3],
    ])
    .unwrap();
    let sim = SimilarityMatrix::compute(&features);
    let graph = GraphFactory::build_graph(&sim, 0.5);

    let ids: Vec<usize> = graph.neighbors(1).iter().map(|&(j, _)| j).collect();
    assert_eq!(ids, vec![0, 2]);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_neighbors_out_of_bounds_panics() {
    let graph = GraphFactory::build_graph(&sample_similarity(), 0.5);
    graph.neighbors(99);
}

// -------------------- Forced-edge overlay --------------------

#[test]
fn test_overlay_from_top_k_is_orientation_insensitive() {
    let sim = sample_similarity();
    let top = top_k_neighbors(&sim, 0, 2).unwrap();
    let overlay = EdgeOverlay::from_top_k(&top);

    assert_eq!(overlay.len(), 2);
    for hit in &top.hits {
        assert!(overlay.contains(0, hit.id));
        assert!(overlay.contains(hit.id, 0));
    }
}

#[test]
fn test_overlay_does_not_mutate_base_graph() {
    let sim = sample_similarity();
    let graph = GraphFactory::build_graph(&sim, 0.5);
    let edges_before = graph.edge_count();

    let top = top_k_neighbors(&sim, 0, 3).unwrap();
    let overlay = EdgeOverlay::from_top_k(&top);

    // node 2 is a top hit of node 0 but the pair never cleared the threshold
    assert!(overlay.contains(0, 2));
    assert!(!graph.has_edge(0, 2));
    assert_eq!(graph.edge_count(), edges_before);
}

#[test]
fn test_overlay_ignores_self_pairs() {
    let mut overlay = EdgeOverlay::new();
    overlay.insert(3, 3);
    assert!(overlay.is_empty());

    overlay.insert(1, 2);
    overlay.insert(2, 1);
    assert_eq!(overlay.len(), 1);
}
