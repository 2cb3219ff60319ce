//! Thresholded similarity graphs and the forced-edge display overlay.
//!
//! High-level policy:
//! - The graph is a pure function of (similarity matrix, threshold): nodes are
//!   document ids, and an edge (i, j) exists iff `sim[i][j] > threshold`
//!   (strict). All N nodes are present regardless of connectivity; isolated
//!   nodes stay visible downstream.
//! - Different call sites may derive graphs of different density from the same
//!   matrix (e.g. 0.5 for a browsable view, 0.9 for a dense-cut view) without
//!   recomputing similarities.
//! - Display-only edges (top-K highlighting) never mutate the base graph; they
//!   live in a separate [`EdgeOverlay`] consumed by the rendering layer.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use log::{debug, info};

use crate::query::TopKResult;
use crate::similarity::SimilarityMatrix;

/// An undirected weighted edge between two document nodes, stored with
/// `source < target`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

// Custom PartialEq implementation using approximate equality for the weight
impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.target == other.target
            && approx::relative_eq!(self.weight, other.weight)
    }
}

/// Graph factory: all graphs are derived from a similarity matrix by
/// thresholding; the matrix itself is never modified.
pub struct GraphFactory;

impl GraphFactory {
    /// Build the undirected graph of all pairs whose similarity strictly
    /// exceeds `threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use simgraph::core::FeatureMatrix;
    /// use simgraph::graph::GraphFactory;
    /// use simgraph::similarity::SimilarityMatrix;
    ///
    /// let features = FeatureMatrix::from_rows(vec![
    ///     vec![1.0, 0.0],
    ///     vec![1.0, 0.1],
    ///     vec![0.0, 1.0],
    /// ]).unwrap();
    /// let sim = SimilarityMatrix::compute(&features);
    ///
    /// let graph = GraphFactory::build_graph(&sim, 0.5);
    /// assert_eq!(graph.nnodes(), 3);
    /// assert!(graph.has_edge(0, 1));
    /// assert!(!graph.has_edge(0, 2));
    /// ```
    pub fn build_graph(sim: &SimilarityMatrix, threshold: f64) -> SimilarityGraph {
        let n = sim.len();
        info!("Building graph for {} nodes with threshold {}", n, threshold);

        let mut edges = Vec::new();
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let weight = sim.get(i, j);
                if weight > threshold {
                    edges.push(Edge { source: i, target: j, weight });
                    adjacency[i].push((j, weight));
                    adjacency[j].push((i, weight));
                }
            }
        }

        let graph = SimilarityGraph { nnodes: n, threshold, edges, adjacency };
        debug!("Graph built: {}", graph.stats());
        graph
    }
}

/// Undirected weighted graph over document nodes `0..N`.
///
/// No self-loops, at most one edge per unordered pair.
#[derive(Debug, Clone)]
pub struct SimilarityGraph {
    nnodes: usize,
    threshold: f64,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl SimilarityGraph {
    /// Number of nodes (isolated nodes included).
    pub fn nnodes(&self) -> usize {
        self.nnodes
    }

    /// The threshold this graph was derived with.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edges, each once, with `source < target`.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Neighbors of node `i` with edge weights, ascending by neighbor id.
    pub fn neighbors(&self, i: usize) -> &[(usize, f64)] {
        assert!(i < self.nnodes, "Node {} out of bounds for {} nodes", i, self.nnodes);
        &self.adjacency[i]
    }

    pub fn degree(&self, i: usize) -> usize {
        self.neighbors(i).len()
    }

    /// Whether the unordered pair (i, j) cleared the threshold.
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        assert!(
            i < self.nnodes && j < self.nnodes,
            "Edge query ({}, {}) out of bounds for {} nodes",
            i,
            j,
            self.nnodes
        );
        if i == j {
            return false;
        }
        self.adjacency[i].iter().any(|&(n, _)| n == j)
    }

    pub fn stats(&self) -> GraphStats {
        let isolated = (0..self.nnodes).filter(|&i| self.adjacency[i].is_empty()).count();
        let max_edges = self.nnodes * self.nnodes.saturating_sub(1) / 2;
        GraphStats {
            nnodes: self.nnodes,
            nedges: self.edges.len(),
            isolated_nodes: isolated,
            density: if max_edges > 0 {
                self.edges.len() as f64 / max_edges as f64
            } else {
                0.0
            },
            threshold: self.threshold,
        }
    }
}

/// Summary statistics for a thresholded graph.
#[derive(Debug, Clone)]
pub struct GraphStats {
    pub nnodes: usize,
    pub nedges: usize,
    pub isolated_nodes: usize,
    pub density: f64,
    pub threshold: f64,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} edges ({} isolated, density {:.4}) at threshold {}",
            self.nnodes, self.nedges, self.isolated_nodes, self.density, self.threshold
        )
    }
}

impl fmt::Display for SimilarityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SimilarityGraph: {}", self.stats())?;
        if self.nnodes <= 10 {
            for edge in &self.edges {
                writeln!(
                    f,
                    "  {} -- {} (weight {:.4})",
                    edge.source, edge.target, edge.weight
                )?;
            }
        }
        Ok(())
    }
}

/// Display-time forced edges, layered over a base graph without mutating it.
///
/// Used to render a query node's top-K relationships even when those pairs
/// did not clear the graph threshold. Pairs are stored normalized so
/// membership is orientation-insensitive.
#[derive(Debug, Clone, Default)]
pub struct EdgeOverlay {
    pairs: HashSet<(usize, usize)>,
}

impl EdgeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the overlay connecting a query node to each of its top-K hits.
    pub fn from_top_k(result: &TopKResult) -> Self {
        let mut overlay = Self::new();
        for hit in &result.hits {
            overlay.insert(result.node_id, hit.id);
        }
        overlay
    }

    /// Add the unordered pair (i, j). Self-pairs are ignored.
    pub fn insert(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.pairs.insert((i.min(j), i.max(j)));
    }

    /// Whether (i, j), in either orientation, is forced.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.pairs.contains(&(i.min(j), i.max(j)))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The normalized pairs, for the rendering layer.
    pub fn pairs(&self) -> impl Iterator<Item = &(usize, usize)> {
        self.pairs.iter()
    }
}
