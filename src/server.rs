//! HTTP query surface for the rendering layer.
//!
//! Endpoints:
//! - `GET /api/top_neighbors?node_id=<int>[&k=<int>]`: top-K neighbors of a
//!   selected node with their metadata; client error status when `node_id`
//!   is missing or out of range.
//! - `GET /api/graph[?threshold=<float>]`: the unfiltered node/edge listing
//!   used when nothing is selected, derivable at any threshold without
//!   recomputing similarities.
//!
//! The shared index is immutable; concurrent requests clone an `Arc`
//! snapshot under a read lock and never interact. Recomputation is a write
//! phase: a fresh index is built elsewhere and swapped in atomically via
//! [`ServerState::swap`]; the old snapshot stays valid for requests that
//! already hold it.

use std::sync::{Arc, RwLock};

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use serde::{Deserialize, Serialize};

use log::{debug, info, warn};

use crate::builder::CorpusBuild;
use crate::clustering::ClusterAssignment;
use crate::core::CorpusIndex;
use crate::error::{Error, Result};
use crate::graph::{Edge, GraphFactory};
use crate::query::NeighborInfo;

/// One immutable, atomically-replaceable view of the corpus.
#[derive(Clone)]
pub struct CorpusSnapshot {
    pub index: Arc<CorpusIndex>,
    pub clusters: Option<Arc<ClusterAssignment>>,
}

/// Shared server state: the current snapshot plus display defaults.
pub struct ServerState {
    snapshot: RwLock<CorpusSnapshot>,
    default_threshold: f64,
    default_k: usize,
}

impl ServerState {
    pub fn new(
        index: CorpusIndex,
        clusters: Option<ClusterAssignment>,
        default_threshold: f64,
        default_k: usize,
    ) -> Self {
        Self {
            snapshot: RwLock::new(CorpusSnapshot {
                index: Arc::new(index),
                clusters: clusters.map(Arc::new),
            }),
            default_threshold,
            default_k,
        }
    }

    /// Adopt a completed build, taking its display defaults along.
    pub fn from_build(build: CorpusBuild) -> Self {
        let threshold = build.graph.threshold();
        Self::new(build.index, build.clusters, threshold, build.default_top_k)
    }

    /// Current snapshot; cheap Arc clones under a read lock.
    pub fn snapshot(&self) -> CorpusSnapshot {
        self.snapshot.read().expect("snapshot lock poisoned").clone()
    }

    /// Write phase: swap in a freshly built index. Readers holding the old
    /// snapshot are unaffected.
    pub fn swap(&self, index: CorpusIndex, clusters: Option<ClusterAssignment>) {
        info!("Swapping in new corpus index with {} documents", index.len());
        let mut guard = self.snapshot.write().expect("snapshot lock poisoned");
        *guard = CorpusSnapshot {
            index: Arc::new(index),
            clusters: clusters.map(Arc::new),
        };
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TopNeighborsQuery {
    pub node_id: Option<usize>,
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopNeighborsResponse {
    pub top_neighbors: Vec<NeighborInfo>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    pub threshold: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct GraphNode {
    pub id: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
    pub threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message.into() }))
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/top_neighbors?node_id=<int>[&k=<int>]`
pub async fn top_neighbors_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<TopNeighborsQuery>,
) -> impl IntoResponse {
    let Some(node_id) = params.node_id else {
        warn!("top_neighbors request without node_id");
        return bad_request("missing node_id").into_response();
    };
    let k = params.k.unwrap_or(state.default_k);

    let snapshot = state.snapshot();
    match snapshot.index.top_k_with_metadata(node_id, k) {
        Ok(top_neighbors) => {
            debug!("top_neighbors({}, {}): {} hits", node_id, k, top_neighbors.len());
            Json(TopNeighborsResponse { top_neighbors }).into_response()
        }
        // Per-query failure; the shared index is untouched
        Err(err @ Error::InvalidArgument(_)) => bad_request(err.to_string()).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: err.to_string() }),
        )
            .into_response(),
    }
}

/// `GET /api/graph[?threshold=<float>]`
pub async fn graph_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<GraphQuery>,
) -> impl IntoResponse {
    let threshold = params.threshold.unwrap_or(state.default_threshold);
    let snapshot = state.snapshot();

    let graph = GraphFactory::build_graph(snapshot.index.similarity(), threshold);
    let nodes = (0..snapshot.index.len())
        .map(|id| GraphNode {
            id,
            title: snapshot
                .index
                .metadata()
                .get(id)
                .map(|m| m.title.clone())
                .unwrap_or_default(),
            cluster: snapshot.clusters.as_ref().map(|c| c.label(id)),
        })
        .collect();

    Json(GraphResponse {
        nodes,
        edges: graph.edges().to_vec(),
        threshold,
    })
}

// ============================================================================
// Router / server
// ============================================================================

/// Build the API router over shared state.
pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/api/top_neighbors", get(top_neighbors_handler))
        .route("/api/graph", get(graph_handler))
        .with_state(state)
        .layer(cors)
}

/// Bind and serve until the process is stopped.
pub async fn run_server(state: Arc<ServerState>, addr: std::net::SocketAddr) -> Result<()> {
    info!("Serving similarity graph API on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
