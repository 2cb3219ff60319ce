//! Command-line entry point: compute, query, cluster, and serve.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use simgraph::builder::CorpusIndexBuilder;
use simgraph::clustering::assign_clusters;
use simgraph::core::CorpusIndex;
use simgraph::error::{Error, Result};
use simgraph::server::{run_server, ServerState};
use simgraph::similarity::SimilarityMatrix;
use simgraph::storage;

/// Document similarity graphs from keyword feature vectors.
#[derive(Parser, Debug)]
#[command(name = "simgraph")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a similarity matrix from a feature CSV and persist it
    Compute {
        /// Feature CSV (leading identifier columns are stripped)
        #[arg(short, long)]
        features: PathBuf,
        /// Output path for the flat similarity matrix
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the top-K most similar documents for a node
    Top {
        /// Persisted similarity matrix
        #[arg(short, long)]
        matrix: PathBuf,
        /// Metadata CSV with Title and Link columns
        #[arg(long)]
        metadata: PathBuf,
        /// Query node id
        #[arg(short, long)]
        node_id: usize,
        /// Number of neighbors to return
        #[arg(short, long, default_value = "5")]
        k: usize,
    },
    /// Assign documents to clusters and print the grouping
    Clusters {
        /// Persisted similarity matrix
        #[arg(short, long)]
        matrix: PathBuf,
        /// Number of clusters
        #[arg(short, long, default_value = "6")]
        k: usize,
        /// Random seed for reproducible labels
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Serve the HTTP query API
    Serve {
        /// Persisted similarity matrix (alternative to --features)
        #[arg(short, long)]
        matrix: Option<PathBuf>,
        /// Feature CSV to compute the matrix from (alternative to --matrix)
        #[arg(short, long)]
        features: Option<PathBuf>,
        /// Metadata CSV with Title and Link columns
        #[arg(long)]
        metadata: PathBuf,
        /// Similarity cutoff for the displayed graph
        #[arg(short, long, default_value = "0.5")]
        threshold: f64,
        /// Default number of neighbors per top-K query
        #[arg(short, long, default_value = "5")]
        k: usize,
        /// Enable clustering with this many groups
        #[arg(short, long)]
        clusters: Option<usize>,
        /// Random seed for clustering
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Port to listen on
        #[arg(short, long, default_value = "8050")]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(args).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Compute { features, output } => {
            let features = storage::load_feature_matrix(&features)?;
            let sim = SimilarityMatrix::compute(&features);
            storage::save_similarity_matrix(&output, &sim)?;
            println!("{}", sim.stats());
            println!("wrote {}", output.display());
        }
        Command::Top { matrix, metadata, node_id, k } => {
            let sim = storage::load_similarity_matrix(&matrix)?;
            let metadata = storage::load_metadata(&metadata)?;
            let index = CorpusIndex::new(sim, metadata)?;

            for (rank, hit) in index.top_k_with_metadata(node_id, k)?.iter().enumerate() {
                println!("{}. {} (id {}, score {:.4})", rank + 1, hit.title, hit.id, hit.score);
                println!("   {}", hit.link);
            }
        }
        Command::Clusters { matrix, k, seed } => {
            let sim = storage::load_similarity_matrix(&matrix)?;
            let assignment = assign_clusters(&sim, k, seed)?;

            for (c, size) in assignment.cluster_sizes().iter().enumerate() {
                println!("cluster {}: {} documents", c, size);
            }
            for (id, label) in assignment.labels().iter().enumerate() {
                println!("{},{}", id, label);
            }
        }
        Command::Serve {
            matrix,
            features,
            metadata,
            threshold,
            k,
            clusters,
            seed,
            port,
        } => {
            let metadata = storage::load_metadata(&metadata)?;

            let state = match (matrix, features) {
                (Some(matrix), _) => {
                    let sim = storage::load_similarity_matrix(&matrix)?;
                    let index = CorpusIndex::new(sim, metadata)?;
                    let assignment = match clusters {
                        Some(c) => Some(assign_clusters(index.similarity(), c, seed)?),
                        None => None,
                    };
                    ServerState::new(index, assignment, threshold, k)
                }
                (None, Some(features)) => {
                    let features = storage::load_feature_matrix(&features)?;
                    let mut builder = CorpusIndexBuilder::new()
                        .with_threshold(threshold)
                        .with_top_k(k);
                    if let Some(c) = clusters {
                        builder = builder.with_clusters(c, seed);
                    }
                    ServerState::from_build(builder.build(&features, metadata)?)
                }
                (None, None) => {
                    return Err(Error::InvalidArgument(
                        "serve needs either --matrix or --features".into(),
                    ))
                }
            };

            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            run_server(Arc::new(state), addr).await?;
        }
    }

    Ok(())
}
