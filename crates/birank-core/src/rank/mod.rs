//! Rank estimation solvers.
//!
//! # Overview
//!
//! Two solvers operate on the canonical graphs from [`crate::graph`]:
//!
//! - **Bipartite rank** (`bipartite`): the two-mode damped power iteration
//!   behind HITS, CoHITS, BGRM, and BiRank. One iteration loop serves all
//!   four; a [`Normalizer`](normalizer::Normalizer) selects how the
//!   transition operators are scaled.
//! - **PageRank** (`pagerank`): the one-mode counterpart, for single-space
//!   edge lists and for bipartite graphs collapsed through
//!   [`project_to_one_mode`](crate::graph::project::project_to_one_mode).
//!
//! # Usage
//!
//! Solvers take a built graph plus a config struct and return labeled
//! scores. Non-convergence is a flag on the result, not an error.
//!
//! ```rust,ignore
//! use birank_core::graph::BipartiteGraph;
//! use birank_core::rank::{bipartite_rank, BipartiteRankConfig, Normalizer};
//!
//! let graph = BipartiteGraph::from_edges([("u1", "v1"), ("u1", "v2"), ("u2", "v1")])?;
//! let config = BipartiteRankConfig { normalizer: Normalizer::BiRank, ..Default::default() };
//! let result = bipartite_rank(&graph, &config)?;
//! for (label, score) in result.rows.unwrap() {
//!     println!("{label}\t{score:.6}");
//! }
//! ```

pub mod bipartite;
pub mod normalizer;
pub mod pagerank;

// Re-export primary types at module level for convenience.
pub use bipartite::{
    bgrm, bipartite_rank, birank, cohits, hits, rank_table, BipartiteRankConfig,
    BipartiteRankResult, RankVector, ReturnMode,
};
pub use normalizer::{Normalizer, TransitionScaling};
pub use pagerank::{pagerank, pagerank_projected, PageRankConfig, PageRankResult};
