#![forbid(unsafe_code)]
//! Bipartite graph ranking: HITS, CoHITS, BGRM, and BiRank over sparse
//! edge data.
//!
//! # Overview
//!
//! A bipartite graph connects two disjoint node sets — senders ("rows")
//! and receivers ("columns"). This crate scores both sets by relative
//! importance: raw data (edge lists, dense matrices, petgraph digraphs)
//! is built into a canonical sparse form by [`graph`], then ranked by the
//! damped alternating power iteration in [`rank`]. Four normalization
//! schemes share that one solver and differ only in how the transition
//! operators are scaled.
//!
//! ```rust,ignore
//! use birank_core::{bipartite_rank, BipartiteGraph, BipartiteRankConfig, Normalizer};
//!
//! let graph = BipartiteGraph::from_edges([("u1", "v1"), ("u1", "v2"), ("u2", "v1")])?;
//! let config = BipartiteRankConfig {
//!     normalizer: Normalizer::BiRank,
//!     ..Default::default()
//! };
//! let result = bipartite_rank(&graph, &config)?;
//! assert!(result.converged);
//! ```
//!
//! One-mode data has its own path: [`rank::pagerank`] ranks a single node
//! space directly, and [`graph::project_to_one_mode`] collapses a
//! bipartite graph onto either side first.
//!
//! # Conventions
//!
//! - **Errors**: fallible entry points return [`RankError`]; binaries wrap
//!   it in `anyhow::Result` at the boundary.
//! - **Logging**: `tracing` macros (`warn!`, `debug!`, `trace!`). Solvers
//!   warn on non-convergence and trace per-iteration deltas.
//! - **Non-convergence is not an error**: exhausting the iteration budget
//!   sets `converged: false` on the result and still returns the vectors.

pub mod error;
pub mod graph;
pub mod rank;
pub mod table;

// Re-export the primary surface at crate level for convenience.
pub use error::RankError;
pub use graph::{
    project_to_one_mode, BipartiteGraph, BipartiteMatrix, BuildConfig, DuplicatePolicy, LabelMap,
    NodeId, OneModeGraph, ProjectionMode,
};
pub use rank::{
    bgrm, bipartite_rank, birank, cohits, hits, pagerank, pagerank_projected, rank_table,
    BipartiteRankConfig, BipartiteRankResult, Normalizer, PageRankConfig, PageRankResult,
    RankVector, ReturnMode,
};
pub use table::{EdgeTable, Value};
