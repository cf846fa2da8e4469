//! Bipartite graph construction and bookkeeping.
//!
//! # Overview
//!
//! This module turns raw edge data into the canonical sparse form the
//! ranking solvers consume: a [`BipartiteMatrix`] addressed by dense
//! indices, plus [`LabelMap`]s that translate those indices back to the
//! caller's identifiers.
//!
//! ## Pipeline
//!
//! ```text
//! EdgeTable / DMatrix / triplets / DiGraph
//!        ↓  build::BipartiteGraph::from_*()
//! BipartiteGraph { matrix: W, row_labels, col_labels }
//!        ↓  rank::bipartite (HITS / CoHITS / BGRM / BiRank)
//!        ↓  project::project_to_one_mode()
//! OneModeGraph { matrix: W·Wᵗ or Wᵗ·W, labels }
//!        ↓  rank::pagerank
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use birank_core::graph::{BipartiteGraph, BuildConfig};
//!
//! let graph = BipartiteGraph::from_edges([("u1", "v1"), ("u1", "v2"), ("u2", "v1")])?;
//! println!("{} senders, {} receivers, {} edges",
//!     graph.matrix.n_rows(), graph.matrix.n_cols(), graph.matrix.nnz());
//! ```

pub mod build;
pub mod labels;
pub mod matrix;
pub mod project;

// Re-export primary types at module level for convenience.
pub use build::{BipartiteGraph, BuildConfig, OneModeGraph};
pub use labels::{LabelMap, NodeId};
pub use matrix::{BipartiteMatrix, DuplicatePolicy};
pub use project::{project_to_one_mode, ProjectionMode};
