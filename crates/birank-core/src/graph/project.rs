//! One-mode projection of a bipartite graph.
//!
//! # Overview
//!
//! Projection collapses a bipartite graph onto one of its node sets: two
//! senders become adjacent when they share a receiver, with the connection
//! weighted by the products of the shared edges' weights. Algebraically the
//! rows projection is `W · Wᵗ` and the columns projection is `Wᵗ · W`.
//!
//! The self-loop diagonal (each node's summed squared edge weights) is
//! kept: under a downstream PageRank it lets a node retain part of its own
//! mass in proportion to its edge strength, which is usually the wanted
//! reading of co-occurrence data.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::RankError;
use crate::graph::build::{BipartiteGraph, OneModeGraph};
use crate::graph::matrix::{BipartiteMatrix, DuplicatePolicy};

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Which node set the projection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Keep senders: `W · Wᵗ`.
    Rows,
    /// Keep receivers: `Wᵗ · W`.
    Columns,
}

impl FromStr for ProjectionMode {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rows" => Ok(Self::Rows),
            "columns" => Ok(Self::Columns),
            _ => Err(RankError::InvalidInput(format!(
                "unknown projection mode {s:?} (expected rows or columns)"
            ))),
        }
    }
}

/// Project `graph` onto one node set.
///
/// Runs in time proportional to the sum over the collapsed side of the
/// squared per-node degree count, which is the size of the output plus
/// duplicate products. Dense hub nodes on the collapsed side make the
/// projection quadratically heavier.
#[instrument(skip(graph))]
#[must_use]
pub fn project_to_one_mode(graph: &BipartiteGraph, mode: ProjectionMode) -> OneModeGraph {
    let matrix = &graph.matrix;
    let (n, labels) = match mode {
        ProjectionMode::Rows => (matrix.n_rows(), graph.row_labels.clone()),
        ProjectionMode::Columns => (matrix.n_cols(), graph.col_labels.clone()),
    };

    let mut products = Vec::new();
    match mode {
        // Senders i and i' co-occur through every receiver j they share:
        // walk each column and pair up its rows.
        ProjectionMode::Rows => {
            for j in 0..matrix.n_cols() {
                let entries: Vec<(usize, f64)> = matrix.column(j).collect();
                for &(a, wa) in &entries {
                    for &(b, wb) in &entries {
                        products.push((a, b, wa * wb));
                    }
                }
            }
        }
        ProjectionMode::Columns => {
            for i in 0..matrix.n_rows() {
                let entries: Vec<(usize, f64)> = matrix.row(i).collect();
                for &(a, wa) in &entries {
                    for &(b, wb) in &entries {
                        products.push((a, b, wa * wb));
                    }
                }
            }
        }
    }

    let projected = BipartiteMatrix::from_triplets(n, n, &products, DuplicatePolicy::Add);
    debug!(nodes = n, nnz = projected.nnz(), "projected to one mode");
    OneModeGraph {
        matrix: projected,
        labels,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
