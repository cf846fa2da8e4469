//! One-mode PageRank over a square adjacency.
//!
//! # Overview
//!
//! The single-node-space counterpart of the bipartite solver: damped power
//! iteration where each node divides its outgoing weight among its
//! targets. Useful directly on one-mode edge lists, and on bipartite data
//! after collapsing one side with
//! [`project_to_one_mode`](crate::graph::project::project_to_one_mode).
//!
//! # Algorithm
//!
//! ```text
//! x ← x0                     (uniform over connected nodes)
//! repeat up to max_iter times:
//!     x'[j] = alpha · ( Σ_{i→j} w_ij / out(i) · x[i]  +  dangling / n )
//!           + (1 − alpha) · x0[j]
//!     stop when Σ|x' − x| < tol
//! ```
//!
//! Nodes with outgoing weight 0 are dangling: their mass is spread evenly
//! over every connected node each iteration, so total mass stays 1.
//! Nodes with no edges in either direction are isolates — pinned at 0,
//! outside the teleport population, and absent from the output.

use serde::Serialize;
use tracing::{instrument, trace, warn};

use crate::error::RankError;
use crate::graph::build::{BipartiteGraph, OneModeGraph};
use crate::graph::project::{project_to_one_mode, ProjectionMode};
use crate::rank::bipartite::RankVector;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for one-mode PageRank.
#[derive(Debug, Clone)]
pub struct PageRankConfig {
    /// Damping factor in (0, 1]. Default: 0.85.
    pub alpha: f64,
    /// Maximum number of iterations. Default: 200.
    pub max_iter: usize,
    /// Convergence threshold on the L1 movement of the rank vector.
    /// Default: 1e-4.
    pub tol: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            alpha: 0.85,
            max_iter: 200,
            tol: 1e-4,
        }
    }
}

impl PageRankConfig {
    /// Check every parameter against its documented domain.
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidParameter`] naming the first offending
    /// parameter.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<(), RankError> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(RankError::InvalidParameter {
                name: "alpha",
                value: self.alpha,
                expected: "a damping factor in (0, 1]",
            });
        }
        if self.max_iter == 0 {
            return Err(RankError::InvalidParameter {
                name: "max_iter",
                value: self.max_iter as f64,
                expected: "at least one iteration",
            });
        }
        if !(self.tol > 0.0) {
            return Err(RankError::InvalidParameter {
                name: "tol",
                value: self.tol,
                expected: "a positive tolerance",
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Result of a one-mode PageRank computation.
#[derive(Debug, Clone, Serialize)]
pub struct PageRankResult {
    /// Labeled scores in first-occurrence order, isolates excluded.
    pub scores: RankVector,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the delta dropped below tolerance within `max_iter`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Rank the nodes of a one-mode graph.
///
/// Non-convergence is reported through the `converged` flag, never as an
/// `Err`; the last vector is always returned.
///
/// # Errors
///
/// [`RankError::InvalidParameter`] when the configuration fails
/// [`PageRankConfig::validate`].
#[instrument(skip(graph, config))]
#[allow(clippy::cast_precision_loss)]
pub fn pagerank(graph: &OneModeGraph, config: &PageRankConfig) -> Result<PageRankResult, RankError> {
    config.validate()?;

    let matrix = &graph.matrix;
    debug_assert!(matrix.is_square(), "one-mode adjacency must be square");
    let n = matrix.n_rows();

    let out_degrees = matrix.row_degrees();
    let in_degrees = matrix.col_degrees();
    // Connected = any incident edge, in either direction.
    let connected: Vec<bool> = out_degrees
        .iter()
        .zip(&in_degrees)
        .map(|(o, i)| o + i > 0.0)
        .collect();
    let n_active = connected.iter().filter(|&&c| c).count();

    if n_active == 0 {
        return Ok(PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        });
    }

    let share = 1.0 / n_active as f64;
    let x0: Vec<f64> = connected
        .iter()
        .map(|&c| if c { share } else { 0.0 })
        .collect();
    let mut x = x0.clone();
    let mut x_next = vec![0.0; n];

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter && !converged {
        iterations += 1;

        let dangling: f64 = (0..n)
            .filter(|&i| connected[i] && out_degrees[i] == 0.0)
            .map(|i| x[i])
            .sum();
        let dangling_share = dangling / n_active as f64;

        for (j, next) in x_next.iter_mut().enumerate() {
            if !connected[j] {
                *next = 0.0;
                continue;
            }
            let inflow: f64 = matrix
                .column(j)
                .map(|(i, w)| w / out_degrees[i] * x[i])
                .sum();
            *next = config.alpha * (inflow + dangling_share) + (1.0 - config.alpha) * x0[j];
        }

        let delta: f64 = x.iter().zip(&x_next).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut x, &mut x_next);
        trace!(iteration = iterations, delta, "pagerank update");

        if delta < config.tol {
            converged = true;
        }
    }

    if !converged {
        warn!(
            iterations,
            tol = config.tol,
            "iteration budget exhausted before convergence; returning last vector"
        );
    }

    let mut scores = Vec::with_capacity(n_active);
    for (i, label) in graph.labels.iter().enumerate() {
        if connected[i] {
            scores.push((label.clone(), x[i]));
        }
    }
    Ok(PageRankResult {
        scores,
        iterations,
        converged,
    })
}

/// Collapse one side of a bipartite graph and rank the projection.
///
/// The projection keeps its self-loop diagonal, so every projected node
/// retains part of its own mass each step.
///
/// # Errors
///
/// Same conditions as [`pagerank`].
pub fn pagerank_projected(
    graph: &BipartiteGraph,
    mode: ProjectionMode,
    config: &PageRankConfig,
) -> Result<PageRankResult, RankError> {
    pagerank(&project_to_one_mode(graph, mode), config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::labels::NodeId;
    use crate::graph::matrix::DuplicatePolicy;

    fn score_of(scores: &RankVector, label: &str) -> f64 {
        scores
            .iter()
            .find(|(id, _)| id == &NodeId::from(label))
            .map(|(_, s)| *s)
            .unwrap_or_else(|| panic!("label {label} missing from {scores:?}"))
    }

    #[test]
    fn rank_accumulates_down_a_chain() {
        let graph = OneModeGraph::from_edges([("a", "b"), ("b", "c")]).expect("graph");
        let result = pagerank(&graph, &PageRankConfig::default()).expect("pagerank");

        assert!(result.converged);
        let s = &result.scores;
        assert!(score_of(s, "c") > score_of(s, "b"));
        assert!(score_of(s, "b") > score_of(s, "a"));
    }

    #[test]
    fn reverse_star_center_wins() {
        let graph =
            OneModeGraph::from_edges([("b", "a"), ("c", "a"), ("d", "a")]).expect("graph");
        let result = pagerank(&graph, &PageRankConfig::default()).expect("pagerank");

        let s = &result.scores;
        assert!(score_of(s, "a") > score_of(s, "b"));
        // Symmetric senders score alike.
        assert!((score_of(s, "b") - score_of(s, "d")).abs() < 1e-10);
    }

    #[test]
    fn scores_sum_to_one_despite_dangling_nodes() {
        // "b" and "c" have no outgoing edges.
        let graph = OneModeGraph::from_edges([("a", "b"), ("a", "c")]).expect("graph");
        let result = pagerank(&graph, &PageRankConfig::default()).expect("pagerank");

        let total: f64 = result.scores.iter().map(|(_, s)| s).sum();
        assert!((total - 1.0).abs() < 1e-6, "mass must be conserved, got {total}");
    }

    #[test]
    fn two_cycle_is_symmetric() {
        let graph = OneModeGraph::from_edges([("a", "b"), ("b", "a")]).expect("graph");
        let result = pagerank(&graph, &PageRankConfig::default()).expect("pagerank");
        let s = &result.scores;
        assert!((score_of(s, "a") - score_of(s, "b")).abs() < 1e-10);
    }

    #[test]
    fn empty_graph_is_a_trivial_success() {
        let graph = OneModeGraph::from_edges(std::iter::empty::<(&str, &str)>()).expect("graph");
        let result = pagerank(&graph, &PageRankConfig::default()).expect("pagerank");
        assert!(result.converged);
        assert!(result.scores.is_empty());
    }

    #[test]
    fn zero_weight_node_is_an_excluded_isolate() {
        let table = crate::table::EdgeTable::from_weighted_edges([
            ("a", "b", 1.0),
            ("ghost", "b", 0.0),
        ]);
        let config = crate::graph::build::BuildConfig {
            weight_column: Some("weight".to_string()),
            duplicates: DuplicatePolicy::Add,
            ..Default::default()
        };
        let graph = OneModeGraph::from_table(&table, &config).expect("graph");
        let result = pagerank(&graph, &PageRankConfig::default()).expect("pagerank");

        assert!(result
            .scores
            .iter()
            .all(|(id, _)| id != &NodeId::from("ghost")));
        assert_eq!(result.scores.len(), 2);
    }

    #[test]
    fn budget_exhaustion_is_flagged_not_fatal() {
        let graph = OneModeGraph::from_edges([("a", "b"), ("b", "c"), ("c", "a")]).expect("graph");
        let config = PageRankConfig {
            max_iter: 1,
            tol: 1e-15,
            ..PageRankConfig::default()
        };
        let result = pagerank(&graph, &config).expect("pagerank");
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.scores.len(), 3);
    }

    #[test]
    fn invalid_damping_is_rejected() {
        let graph = OneModeGraph::from_edges([("a", "b")]).expect("graph");
        let config = PageRankConfig {
            alpha: 0.0,
            ..PageRankConfig::default()
        };
        let err = pagerank(&graph, &config).unwrap_err();
        assert!(matches!(err, RankError::InvalidParameter { name: "alpha", .. }));
    }

    #[test]
    fn projected_pagerank_favors_the_busier_sender() {
        let graph = BipartiteGraph::from_edges([("u1", "v1"), ("u1", "v2"), ("u2", "v1")])
            .expect("graph");
        let result =
            pagerank_projected(&graph, ProjectionMode::Rows, &PageRankConfig::default())
                .expect("pagerank");

        let s = &result.scores;
        assert!(result.converged);
        assert!(score_of(s, "u1") > score_of(s, "u2"));
    }
}
