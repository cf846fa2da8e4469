//! Damped alternating power iteration over a bipartite graph.
//!
//! # Overview
//!
//! One solver serves all four normalization schemes. Given the adjacency
//! `W` and a [`Normalizer`], it derives the two transition operators and
//! alternates row-score and column-score updates until the combined
//! movement of both vectors drops below tolerance or the iteration budget
//! runs out.
//!
//! # Algorithm
//!
//! ```text
//! r ← r0, c ← c0            (uniform over non-isolates, isolates at 0)
//! repeat up to max_iter times:
//!     r' = alpha · S_d · c  + (1 − alpha) · r0
//!     c' = beta  · S_p · r' + (1 − beta)  · c0
//!     delta = Σ|r' − r| + Σ|c' − c|
//!     r ← r', c ← c'
//!     stop when delta < tol
//! ```
//!
//! `S_d` and `S_p` are never materialized; each update streams the sparse
//! entries of `W` through the normalizer's scaling vectors (see
//! [`crate::rank::normalizer`]).
//!
//! # Output
//!
//! Returns a [`BipartiteRankResult`]: per-label scores in first-occurrence
//! order with isolates excluded, plus iteration metadata. Running out of
//! budget is **not** an error — the last vectors are returned with
//! `converged: false` and the caller decides whether that is acceptable.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace, warn};

use crate::error::RankError;
use crate::graph::build::{BipartiteGraph, BuildConfig};
use crate::graph::labels::{LabelMap, NodeId};
use crate::rank::normalizer::Normalizer;
use crate::table::EdgeTable;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Which score vectors the caller receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    /// Row (sender) scores only.
    #[default]
    Rows,
    /// Column (receiver) scores only.
    Columns,
    /// Both vectors, independently labeled.
    Both,
}

impl FromStr for ReturnMode {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rows" => Ok(Self::Rows),
            "columns" => Ok(Self::Columns),
            "both" => Ok(Self::Both),
            _ => Err(RankError::InvalidInput(format!(
                "unknown return mode {s:?} (expected rows, columns, or both)"
            ))),
        }
    }
}

/// Configuration for bipartite rank estimation.
#[derive(Debug, Clone)]
pub struct BipartiteRankConfig {
    /// Normalization scheme. Default: HITS.
    pub normalizer: Normalizer,
    /// Row-side damping factor in (0, 1]: weight of propagated score
    /// against the reset term. Default: 0.85.
    pub alpha: f64,
    /// Column-side damping factor in (0, 1]. Default: 0.85.
    pub beta: f64,
    /// Maximum number of iterations. Default: 200.
    pub max_iter: usize,
    /// Convergence threshold on the combined L1 movement of both rank
    /// vectors. Default: 1e-4.
    pub tol: f64,
    /// Which vectors to return. Default: rows.
    pub return_mode: ReturnMode,
}

impl Default for BipartiteRankConfig {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            alpha: 0.85,
            beta: 0.85,
            max_iter: 200,
            tol: 1e-4,
            return_mode: ReturnMode::default(),
        }
    }
}

impl BipartiteRankConfig {
    /// Check every parameter against its documented domain.
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidParameter`] naming the first offending
    /// parameter.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<(), RankError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(RankError::InvalidParameter {
                    name,
                    value,
                    expected: "a damping factor in (0, 1]",
                });
            }
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
// Result types
// ---------------------------------------------------------------------------

/// Labeled scores in first-occurrence order, isolates excluded.
pub type RankVector = Vec<(NodeId, f64)>;

/// Result of a bipartite rank computation.
#[derive(Debug, Clone, Serialize)]
pub struct BipartiteRankResult {
    /// Row scores; `None` unless requested by the return mode. May be
    /// shorter than the matrix has rows — isolates never appear.
    pub rows: Option<RankVector>,
    /// Column scores; `None` unless requested by the return mode.
    pub columns: Option<RankVector>,
    /// Number of full row+column update pairs performed.
    pub iterations: usize,
    /// Whether the delta dropped below tolerance within `max_iter`.
    pub converged: bool,
    /// The scheme the scores were computed under.
    pub normalizer: Normalizer,
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Rank both sides of a bipartite graph under the configured normalizer.
///
/// A zero-node graph is a trivial immediate success: empty vectors,
/// `converged: true`. Exhausting `max_iter` is reported through the
/// `converged` flag, never as an `Err`.
///
/// # Errors
///
/// [`RankError::InvalidParameter`] when the configuration fails
/// [`BipartiteRankConfig::validate`]. The graph itself cannot fail here:
/// every numeric edge case (isolates, empty sides) has a defined outcome.
#[instrument(skip(graph, config), fields(normalizer = %config.normalizer))]
pub fn bipartite_rank(
    graph: &BipartiteGraph,
    config: &BipartiteRankConfig,
) -> Result<BipartiteRankResult, RankError> {
    config.validate()?;

    let matrix = &graph.matrix;
    let (n_rows, n_cols) = matrix.shape();

    let kd = matrix.row_degrees();
    let kp = matrix.col_degrees();
    let scaling = config.normalizer.transition_scaling(&kd, &kp);

    let r0 = uniform_over_support(&kd);
    let c0 = uniform_over_support(&kp);
    let mut r = r0.clone();
    let mut c = c0.clone();
    let mut r_next = vec![0.0; n_rows];
    let mut c_next = vec![0.0; n_cols];

    let mut iterations = 0;
    let mut converged = n_rows == 0 && n_cols == 0;

    while iterations < config.max_iter && !converged {
        iterations += 1;

        // r' = alpha · S_d · c + (1 − alpha) · r0
        for (i, next) in r_next.iter_mut().enumerate() {
            let propagated: f64 = matrix
                .row(i)
                .map(|(j, w)| w * scaling.sd_right[j] * c[j])
                .sum();
            *next = config.alpha * scaling.sd_left[i] * propagated
                + (1.0 - config.alpha) * r0[i];
        }

        // c' = beta · S_p · r' + (1 − beta) · c0  (note: the *fresh* r')
        for (j, next) in c_next.iter_mut().enumerate() {
            let propagated: f64 = matrix
                .column(j)
                .map(|(i, w)| w * scaling.sp_right[i] * r_next[i])
                .sum();
            *next = config.beta * scaling.sp_left[j] * propagated
                + (1.0 - config.beta) * c0[j];
        }

        let delta = l1_delta(&r, &r_next) + l1_delta(&c, &c_next);
        std::mem::swap(&mut r, &mut r_next);
        std::mem::swap(&mut c, &mut c_next);
        trace!(iteration = iterations, delta, "rank update");

        if delta < config.tol {
            converged = true;
        }
    }

    if !converged {
        warn!(
            iterations,
            tol = config.tol,
            "iteration budget exhausted before convergence; returning last vectors"
        );
    }

    let want_rows = matches!(config.return_mode, ReturnMode::Rows | ReturnMode::Both);
    let want_cols = matches!(config.return_mode, ReturnMode::Columns | ReturnMode::Both);
    Ok(BipartiteRankResult {
        rows: want_rows.then(|| labeled_scores(&graph.row_labels, &r, &kd)),
        columns: want_cols.then(|| labeled_scores(&graph.col_labels, &c, &kp)),
        iterations,
        converged,
        normalizer: config.normalizer,
    })
}

/// Build a graph from a tabular edge list and rank it in one call.
///
/// # Errors
///
/// Any build error from [`BipartiteGraph::from_table`] or parameter error
/// from [`bipartite_rank`].
pub fn rank_table(
    table: &EdgeTable,
    build: &BuildConfig,
    config: &BipartiteRankConfig,
) -> Result<BipartiteRankResult, RankError> {
    let graph = BipartiteGraph::from_table(table, build)?;
    bipartite_rank(&graph, config)
}

// ---------------------------------------------------------------------------
// Per-normalizer entry points
// ---------------------------------------------------------------------------

fn with_normalizer(config: &BipartiteRankConfig, normalizer: Normalizer) -> BipartiteRankConfig {
    BipartiteRankConfig {
        normalizer,
        ..config.clone()
    }
}

/// [`bipartite_rank`] pinned to the BiRank scheme; `config.normalizer` is
/// ignored.
///
/// # Errors
///
/// Same conditions as [`bipartite_rank`].
pub fn birank(
    graph: &BipartiteGraph,
    config: &BipartiteRankConfig,
) -> Result<BipartiteRankResult, RankError> {
    bipartite_rank(graph, &with_normalizer(config, Normalizer::BiRank))
}

/// [`bipartite_rank`] pinned to the CoHITS scheme.
///
/// # Errors
///
/// Same conditions as [`bipartite_rank`].
pub fn cohits(
    graph: &BipartiteGraph,
    config: &BipartiteRankConfig,
) -> Result<BipartiteRankResult, RankError> {
    bipartite_rank(graph, &with_normalizer(config, Normalizer::CoHits))
}

/// [`bipartite_rank`] pinned to the BGRM scheme.
///
/// # Errors
///
/// Same conditions as [`bipartite_rank`].
pub fn bgrm(
    graph: &BipartiteGraph,
    config: &BipartiteRankConfig,
) -> Result<BipartiteRankResult, RankError> {
    bipartite_rank(graph, &with_normalizer(config, Normalizer::Bgrm))
}

/// [`bipartite_rank`] pinned to plain HITS.
///
/// # Errors
///
/// Same conditions as [`bipartite_rank`].
pub fn hits(
    graph: &BipartiteGraph,
    config: &BipartiteRankConfig,
) -> Result<BipartiteRankResult, RankError> {
    bipartite_rank(graph, &with_normalizer(config, Normalizer::Hits))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Uniform distribution over the nodes with positive degree, summing to 1;
/// isolates pinned at 0. All-isolate sides get the all-zero vector.
#[allow(clippy::cast_precision_loss)]
fn uniform_over_support(degrees: &[f64]) -> Vec<f64> {
    let support = degrees.iter().filter(|&&k| k > 0.0).count();
    if support == 0 {
        return vec![0.0; degrees.len()];
    }
    let share = 1.0 / support as f64;
    degrees
        .iter()
        .map(|&k| if k > 0.0 { share } else { 0.0 })
        .collect()
}

fn l1_delta(old: &[f64], new: &[f64]) -> f64 {
    old.iter().zip(new).map(|(a, b)| (a - b).abs()).sum()
}

/// Zip scores with their labels, dropping isolates.
fn labeled_scores(labels: &LabelMap, scores: &[f64], degrees: &[f64]) -> RankVector {
    let mut out = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        if degrees[i] > 0.0 {
            out.push((label.clone(), scores[i]));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
