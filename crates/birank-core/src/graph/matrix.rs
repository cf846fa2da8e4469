//! Sparse weighted bipartite adjacency storage.
//!
//! # Overview
//!
//! [`BipartiteMatrix`] is the canonical form every input is converted to
//! before ranking: a sparse map from `(row, col)` to a positive finite
//! weight, shape `n_rows × n_cols`. An absent entry means weight 0 — no
//! edge. After construction the entry set is fixed; the only permitted
//! mutation is [`BipartiteMatrix::strip_weights`], which the caller must
//! apply before degrees are read.
//!
//! # Storage
//!
//! Both a row-major (CSR) and a column-major (CSC) view are kept, so the
//! solver can stream rows when updating row scores and columns when
//! updating column scores, and the one-mode projection can join the two
//! views without searching:
//!
//! ```text
//! CSR: row_offsets[i]..row_offsets[i+1] indexes (row_cols, row_weights)
//! CSC: col_offsets[j]..col_offsets[j+1] indexes (col_rows, col_weights)
//! ```
//!
//! Entries are ordered by `(row, col)` in the CSR view and `(col, row)` in
//! the CSC view, which makes every traversal — and therefore every rank
//! vector computed from one — deterministic.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RankError;

// ---------------------------------------------------------------------------
// Duplicate policy
// ---------------------------------------------------------------------------

/// How parallel edges (repeated `(row, col)` pairs) collapse into the
/// single stored entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Sum the weights of all occurrences.
    #[default]
    Add,
    /// Keep the first occurrence's weight, discard the rest.
    Remove,
}

impl FromStr for DuplicatePolicy {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(RankError::InvalidInput(format!(
                "unknown duplicate policy {s:?} (expected add or remove)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// BipartiteMatrix
// ---------------------------------------------------------------------------

/// Sparse weighted bipartite adjacency matrix with dual CSR/CSC views.
#[derive(Debug, Clone, PartialEq)]
pub struct BipartiteMatrix {
    n_rows: usize,
    n_cols: usize,
    row_offsets: Vec<usize>,
    row_cols: Vec<usize>,
    row_weights: Vec<f64>,
    col_offsets: Vec<usize>,
    col_rows: Vec<usize>,
    col_weights: Vec<f64>,
}

impl BipartiteMatrix {
    /// The empty `0 × 0` matrix.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            n_rows: 0,
            n_cols: 0,
            row_offsets: vec![0],
            row_cols: Vec::new(),
            row_weights: Vec::new(),
            col_offsets: vec![0],
            col_rows: Vec::new(),
            col_weights: Vec::new(),
        }
    }

    /// Build from `(row, col, weight)` triplets, collapsing duplicates
    /// under `policy`.
    ///
    /// Triplets may arrive in any order; storage is ordered by `(row, col)`
    /// regardless. Callers are expected to have validated weights already —
    /// the builder rejects non-finite and negative values before indices
    /// are even assigned.
    #[must_use]
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(usize, usize, f64)],
        policy: DuplicatePolicy,
    ) -> Self {
        // BTreeMap both deduplicates and yields entries in (row, col)
        // order, so the CSR arrays can be filled in one pass.
        let mut entries: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(r, c, w) in triplets {
            debug_assert!(r < n_rows && c < n_cols, "triplet out of bounds");
            debug_assert!(w.is_finite() && w > 0.0, "unvalidated weight {w}");
            match policy {
                DuplicatePolicy::Add => *entries.entry((r, c)).or_insert(0.0) += w,
                DuplicatePolicy::Remove => {
                    entries.entry((r, c)).or_insert(w);
                }
            }
        }

        let nnz = entries.len();
        let mut row_offsets = vec![0usize; n_rows + 1];
        let mut row_cols = Vec::with_capacity(nnz);
        let mut row_weights = Vec::with_capacity(nnz);

        for (&(r, _), _) in &entries {
            row_offsets[r + 1] += 1;
        }
        for i in 0..n_rows {
            row_offsets[i + 1] += row_offsets[i];
        }
        for (&(_, c), &w) in &entries {
            row_cols.push(c);
            row_weights.push(w);
        }

        let mut matrix = Self {
            n_rows,
            n_cols,
            row_offsets,
            row_cols,
            row_weights,
            col_offsets: Vec::new(),
            col_rows: Vec::new(),
            col_weights: Vec::new(),
        };
        matrix.rebuild_csc();
        matrix
    }

    /// Counting-sort transpose of the CSR view into the CSC view.
    ///
    /// Rows are visited in ascending order, so each column's row list comes
    /// out ascending as well.
    fn rebuild_csc(&mut self) {
        let nnz = self.row_cols.len();
        let mut col_offsets = vec![0usize; self.n_cols + 1];
        for &c in &self.row_cols {
            col_offsets[c + 1] += 1;
        }
        for j in 0..self.n_cols {
            col_offsets[j + 1] += col_offsets[j];
        }

        let mut col_rows = vec![0usize; nnz];
        let mut col_weights = vec![0f64; nnz];
        let mut write_pos = col_offsets[..self.n_cols].to_vec();
        for r in 0..self.n_rows {
            for k in self.row_offsets[r]..self.row_offsets[r + 1] {
                let c = self.row_cols[k];
                let at = write_pos[c];
                col_rows[at] = r;
                col_weights[at] = self.row_weights[k];
                write_pos[c] += 1;
            }
        }

        self.col_offsets = col_offsets;
        self.col_rows = col_rows;
        self.col_weights = col_weights;
    }

    /// `(n_rows, n_cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of senders (rows).
    #[must_use]
    pub const fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of receivers (columns).
    #[must_use]
    pub const fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.row_cols.len()
    }

    /// Return `true` for the `0 × 0` matrix.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n_rows == 0 && self.n_cols == 0
    }

    /// Return `true` when the matrix is square (e.g. a one-mode
    /// projection).
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.n_rows == self.n_cols
    }

    /// Iterate the entries of row `i` as `(col, weight)`, ascending by
    /// column.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.row_offsets[i]..self.row_offsets[i + 1];
        span.map(move |k| (self.row_cols[k], self.row_weights[k]))
    }

    /// Iterate the entries of column `j` as `(row, weight)`, ascending by
    /// row.
    pub fn column(&self, j: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.col_offsets[j]..self.col_offsets[j + 1];
        span.map(move |k| (self.col_rows[k], self.col_weights[k]))
    }

    /// Look up the weight at `(i, j)`; 0.0 when no edge is stored.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i >= self.n_rows {
            return 0.0;
        }
        self.row(i)
            .find_map(|(c, w)| (c == j).then_some(w))
            .unwrap_or(0.0)
    }

    /// Generalized row degrees `K_d`: per-row sums of stored weights.
    /// A degree of 0 marks an isolated sender.
    #[must_use]
    pub fn row_degrees(&self) -> Vec<f64> {
        let mut degrees = vec![0.0; self.n_rows];
        for (i, degree) in degrees.iter_mut().enumerate() {
            *degree = self.row_weights[self.row_offsets[i]..self.row_offsets[i + 1]]
                .iter()
                .sum();
        }
        degrees
    }

    /// Generalized column degrees `K_p`: per-column sums of stored weights.
    /// A degree of 0 marks an isolated receiver.
    #[must_use]
    pub fn col_degrees(&self) -> Vec<f64> {
        let mut degrees = vec![0.0; self.n_cols];
        for (j, degree) in degrees.iter_mut().enumerate() {
            *degree = self.col_weights[self.col_offsets[j]..self.col_offsets[j + 1]]
                .iter()
                .sum();
        }
        degrees
    }

    /// Replace every stored weight with 1.0, turning the matrix into a 0/1
    /// adjacency matrix. Idempotent. Must run before degrees are read —
    /// degree vectors computed earlier describe a matrix that no longer
    /// exists.
    pub fn strip_weights(&mut self) {
        for w in &mut self.row_weights {
            *w = 1.0;
        }
        for w in &mut self.col_weights {
            *w = 1.0;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(triplets: &[(usize, usize, f64)], policy: DuplicatePolicy) -> BipartiteMatrix {
        let n_rows = triplets.iter().map(|t| t.0 + 1).max().unwrap_or(0);
        let n_cols = triplets.iter().map(|t| t.1 + 1).max().unwrap_or(0);
        BipartiteMatrix::from_triplets(n_rows, n_cols, triplets, policy)
    }

    #[test]
    fn empty_matrix_has_zero_shape() {
        let m = BipartiteMatrix::empty();
        assert_eq!(m.shape(), (0, 0));
        assert_eq!(m.nnz(), 0);
        assert!(m.is_empty());
    }

    #[test]
    fn duplicate_add_sums_weights() {
        let m = matrix(&[(0, 0, 2.0), (0, 0, 3.0)], DuplicatePolicy::Add);
        assert_eq!(m.nnz(), 1);
        assert!((m.get(0, 0) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_remove_keeps_first_weight() {
        let m = matrix(&[(0, 0, 2.0), (0, 0, 3.0)], DuplicatePolicy::Remove);
        assert_eq!(m.nnz(), 1);
        assert!((m.get(0, 0) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn csr_and_csc_views_agree() {
        let m = matrix(
            &[(0, 1, 1.0), (1, 0, 2.0), (0, 0, 3.0), (2, 1, 4.0)],
            DuplicatePolicy::Add,
        );

        // Row view, ascending columns.
        assert_eq!(m.row(0).collect::<Vec<_>>(), vec![(0, 3.0), (1, 1.0)]);
        // Column view, ascending rows.
        assert_eq!(m.column(1).collect::<Vec<_>>(), vec![(0, 1.0), (2, 4.0)]);
        // Same total mass through either view.
        let row_total: f64 = (0..m.n_rows()).flat_map(|i| m.row(i).map(|(_, w)| w)).sum();
        let col_total: f64 = (0..m.n_cols())
            .flat_map(|j| m.column(j).map(|(_, w)| w))
            .sum();
        assert!((row_total - col_total).abs() < 1e-12);
    }

    #[test]
    fn degrees_are_weighted_sums() {
        let m = matrix(&[(0, 0, 1.5), (0, 1, 2.5), (1, 1, 1.0)], DuplicatePolicy::Add);
        assert_eq!(m.row_degrees(), vec![4.0, 1.0]);
        assert_eq!(m.col_degrees(), vec![1.5, 3.5]);
    }

    #[test]
    fn zero_degree_marks_isolate() {
        // Row 1 never appears in a triplet: isolated sender.
        let m = BipartiteMatrix::from_triplets(3, 2, &[(0, 0, 1.0), (2, 1, 1.0)], DuplicatePolicy::Add);
        let kd = m.row_degrees();
        assert_eq!(kd[1], 0.0);
        assert!(kd[0] > 0.0 && kd[2] > 0.0);
    }

    #[test]
    fn strip_weights_is_idempotent() {
        let mut m = matrix(&[(0, 0, 2.0), (1, 1, 7.0)], DuplicatePolicy::Add);
        m.strip_weights();
        assert_eq!(m.row_degrees(), vec![1.0, 1.0]);
        m.strip_weights();
        assert_eq!(m.row_degrees(), vec![1.0, 1.0]);
        assert_eq!(m.col_degrees(), vec![1.0, 1.0]);
    }

    #[test]
    fn get_out_of_bounds_is_zero() {
        let m = matrix(&[(0, 0, 1.0)], DuplicatePolicy::Add);
        assert_eq!(m.get(5, 0), 0.0);
        assert_eq!(m.get(0, 5), 0.0);
    }

    #[test]
    fn duplicate_policy_parses_case_insensitively() {
        assert_eq!("Add".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Add);
        assert_eq!("REMOVE".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Remove);
        assert!("merge".parse::<DuplicatePolicy>().is_err());
    }
}
