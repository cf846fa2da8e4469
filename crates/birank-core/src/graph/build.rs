//! Construction of [`BipartiteGraph`]s from raw input.
//!
//! # Overview
//!
//! Every accepted input shape — tabular edge list, dense matrix, sparse
//! triplets, petgraph digraph — funnels into the same canonical form: a
//! [`BipartiteMatrix`] plus two [`LabelMap`]s recording sender and
//! receiver identifiers in first-occurrence order. The solver never sees
//! the original shape.
//!
//! Weight rules are uniform across shapes: a missing weight means 1, a
//! zero weight means "no edge" (the endpoints are still recorded, so the
//! node can surface as an isolate), and anything negative or non-finite is
//! rejected before an index is assigned.

use nalgebra::DMatrix;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

use crate::error::RankError;
use crate::graph::labels::{LabelMap, NodeId};
use crate::graph::matrix::{BipartiteMatrix, DuplicatePolicy};
use crate::table::{EdgeTable, Value};

// ---------------------------------------------------------------------------
// Build configuration
// ---------------------------------------------------------------------------

/// Options for edge-list construction.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Sender column selector. Default: the first column.
    pub sender_column: Option<String>,
    /// Receiver column selector. Default: the second column.
    pub receiver_column: Option<String>,
    /// Weight column selector. The literal name `"unweighted"` is a
    /// sentinel treated the same as leaving this unset. Default: none —
    /// every edge weighs 1.
    pub weight_column: Option<String>,
    /// How repeated (sender, receiver) pairs collapse. Default: sum.
    pub duplicates: DuplicatePolicy,
    /// Replace every weight with 1.0 after duplicates collapse, yielding a
    /// 0/1 matrix. Default: false.
    pub rm_weights: bool,
}

impl BuildConfig {
    /// The weight selector with the `"unweighted"` sentinel stripped.
    fn weight_selector(&self) -> Option<&str> {
        self.weight_column
            .as_deref()
            .filter(|name| *name != "unweighted")
    }
}

// ---------------------------------------------------------------------------
// BipartiteGraph
// ---------------------------------------------------------------------------

/// A built bipartite graph: sparse adjacency plus label bookkeeping.
///
/// Row indices and column indices are independent spaces even when the
/// identifier values overlap — a sender `5` and a receiver `5` are
/// different nodes.
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    /// Canonical sparse adjacency, rows = senders, columns = receivers.
    pub matrix: BipartiteMatrix,
    /// Sender labels in first-occurrence order, aligned with matrix rows.
    pub row_labels: LabelMap,
    /// Receiver labels in first-occurrence order, aligned with matrix
    /// columns.
    pub col_labels: LabelMap,
}

impl BipartiteGraph {
    /// The zero-node, zero-edge graph.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            matrix: BipartiteMatrix::empty(),
            row_labels: LabelMap::new(),
            col_labels: LabelMap::new(),
        }
    }

    /// Build from a tabular edge list.
    ///
    /// Sender and receiver columns are picked per `config` (named, or
    /// positional first/second). Rows with weight 0 contribute their
    /// endpoints to the label maps but no matrix entry.
    ///
    /// A table with no columns at all yields the empty graph; a table with
    /// columns but no rows yields an empty graph with the column contract
    /// still checked.
    ///
    /// # Errors
    ///
    /// [`RankError::UnresolvableColumn`] when a named column is missing,
    /// [`RankError::InvalidInput`] when the table is too narrow or an
    /// endpoint cell is not an identifier, and [`RankError::InvalidWeight`]
    /// for negative or non-finite weights.
    #[instrument(skip(table, config), fields(edges = table.len()))]
    pub fn from_table(table: &EdgeTable, config: &BuildConfig) -> Result<Self, RankError> {
        if table.width() == 0 {
            return Ok(Self::empty());
        }

        let senders = table.resolve(config.sender_column.as_deref(), 0, "sender")?;
        let receivers = table.resolve(config.receiver_column.as_deref(), 1, "receiver")?;
        let weights = match config.weight_selector() {
            Some(name) => Some(table.resolve(Some(name), 2, "weight")?),
            None => None,
        };

        let mut row_labels = LabelMap::new();
        let mut col_labels = LabelMap::new();
        let mut triplets = Vec::with_capacity(table.len());

        for i in 0..table.len() {
            let sender = endpoint(&senders[i], i, "sender")?;
            let receiver = endpoint(&receivers[i], i, "receiver")?;
            let weight = match weights {
                None => 1.0,
                // A missing cell in the weight column means "unweighted
                // edge", not "invalid edge".
                Some(col) if col[i].is_null() => 1.0,
                Some(col) => checked_weight(&col[i], i)?,
            };

            let r = row_labels.intern(sender);
            let c = col_labels.intern(receiver);
            if weight > 0.0 {
                triplets.push((r, c, weight));
            }
        }

        let mut matrix = BipartiteMatrix::from_triplets(
            row_labels.len(),
            col_labels.len(),
            &triplets,
            config.duplicates,
        );
        if config.rm_weights {
            matrix.strip_weights();
        }

        debug!(
            rows = row_labels.len(),
            cols = col_labels.len(),
            nnz = matrix.nnz(),
            "built bipartite graph from edge table"
        );
        Ok(Self {
            matrix,
            row_labels,
            col_labels,
        })
    }

    /// Build from unweighted `(sender, receiver)` pairs with default
    /// options.
    ///
    /// # Errors
    ///
    /// Infallible in practice; kept fallible for uniformity with the other
    /// constructors.
    pub fn from_edges<S, R, I>(edges: I) -> Result<Self, RankError>
    where
        S: Into<NodeId>,
        R: Into<NodeId>,
        I: IntoIterator<Item = (S, R)>,
    {
        Self::from_table(&EdgeTable::from_edges(edges), &BuildConfig::default())
    }

    /// Build from weighted `(sender, receiver, weight)` triples.
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidWeight`] for negative or non-finite weights.
    pub fn from_weighted_edges<S, R, I>(
        edges: I,
        duplicates: DuplicatePolicy,
    ) -> Result<Self, RankError>
    where
        S: Into<NodeId>,
        R: Into<NodeId>,
        I: IntoIterator<Item = (S, R, f64)>,
    {
        let config = BuildConfig {
            weight_column: Some("weight".to_string()),
            duplicates,
            ..BuildConfig::default()
        };
        Self::from_table(&EdgeTable::from_weighted_edges(edges), &config)
    }

    /// Build from a dense matrix: rows are senders, columns receivers, a
    /// zero entry means no edge.
    ///
    /// Labels default to positional `1..=n` on each side when not given.
    /// Duplicate entries cannot occur in a dense matrix, so no duplicate
    /// policy applies.
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidInput`] when supplied labels do not match the
    /// matrix shape or repeat, and [`RankError::InvalidWeight`] for
    /// negative or non-finite entries.
    #[instrument(skip_all, fields(shape = ?dense.shape()))]
    pub fn from_dense(
        dense: &DMatrix<f64>,
        row_labels: Option<Vec<NodeId>>,
        col_labels: Option<Vec<NodeId>>,
    ) -> Result<Self, RankError> {
        let row_labels = named_or_positional(row_labels, dense.nrows(), "row")?;
        let col_labels = named_or_positional(col_labels, dense.ncols(), "column")?;

        let mut triplets = Vec::new();
        for i in 0..dense.nrows() {
            for j in 0..dense.ncols() {
                let w = dense[(i, j)];
                if w == 0.0 {
                    continue;
                }
                if !w.is_finite() || w < 0.0 {
                    return Err(RankError::InvalidWeight { row: i, weight: w });
                }
                triplets.push((i, j, w));
            }
        }

        let matrix = BipartiteMatrix::from_triplets(
            dense.nrows(),
            dense.ncols(),
            &triplets,
            DuplicatePolicy::Add,
        );
        debug!(nnz = matrix.nnz(), "built bipartite graph from dense matrix");
        Ok(Self {
            matrix,
            row_labels,
            col_labels,
        })
    }

    /// Build from sparse `(row, col, weight)` triplets with positional
    /// `1..=n` labels.
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidInput`] for out-of-bounds indices and
    /// [`RankError::InvalidWeight`] for negative or non-finite weights
    /// (zero-weight triplets are dropped).
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: &[(usize, usize, f64)],
        duplicates: DuplicatePolicy,
    ) -> Result<Self, RankError> {
        let mut entries = Vec::with_capacity(triplets.len());
        for (i, &(r, c, w)) in triplets.iter().enumerate() {
            if r >= n_rows || c >= n_cols {
                return Err(RankError::InvalidInput(format!(
                    "triplet {i} addresses ({r}, {c}) outside a {n_rows} x {n_cols} matrix"
                )));
            }
            if !w.is_finite() || w < 0.0 {
                return Err(RankError::InvalidWeight { row: i, weight: w });
            }
            if w > 0.0 {
                entries.push((r, c, w));
            }
        }

        Ok(Self {
            matrix: BipartiteMatrix::from_triplets(n_rows, n_cols, &entries, duplicates),
            row_labels: LabelMap::positional(n_rows),
            col_labels: LabelMap::positional(n_cols),
        })
    }

    /// Build from a directed petgraph: each edge `u → v` makes `u` a
    /// sender and `v` a receiver.
    ///
    /// `label` extracts a node identifier from a node weight; `weight`
    /// extracts an edge weight. Nodes without any incident edge are not
    /// represented (they would be excluded from ranking output as isolates
    /// regardless).
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidWeight`] for negative or non-finite edge
    /// weights; the offending row number is the edge's position in
    /// insertion order.
    pub fn from_petgraph<N, E>(
        graph: &DiGraph<N, E>,
        mut label: impl FnMut(&N) -> NodeId,
        mut weight: impl FnMut(&E) -> f64,
        duplicates: DuplicatePolicy,
    ) -> Result<Self, RankError> {
        let mut row_labels = LabelMap::new();
        let mut col_labels = LabelMap::new();
        let mut triplets = Vec::with_capacity(graph.edge_count());

        for (i, edge) in graph.edge_references().enumerate() {
            let w = weight(edge.weight());
            if !w.is_finite() || w < 0.0 {
                return Err(RankError::InvalidWeight { row: i, weight: w });
            }
            let r = row_labels.intern(label(&graph[edge.source()]));
            let c = col_labels.intern(label(&graph[edge.target()]));
            if w > 0.0 {
                triplets.push((r, c, w));
            }
        }

        Ok(Self {
            matrix: BipartiteMatrix::from_triplets(
                row_labels.len(),
                col_labels.len(),
                &triplets,
                duplicates,
            ),
            row_labels,
            col_labels,
        })
    }

    /// Replace every stored weight with 1.0. See
    /// [`BipartiteMatrix::strip_weights`].
    pub fn strip_weights(&mut self) {
        self.matrix.strip_weights();
    }
}

// ---------------------------------------------------------------------------
// OneModeGraph
// ---------------------------------------------------------------------------

/// A square adjacency over a single node space, for one-mode ranking.
///
/// Unlike [`BipartiteGraph`], senders and receivers share one label map: an
/// edge list `[(a, b), (b, c)]` yields a 3-node graph, with `b` addressable
/// as both a source and a target of edges.
#[derive(Debug, Clone)]
pub struct OneModeGraph {
    /// Square sparse adjacency; entry `(i, j)` is the weight of `i → j`.
    pub matrix: BipartiteMatrix,
    /// Node labels in first-occurrence order (senders and receivers
    /// interleaved as they appear).
    pub labels: LabelMap,
}

impl OneModeGraph {
    /// Build from a tabular edge list, interning both endpoint columns
    /// into one shared label space.
    ///
    /// # Errors
    ///
    /// Same conditions as [`BipartiteGraph::from_table`].
    #[instrument(skip(table, config), fields(edges = table.len()))]
    pub fn from_table(table: &EdgeTable, config: &BuildConfig) -> Result<Self, RankError> {
        if table.width() == 0 {
            return Ok(Self {
                matrix: BipartiteMatrix::empty(),
                labels: LabelMap::new(),
            });
        }

        let senders = table.resolve(config.sender_column.as_deref(), 0, "sender")?;
        let receivers = table.resolve(config.receiver_column.as_deref(), 1, "receiver")?;
        let weights = match config.weight_selector() {
            Some(name) => Some(table.resolve(Some(name), 2, "weight")?),
            None => None,
        };

        let mut labels = LabelMap::new();
        let mut raw = Vec::with_capacity(table.len());
        for i in 0..table.len() {
            let sender = endpoint(&senders[i], i, "sender")?;
            let receiver = endpoint(&receivers[i], i, "receiver")?;
            let weight = match weights {
                None => 1.0,
                Some(col) if col[i].is_null() => 1.0,
                Some(col) => checked_weight(&col[i], i)?,
            };
            let s = labels.intern(sender);
            let r = labels.intern(receiver);
            if weight > 0.0 {
                raw.push((s, r, weight));
            }
        }

        let n = labels.len();
        let mut matrix = BipartiteMatrix::from_triplets(n, n, &raw, config.duplicates);
        if config.rm_weights {
            matrix.strip_weights();
        }

        debug!(nodes = n, nnz = matrix.nnz(), "built one-mode graph");
        Ok(Self { matrix, labels })
    }

    /// Build from unweighted `(source, target)` pairs with default
    /// options.
    ///
    /// # Errors
    ///
    /// Infallible in practice; kept fallible for uniformity with the other
    /// constructors.
    pub fn from_edges<S, R, I>(edges: I) -> Result<Self, RankError>
    where
        S: Into<NodeId>,
        R: Into<NodeId>,
        I: IntoIterator<Item = (S, R)>,
    {
        Self::from_table(&EdgeTable::from_edges(edges), &BuildConfig::default())
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn endpoint(cell: &Value, row: usize, role: &str) -> Result<NodeId, RankError> {
    cell.as_node_id().ok_or_else(|| {
        RankError::InvalidInput(format!(
            "row {row}: {role} cell {cell:?} is not a usable node identifier"
        ))
    })
}

fn checked_weight(cell: &Value, row: usize) -> Result<f64, RankError> {
    let w = cell
        .as_weight()
        .ok_or(RankError::InvalidWeight {
            row,
            weight: f64::NAN,
        })?;
    if !w.is_finite() || w < 0.0 {
        return Err(RankError::InvalidWeight { row, weight: w });
    }
    Ok(w)
}

fn named_or_positional(
    labels: Option<Vec<NodeId>>,
    n: usize,
    side: &str,
) -> Result<LabelMap, RankError> {
    match labels {
        None => Ok(LabelMap::positional(n)),
        Some(given) => {
            if given.len() != n {
                return Err(RankError::InvalidInput(format!(
                    "{} {side} labels supplied for a matrix with {n} {side}s",
                    given.len(),
                )));
            }
            let mut map = LabelMap::with_capacity(n);
            for label in given {
                map.intern(label);
            }
            if map.len() != n {
                return Err(RankError::InvalidInput(format!(
                    "{side} labels contain duplicates"
                )));
            }
            Ok(map)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_columns_are_sender_then_receiver() {
        let table = EdgeTable::from_columns([
            ("from", vec![Value::from("u1"), Value::from("u2")]),
            ("to", vec![Value::from("v1"), Value::from("v1")]),
        ])
        .expect("table");

        let graph = BipartiteGraph::from_table(&table, &BuildConfig::default()).expect("graph");
        assert_eq!(graph.matrix.shape(), (2, 1));
        assert_eq!(graph.row_labels.label(0), Some(&NodeId::from("u1")));
        assert_eq!(graph.col_labels.label(0), Some(&NodeId::from("v1")));
    }

    #[test]
    fn named_columns_override_position() {
        let table = EdgeTable::from_columns([
            ("junk", vec![Value::from(9)]),
            ("src", vec![Value::from("a")]),
            ("dst", vec![Value::from("b")]),
        ])
        .expect("table");
        let config = BuildConfig {
            sender_column: Some("src".to_string()),
            receiver_column: Some("dst".to_string()),
            ..BuildConfig::default()
        };

        let graph = BipartiteGraph::from_table(&table, &config).expect("graph");
        assert_eq!(graph.row_labels.label(0), Some(&NodeId::from("a")));
    }

    #[test]
    fn missing_named_column_fails_fast() {
        let table = EdgeTable::from_edges([("a", "b")]);
        let config = BuildConfig {
            weight_column: Some("wt".to_string()),
            ..BuildConfig::default()
        };
        let err = BipartiteGraph::from_table(&table, &config).unwrap_err();
        assert!(matches!(err, RankError::UnresolvableColumn { ref name, .. } if name == "wt"));
    }

    #[test]
    fn unweighted_sentinel_means_no_weight_column() {
        let table = EdgeTable::from_edges([("a", "b"), ("a", "c")]);
        let config = BuildConfig {
            weight_column: Some("unweighted".to_string()),
            ..BuildConfig::default()
        };
        let graph = BipartiteGraph::from_table(&table, &config).expect("graph");
        assert_eq!(graph.matrix.row_degrees(), vec![2.0]);
    }

    #[test]
    fn null_weight_cell_defaults_to_one() {
        let table = EdgeTable::from_columns([
            ("s", vec![Value::from("a"), Value::from("a")]),
            ("r", vec![Value::from("x"), Value::from("y")]),
            ("w", vec![Value::Float(3.0), Value::Null]),
        ])
        .expect("table");
        let config = BuildConfig {
            weight_column: Some("w".to_string()),
            ..BuildConfig::default()
        };

        let graph = BipartiteGraph::from_table(&table, &config).expect("graph");
        assert_eq!(graph.matrix.get(0, 0), 3.0);
        assert_eq!(graph.matrix.get(0, 1), 1.0);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let err = BipartiteGraph::from_weighted_edges(
            [("a", "b", 1.0), ("a", "c", -2.0)],
            DuplicatePolicy::Add,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RankError::InvalidWeight {
                row: 1,
                weight: -2.0
            }
        );
    }

    #[test]
    fn zero_weight_records_labels_but_no_edge() {
        let graph = BipartiteGraph::from_weighted_edges(
            [("a", "b", 1.0), ("lurker", "b", 0.0)],
            DuplicatePolicy::Add,
        )
        .expect("graph");

        // "lurker" has a row index but zero degree: an isolate.
        assert_eq!(graph.row_labels.len(), 2);
        assert_eq!(graph.matrix.row_degrees(), vec![1.0, 0.0]);
    }

    #[test]
    fn duplicate_add_matches_single_summed_edge() {
        let doubled = BipartiteGraph::from_weighted_edges(
            [("A", "B", 2.0), ("A", "B", 3.0)],
            DuplicatePolicy::Add,
        )
        .expect("graph");
        let single =
            BipartiteGraph::from_weighted_edges([("A", "B", 5.0)], DuplicatePolicy::Add)
                .expect("graph");
        assert_eq!(doubled.matrix, single.matrix);
    }

    #[test]
    fn duplicate_remove_matches_first_edge() {
        let doubled = BipartiteGraph::from_weighted_edges(
            [("A", "B", 2.0), ("A", "B", 3.0)],
            DuplicatePolicy::Remove,
        )
        .expect("graph");
        let single =
            BipartiteGraph::from_weighted_edges([("A", "B", 2.0)], DuplicatePolicy::Add)
                .expect("graph");
        assert_eq!(doubled.matrix, single.matrix);
    }

    #[test]
    fn rm_weights_runs_after_duplicate_collapse() {
        let table = EdgeTable::from_weighted_edges([("A", "B", 2.0), ("A", "B", 3.0)]);
        let config = BuildConfig {
            weight_column: Some("weight".to_string()),
            duplicates: DuplicatePolicy::Add,
            rm_weights: true,
            ..BuildConfig::default()
        };
        let graph = BipartiteGraph::from_table(&table, &config).expect("graph");
        assert_eq!(graph.matrix.get(0, 0), 1.0);
    }

    #[test]
    fn empty_table_builds_empty_graph() {
        let graph =
            BipartiteGraph::from_table(&EdgeTable::default(), &BuildConfig::default())
                .expect("graph");
        assert!(graph.matrix.is_empty());
        assert!(graph.row_labels.is_empty());
    }

    #[test]
    fn one_column_table_is_too_narrow() {
        let table = EdgeTable::from_columns([("only", vec![Value::from(1)])]).expect("table");
        let err = BipartiteGraph::from_table(&table, &BuildConfig::default()).unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(_)));
    }

    #[test]
    fn dense_without_names_gets_positional_labels() {
        let dense = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let graph = BipartiteGraph::from_dense(&dense, None, None).expect("graph");
        assert_eq!(graph.row_labels.label(0), Some(&NodeId::Int(1)));
        assert_eq!(graph.row_labels.label(1), Some(&NodeId::Int(2)));
        assert_eq!(graph.matrix.nnz(), 2);
        assert_eq!(graph.matrix.get(0, 1), 1.0);
    }

    #[test]
    fn dense_label_length_mismatch_is_invalid() {
        let dense = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let err = BipartiteGraph::from_dense(
            &dense,
            Some(vec![NodeId::from("a"), NodeId::from("b")]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(_)));
    }

    #[test]
    fn dense_duplicate_labels_are_invalid() {
        let dense = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let err = BipartiteGraph::from_dense(
            &dense,
            Some(vec![NodeId::from("a"), NodeId::from("a")]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(_)));
    }

    #[test]
    fn triplets_out_of_bounds_are_invalid() {
        let err = BipartiteGraph::from_triplets(2, 2, &[(2, 0, 1.0)], DuplicatePolicy::Add)
            .unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(_)));
    }

    #[test]
    fn petgraph_edges_define_sender_and_receiver() {
        let mut g: DiGraph<&str, f64> = DiGraph::new();
        let u1 = g.add_node("u1");
        let v1 = g.add_node("v1");
        let v2 = g.add_node("v2");
        g.add_edge(u1, v1, 1.0);
        g.add_edge(u1, v2, 2.0);

        let graph = BipartiteGraph::from_petgraph(
            &g,
            |n| NodeId::from(*n),
            |w| *w,
            DuplicatePolicy::Add,
        )
        .expect("graph");

        assert_eq!(graph.matrix.shape(), (1, 2));
        assert_eq!(graph.row_labels.label(0), Some(&NodeId::from("u1")));
        assert_eq!(graph.matrix.get(0, 1), 2.0);
    }

    #[test]
    fn one_mode_shares_a_single_label_space() {
        let graph = OneModeGraph::from_edges([("a", "b"), ("b", "c")]).expect("graph");
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.matrix.shape(), (3, 3));
        assert_eq!(graph.matrix.get(0, 1), 1.0);
        assert_eq!(graph.matrix.get(1, 2), 1.0);
        let order: Vec<String> = graph.labels.iter().map(ToString::to_string).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }
}
