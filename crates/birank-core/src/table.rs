//! Tabular edge-list input.
//!
//! # Overview
//!
//! An [`EdgeTable`] is the data-frame-shaped source the builder accepts:
//! named columns of equal length, one row per edge. The builder picks the
//! sender, receiver, and (optionally) weight columns by name; when no names
//! are given, the first column is the sender and the second the receiver.
//!
//! Cell values are loosely typed ([`Value`]) because edge data arrives with
//! whatever identifier types the source uses — integer ids in one dataset,
//! text handles in the next. Typing is checked at selection time, not at
//! table construction: a table is just columns until the builder asks for
//! endpoints and weights.

use serde::{Deserialize, Serialize};

use crate::error::RankError;
use crate::graph::labels::NodeId;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// One cell of an [`EdgeTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer cell.
    Int(i64),
    /// Floating-point cell.
    Float(f64),
    /// Text cell.
    Text(String),
    /// Missing cell.
    Null,
}

impl Value {
    /// Interpret this cell as a node identifier.
    ///
    /// Floats are accepted only when they are exactly integral (identifier
    /// columns read from numeric sources often arrive as floats).
    #[must_use]
    pub fn as_node_id(&self) -> Option<NodeId> {
        match self {
            Self::Int(v) => Some(NodeId::Int(*v)),
            Self::Text(v) => Some(NodeId::Text(v.clone())),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(NodeId::Int(*v as i64)),
            _ => None,
        }
    }

    /// Interpret this cell as an edge weight. `Null` means "no weight
    /// recorded" and is distinct from an invalid value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_weight(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) | Self::Null => None,
        }
    }

    /// Return `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<NodeId> for Value {
    fn from(v: NodeId) -> Self {
        match v {
            NodeId::Int(i) => Self::Int(i),
            NodeId::Text(t) => Self::Text(t),
        }
    }
}

// ---------------------------------------------------------------------------
// EdgeTable
// ---------------------------------------------------------------------------

/// A named column of cells.
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name, matched against the configured selectors.
    pub name: String,
    /// Cell values, one per row.
    pub values: Vec<Value>,
}

/// Column-oriented edge records: one row per edge, columns addressed by
/// name.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    columns: Vec<Column>,
}

impl EdgeTable {
    /// Build a table from `(name, values)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidInput`] if the columns have differing
    /// lengths or a name repeats.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, RankError>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let columns: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| Column {
                name: name.into(),
                values,
            })
            .collect();

        if let Some(first) = columns.first() {
            let n = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != n) {
                return Err(RankError::InvalidInput(format!(
                    "column {:?} has {} rows, expected {n}",
                    bad.name,
                    bad.values.len(),
                )));
            }
        }
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(RankError::InvalidInput(format!(
                    "duplicate column name {:?}",
                    col.name
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Build an unweighted two-column table (`sender`, `receiver`) from
    /// edge pairs.
    pub fn from_edges<S, R, I>(edges: I) -> Self
    where
        S: Into<NodeId>,
        R: Into<NodeId>,
        I: IntoIterator<Item = (S, R)>,
    {
        let mut senders = Vec::new();
        let mut receivers = Vec::new();
        for (s, r) in edges {
            senders.push(Value::from(s.into()));
            receivers.push(Value::from(r.into()));
        }
        Self {
            columns: vec![
                Column {
                    name: "sender".to_string(),
                    values: senders,
                },
                Column {
                    name: "receiver".to_string(),
                    values: receivers,
                },
            ],
        }
    }

    /// Build a three-column table (`sender`, `receiver`, `weight`) from
    /// weighted edge triples.
    pub fn from_weighted_edges<S, R, I>(edges: I) -> Self
    where
        S: Into<NodeId>,
        R: Into<NodeId>,
        I: IntoIterator<Item = (S, R, f64)>,
    {
        let mut senders = Vec::new();
        let mut receivers = Vec::new();
        let mut weights = Vec::new();
        for (s, r, w) in edges {
            senders.push(Value::from(s.into()));
            receivers.push(Value::from(r.into()));
            weights.push(Value::Float(w));
        }
        Self {
            columns: vec![
                Column {
                    name: "sender".to_string(),
                    values: senders,
                },
                Column {
                    name: "receiver".to_string(),
                    values: receivers,
                },
                Column {
                    name: "weight".to_string(),
                    values: weights,
                },
            ],
        }
    }

    /// Number of rows (edges) in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Return `true` if the table holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Column by position.
    #[must_use]
    pub fn column_at(&self, idx: usize) -> Option<&[Value]> {
        self.columns.get(idx).map(|c| c.values.as_slice())
    }

    /// Resolve a column selector: `Some(name)` must exist, `None` falls
    /// back to the column at `default_idx`.
    ///
    /// # Errors
    ///
    /// [`RankError::UnresolvableColumn`] when the named column is missing;
    /// [`RankError::InvalidInput`] when the positional default is out of
    /// range (the table is too narrow to be an edge list).
    pub fn resolve(
        &self,
        selector: Option<&str>,
        default_idx: usize,
        role: &str,
    ) -> Result<&[Value], RankError> {
        match selector {
            Some(name) => self.column(name).ok_or_else(|| RankError::UnresolvableColumn {
                name: name.to_string(),
                available: self.names().iter().map(ToString::to_string).collect(),
            }),
            None => self.column_at(default_idx).ok_or_else(|| {
                RankError::InvalidInput(format!(
                    "edge table has {} column(s); need at least {} for the {role} column",
                    self.width(),
                    default_idx + 1,
                ))
            }),
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
    fn from_columns_rejects_ragged_lengths() {
        let result = EdgeTable::from_columns([
            ("a", vec![Value::from(1), Value::from(2)]),
            ("b", vec![Value::from(3)]),
        ]);
        assert!(matches!(result, Err(RankError::InvalidInput(_))));
    }

    #[test]
    fn from_columns_rejects_duplicate_names() {
        let result = EdgeTable::from_columns([
            ("a", vec![Value::from(1)]),
            ("a", vec![Value::from(2)]),
        ]);
        assert!(matches!(result, Err(RankError::InvalidInput(_))));
    }

    #[test]
    fn resolve_prefers_named_column() {
        let table = EdgeTable::from_columns([
            ("from", vec![Value::from("u1")]),
            ("to", vec![Value::from("v1")]),
        ])
        .expect("table");

        let col = table.resolve(Some("to"), 0, "sender").expect("resolve");
        assert_eq!(col, &[Value::from("v1")]);
    }

    #[test]
    fn resolve_missing_name_lists_available_columns() {
        let table = EdgeTable::from_edges([("u1", "v1")]);
        let err = table.resolve(Some("nope"), 0, "sender").unwrap_err();
        match err {
            RankError::UnresolvableColumn { name, available } => {
                assert_eq!(name, "nope");
                assert_eq!(available, vec!["sender", "receiver"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn resolve_default_needs_enough_columns() {
        let table =
            EdgeTable::from_columns([("only", vec![Value::from(1)])]).expect("table");
        assert!(table.resolve(None, 1, "receiver").is_err());
    }

    #[test]
    fn float_cells_make_integral_node_ids() {
        assert_eq!(Value::Float(7.0).as_node_id(), Some(NodeId::Int(7)));
        assert_eq!(Value::Float(7.5).as_node_id(), None);
    }
}
