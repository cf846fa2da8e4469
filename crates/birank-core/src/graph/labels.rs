//! Node labels and the label ↔ dense-index bookkeeping.
//!
//! # Overview
//!
//! The numeric pipeline addresses every node by a dense `usize` index.
//! [`LabelMap`] is the narrow collaborator that owns the mapping between
//! those indices and the caller's original identifiers: it interns each
//! *distinct* label in **order of first occurrence** and hands back the
//! index. That ordering is an observable contract — result tables are
//! emitted in it, and callers rely on it to line ranks up with their input.
//!
//! Row (sender) and column (receiver) labels live in two independent
//! [`LabelMap`]s even when the identifier values overlap: a sender `5` and
//! a receiver `5` are distinct nodes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// A free-form node identifier: integer or text.
///
/// Edge-list inputs identify nodes with whatever the source data carries —
/// user ids, item names, plain integers. Matrix inputs without explicit
/// labels get positional `Int` labels counted from 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Integer identifier.
    Int(i64),
    /// Text identifier.
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for NodeId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for NodeId {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for NodeId {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

// ---------------------------------------------------------------------------
// LabelMap
// ---------------------------------------------------------------------------

/// First-occurrence-ordered mapping between node labels and dense indices.
///
/// Interning the same label twice returns the index assigned on first
/// sight; iteration yields labels in index order. The map is append-only —
/// indices never shift once assigned, so every vector computed downstream
/// (degrees, ranks) stays aligned with it.
#[derive(Debug, Clone, Default)]
pub struct LabelMap {
    labels: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl LabelMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` labels.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Positional labels `1..=n`, for matrix input without names.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn positional(n: usize) -> Self {
        let mut map = Self::with_capacity(n);
        for i in 0..n {
            map.intern(NodeId::Int(i as i64 + 1));
        }
        map
    }

    /// Return the dense index for `label`, assigning the next index if the
    /// label has not been seen before.
    pub fn intern(&mut self, label: NodeId) -> usize {
        if let Some(&idx) = self.index.get(&label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.clone());
        self.index.insert(label, idx);
        idx
    }

    /// Look up the index previously assigned to `label`.
    #[must_use]
    pub fn index_of(&self, label: &NodeId) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Return the label at `idx`.
    #[must_use]
    pub fn label(&self, idx: usize) -> Option<&NodeId> {
        self.labels.get(idx)
    }

    /// Number of distinct labels interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Return `true` if no labels have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate labels in index (first-occurrence) order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.labels.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
