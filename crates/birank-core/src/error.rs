//! Error taxonomy for the rank engine.
//!
//! Construction errors abort before any matrix is built — there is no
//! partial-matrix state to observe. Non-convergence of the solver is *not*
//! an error: it is reported through the `converged` flag on the result so
//! callers can decide whether to retry with a larger budget (see
//! [`crate::rank::bipartite::BipartiteRankResult`]).

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors returned by the matrix builder and solver entry points.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// The input is neither a supported edge-list shape nor a supported
    /// matrix shape.
    #[error("unsupported input: {0}")]
    InvalidInput(String),

    /// A designated sender/receiver/weight column does not exist in the
    /// tabular input.
    #[error("column {name:?} not found in edge table (available: {available:?})")]
    UnresolvableColumn {
        name: String,
        available: Vec<String>,
    },

    /// An explicit edge weight is non-finite or negative. Stored weights
    /// must be finite and positive; a zero matrix entry means "no edge".
    #[error("invalid weight {weight} on edge {row} of the input: weights must be finite and non-negative")]
    InvalidWeight { row: usize, weight: f64 },

    /// A solver parameter is outside its documented domain: damping factors
    /// must lie in (0, 1], `max_iter` must be at least 1, and `tol` must be
    /// positive.
    #[error("invalid parameter {name}={value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_column() {
        let err = RankError::UnresolvableColumn {
            name: "weight".to_string(),
            available: vec!["from".to_string(), "to".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"weight\""), "message was: {msg}");
        assert!(msg.contains("from"), "message was: {msg}");
    }

    #[test]
    fn parameter_errors_carry_the_domain() {
        let err = RankError::InvalidParameter {
            name: "alpha",
            value: 1.5,
            expected: "a value in (0, 1]",
        };
        assert!(err.to_string().contains("(0, 1]"));
    }
}
