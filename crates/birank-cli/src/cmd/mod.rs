//! Command handlers, one module per subcommand.

pub mod pagerank;
pub mod rank;
