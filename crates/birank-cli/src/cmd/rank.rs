//! `birank rank` — score both sides of a bipartite edge list.

use std::io::Write;
use std::path::PathBuf;

use birank_core::graph::{BuildConfig, DuplicatePolicy, NodeId};
use birank_core::rank::{
    rank_table, BipartiteRankConfig, BipartiteRankResult, Normalizer, RankVector, ReturnMode,
};
use clap::Args;

use crate::input;
use crate::output::{cli_error, render, render_error, OutputMode};

/// Arguments for `birank rank`.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Edge list file. Tab-separated unless the extension is `.csv`.
    pub file: PathBuf,

    /// Normalization scheme: hits, cohits, bgrm, or birank.
    #[arg(long, default_value = "hits")]
    pub normalizer: Normalizer,

    /// Damping toward the uniform prior on the sender side.
    #[arg(long, default_value_t = 0.85)]
    pub alpha: f64,

    /// Damping toward the uniform prior on the receiver side.
    #[arg(long, default_value_t = 0.85)]
    pub beta: f64,

    /// Iteration budget.
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Convergence tolerance on the combined score movement.
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,

    /// Which side to report: rows, columns, or both.
    #[arg(long, default_value = "rows")]
    pub sides: ReturnMode,

    /// Treat the first line as a header naming the columns.
    #[arg(long)]
    pub header: bool,

    /// Field delimiter. Default: inferred from the file extension.
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Sender column name. Default: the first column.
    #[arg(long)]
    pub sender_column: Option<String>,

    /// Receiver column name. Default: the second column.
    #[arg(long)]
    pub receiver_column: Option<String>,

    /// Weight column name; "unweighted" forces unit weights. Default: a
    /// column named "weight" when one exists.
    #[arg(long)]
    pub weight_column: Option<String>,

    /// How repeated (sender, receiver) pairs collapse: add or remove.
    #[arg(long, default_value = "add")]
    pub duplicates: DuplicatePolicy,

    /// Replace weights with 1.0 after duplicates collapse.
    #[arg(long)]
    pub rm_weights: bool,
}

/// Execute `birank rank`.
pub fn run_rank(args: &RankArgs, output: OutputMode, quiet: bool) -> anyhow::Result<()> {
    let table = input::read_edge_table(&args.file, args.delimiter, args.header)?;

    let build = BuildConfig {
        sender_column: args.sender_column.clone(),
        receiver_column: args.receiver_column.clone(),
        weight_column: args
            .weight_column
            .clone()
            .or_else(|| input::detected_weight_column(&table)),
        duplicates: args.duplicates,
        rm_weights: args.rm_weights,
    };
    let config = BipartiteRankConfig {
        normalizer: args.normalizer,
        alpha: args.alpha,
        beta: args.beta,
        max_iter: args.max_iter,
        tol: args.tol,
        return_mode: args.sides,
    };

    let result = match rank_table(&table, &build, &config) {
        Ok(result) => result,
        Err(err) => {
            render_error(output, &cli_error(&err))?;
            anyhow::bail!("rank failed");
        }
    };

    if !result.converged && !quiet {
        eprintln!(
            "warning: scores did not converge within {} iterations; pass a degree-normalized \
             scheme (--normalizer cohits|bgrm|birank) or raise --max-iter",
            result.iterations
        );
    }

    render(output, &result, render_rank_human)
}

fn render_rank_human(result: &BipartiteRankResult, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "normalizer: {}", result.normalizer)?;
    writeln!(
        w,
        "iterations: {}{}",
        result.iterations,
        if result.converged { "" } else { " (not converged)" }
    )?;
    if let Some(ref rows) = result.rows {
        render_side(w, "senders", rows)?;
    }
    if let Some(ref columns) = result.columns {
        render_side(w, "receivers", columns)?;
    }
    Ok(())
}

/// One side as a descending score table. Ties keep first-occurrence
/// order, so the listing is deterministic.
pub fn render_side(w: &mut dyn Write, side: &str, ranks: &RankVector) -> std::io::Result<()> {
    writeln!(w, "\n{side} ({})", ranks.len())?;
    let mut sorted: Vec<&(NodeId, f64)> = ranks.iter().collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    for (label, score) in sorted {
        writeln!(w, "  {label}\t{score:.6}")?;
    }
    Ok(())
}
