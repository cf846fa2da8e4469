//! `birank pagerank` — PageRank over a one-mode edge list, or over a
//! one-mode projection of a bipartite one.

use std::io::Write;
use std::path::PathBuf;

use birank_core::graph::{
    BipartiteGraph, BuildConfig, DuplicatePolicy, OneModeGraph, ProjectionMode,
};
use birank_core::rank::{pagerank, pagerank_projected, PageRankConfig, PageRankResult};
use clap::Args;

use crate::cmd::rank::render_side;
use crate::input;
use crate::output::{cli_error, render, render_error, OutputMode};

/// Arguments for `birank pagerank`.
#[derive(Args, Debug)]
pub struct PagerankArgs {
    /// Edge list file. Tab-separated unless the extension is `.csv`.
    pub file: PathBuf,

    /// Treat the file as bipartite and rank its projection onto one side
    /// (rows or columns). Default: the file is already one-mode.
    #[arg(long)]
    pub project: Option<ProjectionMode>,

    /// Damping toward the uniform prior.
    #[arg(long, default_value_t = 0.85)]
    pub alpha: f64,

    /// Iteration budget.
    #[arg(long, default_value_t = 200)]
    pub max_iter: usize,

    /// Convergence tolerance on the score movement.
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,

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
}

/// Execute `birank pagerank`.
pub fn run_pagerank(args: &PagerankArgs, output: OutputMode, quiet: bool) -> anyhow::Result<()> {
    let table = input::read_edge_table(&args.file, args.delimiter, args.header)?;

    let build = BuildConfig {
        sender_column: args.sender_column.clone(),
        receiver_column: args.receiver_column.clone(),
        weight_column: args
            .weight_column
            .clone()
            .or_else(|| input::detected_weight_column(&table)),
        duplicates: args.duplicates,
        rm_weights: false,
    };
    let config = PageRankConfig {
        alpha: args.alpha,
        max_iter: args.max_iter,
        tol: args.tol,
    };

    let result = match args.project {
        Some(mode) => BipartiteGraph::from_table(&table, &build)
            .and_then(|graph| pagerank_projected(&graph, mode, &config)),
        None => OneModeGraph::from_table(&table, &build)
            .and_then(|graph| pagerank(&graph, &config)),
    };
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            render_error(output, &cli_error(&err))?;
            anyhow::bail!("pagerank failed");
        }
    };

    if !result.converged && !quiet {
        eprintln!(
            "warning: scores did not converge within {} iterations; raise --max-iter or loosen --tol",
            result.iterations
        );
    }

    render(output, &result, render_pagerank_human)
}

fn render_pagerank_human(result: &PageRankResult, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "iterations: {}{}",
        result.iterations,
        if result.converged { "" } else { " (not converged)" }
    )?;
    render_side(w, "nodes", &result.scores)
}
