#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use std::env;

use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "birank: rank both sides of a bipartite graph",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Rank a bipartite edge list",
        long_about = "Rank the senders and receivers of a bipartite edge list with HITS, \
                      CoHITS, BGRM, or BiRank.",
        after_help = "EXAMPLES:\n    # Rank senders of a TSV edge list with BiRank\n    \
                      birank rank edges.tsv --normalizer birank\n\n    # Both sides of a \
                      weighted CSV with named columns\n    birank rank ratings.csv --header \
                      --sender-column user --receiver-column item --weight-column stars \
                      --sides both\n\n    # Emit machine-readable output\n    birank rank \
                      edges.tsv --json"
    )]
    Rank(cmd::rank::RankArgs),

    #[command(
        about = "PageRank a one-mode edge list or projection",
        long_about = "Run PageRank over a one-mode edge list, or project a bipartite edge \
                      list onto one side first.",
        after_help = "EXAMPLES:\n    # PageRank a one-mode edge list\n    birank pagerank \
                      links.tsv\n\n    # Project a bipartite list onto its senders first\n    \
                      birank pagerank edges.tsv --project rows\n\n    # Emit machine-readable \
                      output\n    birank pagerank links.tsv --json"
    )]
    Pagerank(cmd::pagerank::PagerankArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("BIRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "birank=debug,info"
        } else {
            "birank=info,warn"
        })
    });

    let format = env::var("BIRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("verbose mode enabled");
    }

    let output = cli.output_mode();
    match cli.command {
        Commands::Rank(ref args) => cmd::rank::run_rank(args, output, cli.quiet),
        Commands::Pagerank(ref args) => cmd::pagerank::run_pagerank(args, output, cli.quiet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["birank", "--json", "rank", "edges.tsv"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["birank", "rank", "edges.tsv", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn default_output_is_human() {
        let cli = Cli::parse_from(["birank", "rank", "edges.tsv"]);
        assert!(!cli.json);
        assert!(!cli.output_mode().is_json());
    }

    #[test]
    fn quiet_flag_is_global() {
        let cli = Cli::parse_from(["birank", "pagerank", "links.tsv", "--quiet"]);
        assert!(cli.quiet);
    }
}
