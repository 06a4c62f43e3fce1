//! # Paper Digest CLI (`pdg`)
//!
//! The `pdg` binary is the primary interface for Paper Digest. It provides
//! commands for building the daily ranked digest, probing individual paper
//! sources, and inspecting the configured source list.
//!
//! ## Usage
//!
//! ```bash
//! pdg --config ./pdg.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pdg digest --query "<q>"` | Fetch, dedupe, rank, and print the digest |
//! | `pdg fetch <source> --query "<q>"` | Run one source and print its papers |
//! | `pdg sources` | List known sources and their settings |
//!
//! ## Examples
//!
//! ```bash
//! # Today's digest for a topic
//! pdg digest --query "graph neural networks"
//!
//! # Digest for a specific day, top 5 only
//! pdg digest --query "diffusion models" --date 2025-11-03 --limit 5
//!
//! # Machine-readable report
//! pdg digest --query "program synthesis" --json
//!
//! # Check what a single source returns for a day
//! pdg fetch arxiv --query "type inference" --date 2025-11-03
//!
//! # Show configured sources
//! pdg sources
//! ```

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use paper_digest::{config, digest, sources};

/// Paper Digest CLI: a daily scholarly-paper aggregation and ranking
/// pipeline.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the flag is omitted and `./pdg.toml` does not exist, built-in
/// defaults are used.
#[derive(Parser)]
#[command(
    name = "pdg",
    about = "A daily scholarly-paper aggregation and ranking pipeline",
    version,
    long_about = "Paper Digest queries several scholarly APIs (arXiv, Crossref, OpenAlex, \
    Semantic Scholar) for papers published on a given day, deduplicates them by URL, ranks \
    them against a free-text topic with a term-overlap score, and renders the top results \
    as a Markdown digest with highlights, summaries, and recurring themes."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// A missing file at the default path falls back to built-in defaults;
    /// an explicitly passed path must exist.
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build and print the paper digest.
    ///
    /// Fetches candidates from every enabled source, deduplicates them by
    /// URL, ranks them against the query, and prints a Markdown digest.
    /// With `--json` the full report (entries, themes, per-source stats)
    /// is printed as pretty JSON instead.
    Digest {
        /// Free-text topic to rank papers against.
        #[arg(short, long)]
        query: String,

        /// Publication date to fetch (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Maximum number of ranked papers. Overrides `[digest].limit`.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the full report as pretty JSON instead of Markdown.
        #[arg(long)]
        json: bool,
    },

    /// Fetch papers from a single source.
    ///
    /// Runs one adapter in isolation and prints everything it returned,
    /// without deduplication or ranking. Useful for verifying connectivity
    /// and checking what a source's own date filtering lets through.
    Fetch {
        /// Source name: `arxiv`, `crossref`, `openalex`, or `semantic-scholar`.
        source: String,

        /// Free-text topic passed to the source's search endpoint.
        #[arg(short, long)]
        query: String,

        /// Publication date to fetch (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List known sources and their settings.
    ///
    /// Shows every source the binary knows about, whether the config
    /// enables it, and a summary of its settings. Performs no network
    /// calls.
    Sources,
}

/// Parse a `--date` value, defaulting to today's local date.
fn resolve_date(date: Option<&str>) -> anyhow::Result<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Route diagnostics to stderr so stdout stays clean for digest output.
///
/// `RUST_LOG` controls verbosity; without it only warnings show.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = config::load_config_or_default(&cli.config)?;

    match cli.command {
        Commands::Digest {
            query,
            date,
            limit,
            json,
        } => {
            let date = resolve_date(date.as_deref())?;
            digest::run_digest(&cfg, &query, date, limit, json).await?;
        }
        Commands::Fetch {
            source,
            query,
            date,
        } => {
            let date = resolve_date(date.as_deref())?;
            sources::run_fetch(&cfg, &source, &query, date).await?;
        }
        Commands::Sources => {
            sources::list_sources(&cfg);
        }
    }

    Ok(())
}
