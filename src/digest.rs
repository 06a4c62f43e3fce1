//! Digest pipeline orchestration.
//!
//! Coordinates the full digest flow: source fetch → URL dedup → ranking →
//! summaries → report. A failing source is logged and recorded in the
//! report, never fatal; the worst case is an empty digest.

use std::collections::{BTreeSet, HashMap};
use std::time::Instant;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::dedup::dedupe_by_url;
use crate::format::format_digest;
use crate::models::{Paper, RankedPaper};
use crate::rank::{rank_papers_with, Scorer, TermOverlapScorer};
use crate::summarize::{LeadSummarizer, Summarizer};
use crate::tokenize::{tokenize, unique_tokens};
use crate::traits::{build_http_client, SourceRegistry};

/// Number of theme terms surfaced in the recommendations.
const THEME_TERMS: usize = 5;

/// One paper in the final digest.
#[derive(Debug, Clone, Serialize)]
pub struct DigestEntry {
    pub paper: Paper,
    pub score: f64,
    pub highlight: String,
    pub summary: String,
}

/// Outcome of querying one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name: String,
    /// Papers the source returned for the target date, before dedup.
    pub fetched: usize,
    /// Error message when the fetch failed.
    pub error: Option<String>,
}

/// A complete digest run with its statistics.
///
/// All run accounting lives in this caller-owned value; there is no
/// global collector to reset between runs.
#[derive(Debug, Clone, Serialize)]
pub struct DigestReport {
    pub query: String,
    pub date: NaiveDate,
    pub entries: Vec<DigestEntry>,
    /// Up to five frequent content terms across the ranked papers, with
    /// the query's own terms removed.
    pub themes: Vec<String>,
    pub sources: Vec<SourceReport>,
    /// Candidate count across all sources, before deduplication.
    pub candidates_fetched: usize,
    /// Candidate count after URL deduplication.
    pub unique_candidates: usize,
    pub elapsed_ms: u64,
}

impl DigestReport {
    /// Distinct source labels among the ranked entries.
    pub fn top_sources(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .map(|entry| entry.paper.source.as_str())
            .collect()
    }

    /// Editorial warnings for a thin or malformed digest. Advisory only;
    /// the digest is still rendered.
    pub fn quality_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.entries.len() < 3 {
            issues.push("Fewer than 3 papers made the digest.".to_string());
        }
        if self.top_sources().is_empty() {
            issues.push("No source contributed a ranked paper.".to_string());
        }
        if self.entries.iter().any(|e| e.paper.url.is_empty()) {
            issues.push("Some ranked papers have no URL.".to_string());
        }
        issues
    }
}

/// Run the digest pipeline with the default scorer.
pub async fn build_digest(
    registry: &SourceRegistry,
    summarizer: &dyn Summarizer,
    query: &str,
    date: NaiveDate,
    limit: usize,
) -> DigestReport {
    build_digest_with(registry, &TermOverlapScorer, summarizer, query, date, limit).await
}

/// Run the digest pipeline with a caller-chosen scoring strategy.
///
/// Sources are queried sequentially in registry order, which keeps the
/// candidate sequence (and therefore score-tie ordering) deterministic
/// for a given set of source responses.
pub async fn build_digest_with(
    registry: &SourceRegistry,
    scorer: &dyn Scorer,
    summarizer: &dyn Summarizer,
    query: &str,
    date: NaiveDate,
    limit: usize,
) -> DigestReport {
    let started = Instant::now();

    let mut papers: Vec<Paper> = Vec::new();
    let mut sources = Vec::with_capacity(registry.len());
    for source in registry.sources() {
        match source.fetch(date, query).await {
            Ok(fetched) => {
                debug!(
                    source = source.name(),
                    count = fetched.len(),
                    "source fetch complete"
                );
                sources.push(SourceReport {
                    name: source.name().to_string(),
                    fetched: fetched.len(),
                    error: None,
                });
                papers.extend(fetched);
            }
            Err(err) => {
                warn!(source = source.name(), error = %err, "source fetch failed");
                sources.push(SourceReport {
                    name: source.name().to_string(),
                    fetched: 0,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    let candidates_fetched = papers.len();
    let unique = dedupe_by_url(papers);
    let unique_candidates = unique.len();

    let ranked = rank_papers_with(scorer, query, unique, limit);
    let themes = theme_terms(query, &ranked, THEME_TERMS);
    let entries: Vec<DigestEntry> = ranked
        .into_iter()
        .map(|item| {
            let summary = summarizer.summarize(&item.paper);
            DigestEntry {
                paper: item.paper,
                score: item.score,
                highlight: item.highlight,
                summary,
            }
        })
        .collect();

    DigestReport {
        query: query.to_string(),
        date,
        entries,
        themes,
        sources,
        candidates_fetched,
        unique_candidates,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

/// Entry point for `pdg digest`.
///
/// Wires the configured sources into a registry, runs the pipeline, and
/// prints the digest to stdout as Markdown or pretty JSON. Quality
/// problems with the result (too few papers, missing links) go to the
/// log, not into the digest itself.
pub async fn run_digest(
    config: &Config,
    query: &str,
    date: NaiveDate,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let client = build_http_client(&config.http).context("Failed to build HTTP client")?;
    let registry = SourceRegistry::from_config(config, &client);
    if registry.is_empty() {
        warn!("all sources are disabled; the digest will be empty");
    }

    let limit = limit.unwrap_or(config.digest.limit);
    let summarizer = LeadSummarizer::default();
    let report = build_digest(&registry, &summarizer, query, date, limit).await;

    for issue in report.quality_issues() {
        warn!("{}", issue);
    }

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", rendered);
    } else {
        print!("{}", format_digest(&report));
    }
    Ok(())
}

/// Most frequent content terms across the ranked papers, with the query's
/// own terms removed. Ties resolve in first-seen order across the list.
fn theme_terms(query: &str, ranked: &[RankedPaper], top_k: usize) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for item in ranked {
        for token in tokenize(&item.paper.content()) {
            if !counts.contains_key(&token) {
                order.push(token.clone());
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    let query_terms = unique_tokens(query);
    let mut terms: Vec<(String, usize)> = order
        .into_iter()
        .filter(|term| !query_terms.contains(term))
        .map(|term| {
            let count = counts.get(&term).copied().unwrap_or(0);
            (term, count)
        })
        .collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1));
    terms.truncate(top_k);
    terms.into_iter().map(|(term, _)| term).collect()
}
