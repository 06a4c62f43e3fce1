//! Source inspection commands: the `sources` table and single-source `fetch`.

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Config;
use crate::traits::{build_http_client, SourceRegistry};
use crate::{source_arxiv, source_crossref, source_openalex, source_semantic_scholar};

/// Configuration status of one source adapter.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub name: String,
    pub enabled: bool,
    /// Compact settings summary shown in the listing.
    pub details: String,
}

/// Collect the status of every known source from the config.
pub fn get_sources(config: &Config) -> Vec<SourceStatus> {
    let openalex = &config.sources.openalex;
    let openalex_details = match &openalex.mailto {
        Some(mailto) => format!("per_page={}, mailto={}", openalex.per_page, mailto),
        None => format!("per_page={}", openalex.per_page),
    };

    vec![
        SourceStatus {
            name: source_arxiv::SOURCE_NAME.to_string(),
            enabled: config.sources.arxiv.enabled,
            details: format!("max_results={}", config.sources.arxiv.max_results),
        },
        SourceStatus {
            name: source_crossref::SOURCE_NAME.to_string(),
            enabled: config.sources.crossref.enabled,
            details: format!("rows={}", config.sources.crossref.rows),
        },
        SourceStatus {
            name: source_openalex::SOURCE_NAME.to_string(),
            enabled: openalex.enabled,
            details: openalex_details,
        },
        SourceStatus {
            name: source_semantic_scholar::SOURCE_NAME.to_string(),
            enabled: config.sources.semantic_scholar.enabled,
            details: format!("limit={}", config.sources.semantic_scholar.limit),
        },
    ]
}

/// Print the source table for `pdg sources`.
pub fn list_sources(config: &Config) {
    println!("{:<18} {:<8} SETTINGS", "SOURCE", "ENABLED");
    for status in get_sources(config) {
        println!(
            "{:<18} {:<8} {}",
            status.name, status.enabled, status.details
        );
    }
}

/// Entry point for `pdg fetch <source>`.
///
/// Runs a single adapter and prints everything it returned, before any
/// deduplication or ranking. Useful for checking connectivity and
/// source-side filtering.
pub async fn run_fetch(
    config: &Config,
    name: &str,
    query: &str,
    date: NaiveDate,
) -> anyhow::Result<()> {
    let client = build_http_client(&config.http).context("Failed to build HTTP client")?;
    let registry = SourceRegistry::from_config(config, &client);
    let source = registry.find(name).ok_or_else(|| {
        let enabled: Vec<&str> = registry.sources().iter().map(|s| s.name()).collect();
        let enabled = if enabled.is_empty() {
            "none".to_string()
        } else {
            enabled.join(", ")
        };
        anyhow!("Unknown or disabled source '{}'. Enabled sources: {}", name, enabled)
    })?;

    println!("--- {} ---", source.name());
    println!("{}", source.description());
    println!();

    let papers = source
        .fetch(date, query)
        .await
        .with_context(|| format!("Fetch from '{}' failed", name))?;
    println!("{} paper(s) for '{}' on {}", papers.len(), query, date);

    for paper in &papers {
        println!();
        println!("--- {} ---", paper.title);
        println!("id:        {}", paper.id);
        if !paper.authors.is_empty() {
            println!("authors:   {}", paper.authors.join(", "));
        }
        println!("published: {}", paper.published);
        if !paper.url.is_empty() {
            println!("url:       {}", paper.url);
        }
        if let Some(abstract_text) = &paper.abstract_text {
            println!();
            println!("{}", abstract_text);
        }
    }
    Ok(())
}
