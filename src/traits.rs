//! Source adapter trait and registry.
//!
//! Every upstream paper API is wrapped in a [`PaperSource`] implementation.
//! The digest pipeline only ever talks to the trait, so adding a source
//! means adding one module and one `register` call.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               SourceRegistry                 │
//! │  ┌───────┐ ┌──────────┐ ┌──────────┐ ┌────┐ │
//! │  │ arxiv │ │ crossref │ │ openalex │ │ s2 │ │
//! │  └───────┘ └──────────┘ └──────────┘ └────┘ │
//! └──────────────────┬───────────────────────────┘
//!                    ▼
//!        fetch(date, query) → digest pipeline
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;

use crate::config::{Config, HttpConfig};
use crate::models::Paper;
use crate::source_arxiv::ArxivSource;
use crate::source_crossref::CrossrefSource;
use crate::source_openalex::OpenAlexSource;
use crate::source_semantic_scholar::SemanticScholarSource;

/// Error produced by a source adapter.
///
/// These never abort a digest run; the pipeline records them per source
/// and carries on with whatever the other sources returned.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// A scholarly API that can be asked for papers matching a query on a date.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use chrono::NaiveDate;
/// use paper_digest::models::Paper;
/// use paper_digest::traits::{PaperSource, SourceError};
///
/// pub struct FixtureSource;
///
/// #[async_trait]
/// impl PaperSource for FixtureSource {
///     fn name(&self) -> &str { "fixture" }
///     fn description(&self) -> &str { "Serve papers from a fixed list" }
///
///     async fn fetch(&self, _date: NaiveDate, _query: &str) -> Result<Vec<Paper>, SourceError> {
///         Ok(vec![])
///     }
/// }
/// ```
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Short identifier used as the `source` label on returned papers
    /// (e.g. `"arxiv"`).
    fn name(&self) -> &str;

    /// One-line description shown by `pdg sources`.
    fn description(&self) -> &str;

    /// Fetch papers matching `query` that were published on `date`.
    ///
    /// Called on the tokio runtime; performs HTTP requests. Returned
    /// papers must already be filtered to the requested date and carry
    /// this source's [`name`](PaperSource::name) as their `source` field.
    async fn fetch(&self, date: NaiveDate, query: &str) -> Result<Vec<Paper>, SourceError>;
}

/// Registry of enabled source adapters, in fetch order.
///
/// Registration order is the order the pipeline queries sources in, which
/// in turn fixes the candidate order that score ties fall back to. Keep
/// it stable.
pub struct SourceRegistry {
    sources: Vec<Box<dyn PaperSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a registry holding every source the config enables, in the
    /// built-in order: arxiv, crossref, openalex, semantic-scholar.
    pub fn from_config(config: &Config, client: &reqwest::Client) -> Self {
        let mut registry = Self::new();

        if config.sources.arxiv.enabled {
            registry.register(Box::new(ArxivSource::new(
                config.sources.arxiv.clone(),
                client.clone(),
            )));
        }
        if config.sources.crossref.enabled {
            registry.register(Box::new(CrossrefSource::new(
                config.sources.crossref.clone(),
                client.clone(),
            )));
        }
        if config.sources.openalex.enabled {
            registry.register(Box::new(OpenAlexSource::new(
                config.sources.openalex.clone(),
                client.clone(),
            )));
        }
        if config.sources.semantic_scholar.enabled {
            registry.register(Box::new(SemanticScholarSource::new(
                config.sources.semantic_scholar.clone(),
                client.clone(),
            )));
        }

        registry
    }

    /// Register a source at the end of the fetch order.
    pub fn register(&mut self, source: Box<dyn PaperSource>) {
        self.sources.push(source);
    }

    /// All registered sources, in fetch order.
    pub fn sources(&self) -> &[Box<dyn PaperSource>] {
        &self.sources
    }

    /// Find a source by name.
    pub fn find(&self, name: &str) -> Option<&dyn PaperSource> {
        self.sources
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.as_ref())
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Return the count of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the HTTP client shared by every source in a run.
///
/// One client keeps a single connection pool across sources; the timeout
/// and user agent come from `[http]` in the config file.
pub fn build_http_client(http: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(http.timeout_secs))
        .user_agent(http.user_agent.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn registry_order_follows_builtin_order() {
        let config = Config::default();
        let client = reqwest::Client::new();
        let registry = SourceRegistry::from_config(&config, &client);
        let names: Vec<_> = registry.sources().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["arxiv", "crossref", "openalex", "semantic-scholar"]);
    }

    #[test]
    fn disabled_sources_are_skipped() {
        let mut config = Config::default();
        config.sources.crossref.enabled = false;
        config.sources.semantic_scholar.enabled = false;
        let client = reqwest::Client::new();
        let registry = SourceRegistry::from_config(&config, &client);
        assert_eq!(registry.len(), 2);
        assert!(registry.find("crossref").is_none());
        assert!(registry.find("openalex").is_some());
    }
}
