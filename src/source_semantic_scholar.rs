//! Semantic Scholar source adapter.
//!
//! Queries the Semantic Scholar Graph search API. The API has no
//! publication-date filter on this endpoint, so results are filtered
//! locally against `publicationDate`.
//!
//! Requests are unauthenticated by default. Setting the
//! `SEMANTIC_SCHOLAR_API_KEY` environment variable sends the key in the
//! `x-api-key` header, which lifts the public rate limit.
//!
//! # Configuration
//!
//! ```toml
//! [sources.semantic_scholar]
//! enabled = true
//! limit = 50
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::SemanticScholarConfig;
use crate::models::Paper;
use crate::traits::{PaperSource, SourceError};

const SEMANTIC_SCHOLAR_API_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";

const API_KEY_ENV: &str = "SEMANTIC_SCHOLAR_API_KEY";

pub const SOURCE_NAME: &str = "semantic-scholar";

pub struct SemanticScholarSource {
    config: SemanticScholarConfig,
    client: reqwest::Client,
}

impl SemanticScholarSource {
    pub fn new(config: SemanticScholarConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl PaperSource for SemanticScholarSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn description(&self) -> &str {
        "Semantic Scholar Graph API (api.semanticscholar.org)"
    }

    async fn fetch(&self, date: NaiveDate, query: &str) -> Result<Vec<Paper>, SourceError> {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(SEMANTIC_SCHOLAR_API_URL);
        let mut request = self.client.get(base).query(&[
            ("query", query.to_string()),
            ("limit", self.config.limit.to_string()),
            (
                "fields",
                "title,abstract,url,authors,publicationDate".to_string(),
            ),
        ]);
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            request = request.header("x-api-key", key);
        }
        let body = request
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_search_response(&body, date)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default, rename = "paperId")]
    paper_id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    authors: Vec<SearchAuthor>,
    #[serde(default, rename = "publicationDate")]
    publication_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchAuthor {
    #[serde(default)]
    name: Option<String>,
}

/// Parse a Graph search response, keeping papers published on `target`.
/// Papers without a publication date (preprints still in review, many
/// older records) are dropped.
pub fn parse_search_response(body: &str, target: NaiveDate) -> Result<Vec<Paper>, SourceError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let mut papers = Vec::new();
    for item in response.data {
        let published = match item
            .publication_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        {
            Some(d) => d,
            None => continue,
        };
        if published != target {
            continue;
        }
        let authors: Vec<String> = item
            .authors
            .iter()
            .map(|a| a.name.as_deref().unwrap_or("").trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        papers.push(Paper {
            id: item.paper_id,
            title: item.title.unwrap_or_else(|| "Untitled".to_string()),
            abstract_text: item.abstract_text,
            authors,
            url: item.url.unwrap_or_default(),
            published,
            source: SOURCE_NAME.to_string(),
        });
    }
    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
      "total": 4,
      "data": [
        {
          "paperId": "s2-match",
          "title": "Benchmarks for retrieval",
          "abstract": "We benchmark retrieval. Twice.",
          "url": "https://www.semanticscholar.org/paper/s2-match",
          "publicationDate": "2026-01-22",
          "authors": [{"name": "  Edsger Dijkstra "}, {"name": ""}]
        },
        {
          "paperId": "s2-undated",
          "title": "No date yet",
          "publicationDate": null,
          "authors": []
        },
        {
          "paperId": "s2-baddate",
          "title": "Strange date",
          "publicationDate": "22/01/2026",
          "authors": []
        },
        {
          "paperId": "s2-nulltitle",
          "title": null,
          "publicationDate": "2026-01-22",
          "authors": []
        }
      ]
    }"#;

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 22).unwrap()
    }

    #[test]
    fn keeps_only_dated_matches() {
        let papers = parse_search_response(RESPONSE, target()).unwrap();
        let ids: Vec<_> = papers.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["s2-match", "s2-nulltitle"]);
    }

    #[test]
    fn maps_item_fields() {
        let papers = parse_search_response(RESPONSE, target()).unwrap();
        let p = &papers[0];
        assert_eq!(p.title, "Benchmarks for retrieval");
        assert_eq!(p.url, "https://www.semanticscholar.org/paper/s2-match");
        assert_eq!(p.abstract_text.as_deref(), Some("We benchmark retrieval. Twice."));
        assert_eq!(p.source, "semantic-scholar");
    }

    #[test]
    fn author_names_are_trimmed_and_empties_dropped() {
        let papers = parse_search_response(RESPONSE, target()).unwrap();
        assert_eq!(papers[0].authors, vec!["Edsger Dijkstra"]);
    }

    #[test]
    fn null_title_becomes_untitled() {
        let papers = parse_search_response(RESPONSE, target()).unwrap();
        assert_eq!(papers[1].title, "Untitled");
        assert_eq!(papers[1].url, "");
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            parse_search_response("[]", target()),
            Err(SourceError::Parse(_))
        ));
    }
}
