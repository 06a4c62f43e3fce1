//! OpenAlex source adapter.
//!
//! Queries the OpenAlex works API for a single publication day. OpenAlex
//! does not ship plain abstracts; they arrive as an inverted index
//! (word -> positions) and are reconstructed here before scoring.
//!
//! # Configuration
//!
//! ```toml
//! [sources.openalex]
//! enabled = true
//! per_page = 50
//! mailto = "you@example.org"
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::OpenAlexConfig;
use crate::models::Paper;
use crate::traits::{PaperSource, SourceError};

const OPENALEX_API_URL: &str = "https://api.openalex.org/works";

/// Search term used when the query is blank; OpenAlex rejects an empty
/// `search` parameter.
const FALLBACK_SEARCH: &str = "artificial intelligence";

/// Largest accepted `abstract_inverted_index` position. Real abstracts sit
/// far below this; anything larger never sizes the reconstruction buffer.
const MAX_ABSTRACT_POSITION: usize = 100_000;

pub const SOURCE_NAME: &str = "openalex";

pub struct OpenAlexSource {
    config: OpenAlexConfig,
    client: reqwest::Client,
}

impl OpenAlexSource {
    pub fn new(config: OpenAlexConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl PaperSource for OpenAlexSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn description(&self) -> &str {
        "OpenAlex works API (api.openalex.org)"
    }

    async fn fetch(&self, date: NaiveDate, query: &str) -> Result<Vec<Paper>, SourceError> {
        let base = self.config.base_url.as_deref().unwrap_or(OPENALEX_API_URL);
        let day = date.format("%Y-%m-%d").to_string();
        let search = query.trim();
        let search = if search.is_empty() { FALLBACK_SEARCH } else { search };

        let mut params = vec![
            (
                "filter",
                format!("from_publication_date:{day},to_publication_date:{day}"),
            ),
            ("search", search.to_string()),
            ("per-page", self.config.per_page.to_string()),
        ];
        if let Some(mailto) = &self.config.mailto {
            params.push(("mailto", mailto.clone()));
        }

        let body = self
            .client
            .get(base)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_openalex_response(&body, date)
    }
}

#[derive(Debug, Deserialize)]
struct OpenAlexResponse {
    #[serde(default)]
    results: Vec<OpenAlexWork>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexWork {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    abstract_inverted_index: Option<BTreeMap<String, Vec<i64>>>,
    #[serde(default)]
    authorships: Vec<OpenAlexAuthorship>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthorship {
    #[serde(default)]
    author: Option<OpenAlexAuthor>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthor {
    #[serde(default)]
    display_name: Option<String>,
}

impl OpenAlexWork {
    /// A plain abstract if present, otherwise the inverted index
    /// reconstructed, otherwise `None`.
    fn resolve_abstract(&self) -> Option<String> {
        if let Some(text) = &self.abstract_text {
            if !text.is_empty() {
                return Some(text.clone());
            }
        }
        let index = self.abstract_inverted_index.as_ref()?;
        let text = abstract_from_inverted_index(index);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Rebuild abstract text from OpenAlex's `abstract_inverted_index`.
///
/// Negative positions and positions past [`MAX_ABSTRACT_POSITION`] are
/// ignored; unfilled positions are left as gaps, which the tokenizer later
/// collapses anyway.
fn abstract_from_inverted_index(index: &BTreeMap<String, Vec<i64>>) -> String {
    if index.is_empty() {
        return String::new();
    }
    let mut max_pos: usize = 0;
    for positions in index.values() {
        for &pos in positions {
            if pos >= 0 && (pos as usize) <= MAX_ABSTRACT_POSITION {
                max_pos = max_pos.max(pos as usize);
            }
        }
    }
    let mut words = vec![""; max_pos + 1];
    for (word, positions) in index {
        for &pos in positions {
            if pos >= 0 && (pos as usize) < words.len() {
                words[pos as usize] = word.as_str();
            }
        }
    }
    words.join(" ").trim().to_string()
}

/// Parse an OpenAlex works response.
///
/// The request already filters to one publication day, so works are
/// stamped with `target` rather than re-parsed. Untitled works are
/// dropped; the OpenAlex id doubles as the paper URL.
pub fn parse_openalex_response(body: &str, target: NaiveDate) -> Result<Vec<Paper>, SourceError> {
    let response: OpenAlexResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let mut papers = Vec::new();
    for work in response.results {
        let title = match &work.title {
            Some(t) if !t.is_empty() => t.clone(),
            _ => continue,
        };
        let abstract_text = work.resolve_abstract();
        let authors: Vec<String> = work
            .authorships
            .iter()
            .filter_map(|a| a.author.as_ref())
            .map(|author| author.display_name.clone().unwrap_or_default())
            .collect();
        papers.push(Paper {
            id: work.id.clone(),
            title,
            abstract_text,
            authors,
            url: work.id,
            published: target,
            source: SOURCE_NAME.to_string(),
        });
    }
    Ok(papers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
      "meta": {"count": 3},
      "results": [
        {
          "id": "https://openalex.org/W1",
          "title": "Inverted indexes in the wild",
          "abstract_inverted_index": {
            "Abstracts": [0],
            "arrive": [1],
            "scrambled.": [2]
          },
          "authorships": [
            {"author": {"display_name": "Barbara Liskov"}},
            {"author": {}},
            {"institution_only": true}
          ]
        },
        {
          "id": "https://openalex.org/W2",
          "title": null,
          "abstract_inverted_index": {"Dropped": [0]}
        },
        {
          "id": "https://openalex.org/W3",
          "title": "No abstract at all",
          "authorships": []
        }
      ]
    }"#;

    fn target() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 22).unwrap()
    }

    #[test]
    fn reconstructs_abstract_from_inverted_index() {
        let papers = parse_openalex_response(RESPONSE, target()).unwrap();
        assert_eq!(
            papers[0].abstract_text.as_deref(),
            Some("Abstracts arrive scrambled.")
        );
    }

    #[test]
    fn untitled_works_are_dropped() {
        let papers = parse_openalex_response(RESPONSE, target()).unwrap();
        assert_eq!(papers.len(), 2);
        assert!(papers.iter().all(|p| p.id != "https://openalex.org/W2"));
    }

    #[test]
    fn id_doubles_as_url_and_date_is_stamped() {
        let papers = parse_openalex_response(RESPONSE, target()).unwrap();
        assert_eq!(papers[0].url, "https://openalex.org/W1");
        assert!(papers.iter().all(|p| p.published == target()));
        assert!(papers.iter().all(|p| p.source == "openalex"));
    }

    #[test]
    fn authorship_without_author_is_skipped() {
        let papers = parse_openalex_response(RESPONSE, target()).unwrap();
        // The empty author object stays as an empty name, the
        // institution-only authorship is dropped.
        assert_eq!(papers[0].authors, vec!["Barbara Liskov".to_string(), String::new()]);
    }

    #[test]
    fn missing_abstract_stays_none() {
        let papers = parse_openalex_response(RESPONSE, target()).unwrap();
        assert!(papers[1].abstract_text.is_none());
    }

    #[test]
    fn inverted_index_with_gaps_and_stray_positions() {
        let mut index = BTreeMap::new();
        index.insert("end".to_string(), vec![3]);
        index.insert("start".to_string(), vec![0]);
        index.insert("stray".to_string(), vec![-2]);
        assert_eq!(abstract_from_inverted_index(&index), "start   end");
    }

    #[test]
    fn oversized_positions_are_ignored() {
        let mut index = BTreeMap::new();
        index.insert("kept".to_string(), vec![0]);
        index.insert("runaway".to_string(), vec![i64::MAX - 1]);
        assert_eq!(abstract_from_inverted_index(&index), "kept");
    }

    #[test]
    fn work_with_only_oversized_positions_keeps_title_drops_abstract() {
        let body = r#"{"results":[{
          "id": "https://openalex.org/W9",
          "title": "Runaway positions",
          "abstract_inverted_index": {"w": [9223372036854775806]}
        }]}"#;
        let papers = parse_openalex_response(body, target()).unwrap();
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].title, "Runaway positions");
        assert!(papers[0].abstract_text.is_none());
    }
}
