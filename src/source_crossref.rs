//! Crossref source adapter.
//!
//! Queries the Crossref works API filtered to a single publication day.
//! Abstracts come back as JATS XML fragments and are passed through
//! untouched; the tokenizer ignores the markup when scoring.
//!
//! # Configuration
//!
//! ```toml
//! [sources.crossref]
//! enabled = true
//! rows = 50
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::CrossrefConfig;
use crate::models::Paper;
use crate::traits::{PaperSource, SourceError};

const CROSSREF_API_URL: &str = "https://api.crossref.org/works";

pub const SOURCE_NAME: &str = "crossref";

pub struct CrossrefSource {
    config: CrossrefConfig,
    client: reqwest::Client,
}

impl CrossrefSource {
    pub fn new(config: CrossrefConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl PaperSource for CrossrefSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn description(&self) -> &str {
        "Crossref works API (api.crossref.org)"
    }

    async fn fetch(&self, date: NaiveDate, query: &str) -> Result<Vec<Paper>, SourceError> {
        let base = self.config.base_url.as_deref().unwrap_or(CROSSREF_API_URL);
        let day = date.format("%Y-%m-%d").to_string();
        let body = self
            .client
            .get(base)
            .query(&[
                ("query", query.to_string()),
                ("rows", self.config.rows.to_string()),
                ("filter", format!("from-pub-date:{day},until-pub-date:{day}")),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_crossref_response(&body, date)
    }
}

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    #[serde(default)]
    message: CrossrefMessage,
}

#[derive(Debug, Deserialize, Default)]
struct CrossrefMessage {
    #[serde(default)]
    items: Vec<CrossrefWork>,
}

#[derive(Debug, Deserialize)]
struct CrossrefWork {
    #[serde(default, rename = "DOI")]
    doi: String,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default, rename = "URL")]
    url: String,
    #[serde(default, rename = "abstract")]
    abstract_text: Option<String>,
    #[serde(default)]
    author: Vec<CrossrefAuthor>,
    #[serde(default)]
    issued: CrossrefDate,
}

#[derive(Debug, Deserialize)]
struct CrossrefAuthor {
    #[serde(default)]
    given: Option<String>,
    #[serde(default)]
    family: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CrossrefDate {
    #[serde(default, rename = "date-parts")]
    date_parts: Vec<Vec<Option<i32>>>,
}

/// The issued date with missing month and day padded to 1. Works without
/// a usable year are dropped.
fn issued_date(issued: &CrossrefDate) -> Option<NaiveDate> {
    let parts = issued.date_parts.first()?;
    let year = (*parts.first()?)?;
    let month = parts.get(1).copied().flatten().unwrap_or(1);
    let day = parts.get(2).copied().flatten().unwrap_or(1);
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Parse a Crossref works response, keeping works issued on `target`.
pub fn parse_crossref_response(body: &str, target: NaiveDate) -> Result<Vec<Paper>, SourceError> {
    let response: CrossrefResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))?;

    let mut papers = Vec::new();
    for work in response.message.items {
        let published = match issued_date(&work.issued) {
            Some(d) => d,
            None => continue,
        };
        if published != target {
            continue;
        }
        let title = work
            .title
            .into_iter()
            .next()
            .unwrap_or_else(|| "Untitled".to_string());
        let authors: Vec<String> = work
            .author
            .iter()
            .map(|person| {
                format!(
                    "{} {}",
                    person.given.as_deref().unwrap_or("").trim(),
                    person.family.as_deref().unwrap_or("").trim()
                )
                .trim()
                .to_string()
            })
            .filter(|name| !name.is_empty())
            .collect();
        papers.push(Paper {
            id: work.doi,
            title,
            abstract_text: work.abstract_text,
            authors,
            url: work.url,
            published,
            source: SOURCE_NAME.to_string(),
        });
    }
    Ok(papers)
}
