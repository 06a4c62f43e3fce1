//! arXiv source adapter.
//!
//! Queries the public arXiv Atom API, newest submissions first, and keeps
//! the entries published on the requested date. No credentials required.
//!
//! # Configuration
//!
//! ```toml
//! [sources.arxiv]
//! enabled = true
//! max_results = 50
//! ```

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::ArxivConfig;
use crate::models::Paper;
use crate::traits::{PaperSource, SourceError};

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

pub const SOURCE_NAME: &str = "arxiv";

pub struct ArxivSource {
    config: ArxivConfig,
    client: reqwest::Client,
}

impl ArxivSource {
    pub fn new(config: ArxivConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl PaperSource for ArxivSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn description(&self) -> &str {
        "arXiv Atom search API (export.arxiv.org)"
    }

    async fn fetch(&self, date: NaiveDate, query: &str) -> Result<Vec<Paper>, SourceError> {
        let base = self.config.base_url.as_deref().unwrap_or(ARXIV_API_URL);
        let body = self
            .client
            .get(base)
            .query(&[
                ("search_query", format!("all:{query}")),
                ("sortBy", "submittedDate".to_string()),
                ("sortOrder", "descending".to_string()),
                ("max_results", self.config.max_results.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_arxiv_feed(&body, date)
    }
}

#[derive(Default)]
struct EntryDraft {
    id: String,
    title: String,
    summary: String,
    published: String,
    url: String,
    have_alternate: bool,
    authors: Vec<String>,
}

impl EntryDraft {
    /// Convert to a [`Paper`] if the entry was published on `target`.
    /// Entries with unparseable dates are dropped.
    fn into_paper(self, target: NaiveDate) -> Option<Paper> {
        let day = self.published.get(..10)?;
        let published = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
        if published != target {
            return None;
        }
        let summary = normalize_ws(&self.summary);
        let url = if self.url.is_empty() {
            self.id.clone()
        } else {
            self.url
        };
        Some(Paper {
            id: self.id,
            title: normalize_ws(&self.title),
            abstract_text: if summary.is_empty() {
                None
            } else {
                Some(summary)
            },
            authors: self.authors,
            url,
            published,
            source: SOURCE_NAME.to_string(),
        })
    }
}

#[derive(Clone, Copy, PartialEq)]
enum EntryField {
    Id,
    Title,
    Summary,
    Published,
    AuthorName,
}

/// Parse an arXiv Atom feed, keeping entries published on `target`.
///
/// The entry `<link rel="alternate">` href becomes the paper URL, with the
/// first link as fallback. Feed-level elements outside `<entry>` are
/// ignored.
pub fn parse_arxiv_feed(xml: &str, target: NaiveDate) -> Result<Vec<Paper>, SourceError> {
    let mut papers = Vec::new();
    let mut reader = quick_xml::Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut in_entry = false;
    let mut in_author = false;
    let mut current: Option<EntryField> = None;
    let mut draft = EntryDraft::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => match e.local_name().as_ref() {
                b"entry" => {
                    in_entry = true;
                    draft = EntryDraft::default();
                }
                b"author" if in_entry => in_author = true,
                b"id" if in_entry => current = Some(EntryField::Id),
                b"title" if in_entry => current = Some(EntryField::Title),
                b"summary" if in_entry => current = Some(EntryField::Summary),
                b"published" if in_entry => current = Some(EntryField::Published),
                b"name" if in_author => current = Some(EntryField::AuthorName),
                b"link" if in_entry => {
                    record_link(&e, &mut draft);
                    current = None;
                }
                _ => current = None,
            },
            Ok(quick_xml::events::Event::Empty(e)) => {
                if in_entry && e.local_name().as_ref() == b"link" {
                    record_link(&e, &mut draft);
                }
            }
            Ok(quick_xml::events::Event::Text(te)) if in_entry => {
                let text = te.unescape().unwrap_or_default();
                match current {
                    Some(EntryField::Id) => draft.id.push_str(&text),
                    Some(EntryField::Title) => draft.title.push_str(&text),
                    Some(EntryField::Summary) => draft.summary.push_str(&text),
                    Some(EntryField::Published) => draft.published.push_str(&text),
                    Some(EntryField::AuthorName) => draft.authors.push(text.into_owned()),
                    None => {}
                }
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"entry" => {
                    in_entry = false;
                    if let Some(paper) = std::mem::take(&mut draft).into_paper(target) {
                        papers.push(paper);
                    }
                }
                b"author" => in_author = false,
                _ => current = None,
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(SourceError::Parse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(papers)
}

fn record_link(e: &quick_xml::events::BytesStart<'_>, draft: &mut EntryDraft) {
    let mut href = String::new();
    let mut rel = String::new();
    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"href" => href = attr.unescape_value().unwrap_or_default().into_owned(),
            b"rel" => rel = attr.unescape_value().unwrap_or_default().into_owned(),
            _ => {}
        }
    }
    if href.is_empty() {
        return;
    }
    if rel == "alternate" && !draft.have_alternate {
        draft.url = href;
        draft.have_alternate = true;
    } else if draft.url.is_empty() {
        draft.url = href;
    }
}

/// Collapse whitespace runs to single spaces. Atom folds long titles and
/// summaries across indented continuation lines.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
