//! Core data models used throughout paper-digest.
//!
//! These types represent the papers that flow through the aggregation and
//! ranking pipeline, from source adapters to the rendered digest.

use chrono::NaiveDate;
use serde::Serialize;

/// A paper as returned by a source adapter, before deduplication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paper {
    /// Source-assigned identifier (DOI, arXiv id, OpenAlex id, ...).
    pub id: String,
    pub title: String,
    /// Abstract body. `None` when the upstream record carries none.
    pub abstract_text: Option<String>,
    pub authors: Vec<String>,
    /// Landing-page URL. May be empty when the source has none; the
    /// deduplicator treats the empty string as a key like any other.
    pub url: String,
    pub published: NaiveDate,
    /// Label of the adapter that produced this record, e.g. `"arxiv"`.
    pub source: String,
}

impl Paper {
    /// Title and abstract joined into the text the scorer runs over.
    pub fn content(&self) -> String {
        match &self.abstract_text {
            Some(a) => format!("{} {}", self.title, a).trim().to_string(),
            None => self.title.trim().to_string(),
        }
    }
}

/// A paper paired with its relevance score and highlight sentence.
#[derive(Debug, Clone, Serialize)]
pub struct RankedPaper {
    pub paper: Paper,
    pub score: f64,
    /// One sentence chosen from the abstract (or the title as fallback).
    /// Never empty.
    pub highlight: String,
}
