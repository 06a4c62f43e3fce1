//! Paper summarization.
//!
//! The digest ships with an extractive summarizer only. Anything smarter
//! (a hosted model, a local LLM) would implement [`Summarizer`] and be
//! handed to the pipeline in its place.

use crate::models::Paper;
use crate::rank::split_sentences;

/// Produces the short summary shown under each digest entry.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, paper: &Paper) -> String;
}

/// Extractive summarizer: the leading sentences of the abstract.
#[derive(Debug, Clone, Copy)]
pub struct LeadSummarizer {
    /// How many leading sentences to keep.
    pub sentences: usize,
}

impl Default for LeadSummarizer {
    fn default() -> Self {
        Self { sentences: 2 }
    }
}

impl Summarizer for LeadSummarizer {
    fn summarize(&self, paper: &Paper) -> String {
        let abstract_text = paper.abstract_text.as_deref().unwrap_or("").trim();
        let lead = split_sentences(abstract_text)
            .into_iter()
            .take(self.sentences)
            .collect::<Vec<_>>()
            .join(" ");
        let lead = lead.trim();
        if lead.is_empty() {
            "Summary not available.".to_string()
        } else {
            lead.to_string()
        }
    }
}
