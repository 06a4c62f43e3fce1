//! Relevance scoring, highlight extraction, and ranking.
//!
//! Scoring is deliberately simple: the overlap between distinct query terms
//! and the paper's term frequencies, normalized by the square root of the
//! content length. No model downloads, no network, fully deterministic.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Paper, RankedPaper};
use crate::tokenize::{tokenize, unique_tokens};

/// Scoring strategy used to order papers against a query.
///
/// Implementations must be pure: the same query and paper always produce
/// the same score, and scores must never be NaN.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &str, paper: &Paper) -> f64;
}

/// Default scorer: distinct-query-term frequency overlap with square-root
/// length normalization.
///
/// An empty query, or a paper with no content tokens, scores `0.0`.
/// Repeating a term in the query does not change the score.
#[derive(Debug, Default, Clone, Copy)]
pub struct TermOverlapScorer;

impl Scorer for TermOverlapScorer {
    fn score(&self, query: &str, paper: &Paper) -> f64 {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() {
            return 0.0;
        }
        let content = paper.content();
        let content_tokens = tokenize(&content);
        if content_tokens.is_empty() {
            return 0.0;
        }
        let mut content_tf: HashMap<&str, usize> = HashMap::new();
        for token in &content_tokens {
            *content_tf.entry(token.as_str()).or_insert(0) += 1;
        }
        let distinct_query: std::collections::HashSet<&str> =
            query_tokens.iter().map(String::as_str).collect();
        let overlap: usize = distinct_query
            .iter()
            .map(|token| content_tf.get(*token).copied().unwrap_or(0))
            .sum();
        overlap as f64 / (content_tokens.len() as f64).sqrt()
    }
}

/// Split text into sentences at whitespace that follows `.`, `!`, or `?`.
///
/// The punctuation stays attached to the left segment and the whitespace
/// run is dropped. Text with no such boundary comes back as one sentence.
/// Abbreviations are not special-cased, so "e.g. foo" splits after "e.g.".
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..idx]);
            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next_ch)) = chars.peek() {
                if !next_ch.is_whitespace() {
                    break;
                }
                end = next_idx + next_ch.len_utf8();
                chars.next();
            }
            start = end;
        }
        prev = Some(ch);
    }
    sentences.push(&text[start..]);
    sentences
}

/// Pick one sentence to show under a ranked paper.
///
/// The first sentence of the abstract sharing at least one token with the
/// query wins, trimmed. With no match the first sentence is used, and when
/// even that trims to nothing the title is returned verbatim, so the result
/// is never empty for a titled paper.
pub fn build_highlight(query: &str, paper: &Paper) -> String {
    let query_tokens = unique_tokens(query);
    let text = match paper.abstract_text.as_deref() {
        Some(a) if !a.is_empty() => a,
        _ => paper.title.as_str(),
    };
    let sentences = split_sentences(text);
    for sentence in &sentences {
        if tokenize(sentence).iter().any(|t| query_tokens.contains(t)) {
            return sentence.trim().to_string();
        }
    }
    match sentences.first().map(|s| s.trim()) {
        Some(first) if !first.is_empty() => first.to_string(),
        _ => paper.title.clone(),
    }
}

/// Score and highlight every paper, then keep the `limit` best.
///
/// The sort is stable and descending, so papers with equal scores keep
/// their input order. A limit of zero yields an empty list.
pub fn rank_papers(query: &str, papers: Vec<Paper>, limit: usize) -> Vec<RankedPaper> {
    rank_papers_with(&TermOverlapScorer, query, papers, limit)
}

/// [`rank_papers`] with a caller-chosen scoring strategy.
pub fn rank_papers_with(
    scorer: &dyn Scorer,
    query: &str,
    papers: Vec<Paper>,
    limit: usize,
) -> Vec<RankedPaper> {
    let mut ranked: Vec<RankedPaper> = papers
        .into_iter()
        .map(|paper| {
            let score = scorer.score(query, &paper);
            let highlight = build_highlight(query, &paper);
            RankedPaper {
                paper,
                score,
                highlight,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    ranked
}
