//! URL-based deduplication of fetched papers.

use std::collections::HashSet;

use crate::models::Paper;

/// Drop every paper whose URL was already seen, keeping first occurrences
/// in their original order.
///
/// The URL string is compared byte-for-byte; no normalization is applied,
/// so `http://` and `https://` variants of one page survive as two records.
/// The empty string is a key like any other, which means papers without a
/// URL all collapse into the first such paper.
pub fn dedupe_by_url(papers: Vec<Paper>) -> Vec<Paper> {
    let mut seen = HashSet::new();
    let mut unique = papers;
    unique.retain(|paper| seen.insert(paper.url.clone()));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn paper(title: &str, url: &str) -> Paper {
        Paper {
            id: title.to_lowercase(),
            title: title.into(),
            abstract_text: None,
            authors: vec![],
            url: url.into(),
            published: NaiveDate::from_ymd_opt(2026, 1, 22).unwrap(),
            source: "test".into(),
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let papers = vec![
            paper("From arxiv", "https://example.org/a"),
            paper("From crossref", "https://example.org/a"),
            paper("Other", "https://example.org/b"),
        ];
        let unique = dedupe_by_url(papers);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "From arxiv");
        assert_eq!(unique[1].title, "Other");
    }

    #[test]
    fn order_is_preserved() {
        let papers = vec![
            paper("C", "https://example.org/c"),
            paper("A", "https://example.org/a"),
            paper("B", "https://example.org/b"),
            paper("A2", "https://example.org/a"),
        ];
        let titles: Vec<_> = dedupe_by_url(papers).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn scheme_variants_are_distinct() {
        let papers = vec![
            paper("One", "http://example.org/p"),
            paper("Two", "https://example.org/p"),
        ];
        assert_eq!(dedupe_by_url(papers).len(), 2);
    }

    #[test]
    fn url_less_papers_share_one_key() {
        let papers = vec![
            paper("First no-url", ""),
            paper("Second no-url", ""),
            paper("Linked", "https://example.org/x"),
        ];
        let unique = dedupe_by_url(papers);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "First no-url");
    }

    #[test]
    fn idempotent() {
        let papers = vec![
            paper("A", "https://example.org/a"),
            paper("B", ""),
            paper("A2", "https://example.org/a"),
        ];
        let once = dedupe_by_url(papers);
        let twice = dedupe_by_url(once.clone());
        assert_eq!(once, twice);
    }
}
