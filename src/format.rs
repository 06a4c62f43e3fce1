//! Digest rendering.
//!
//! Turns a [`DigestReport`] into the Markdown document printed by
//! `pdg digest`. Transport-specific escaping (chat messengers, HTML)
//! is a caller concern.

use crate::digest::DigestReport;

/// Render a digest report as Markdown.
pub fn format_digest(report: &DigestReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Papers digest for {}\n\n", report.date));
    out.push_str(&format!("Query: {}\n\n", report.query));

    if report.entries.is_empty() {
        out.push_str("No papers matched today.\n");
        push_sources(&mut out, report);
        return out;
    }

    out.push_str("## Top papers\n\n");
    for (idx, entry) in report.entries.iter().enumerate() {
        let authors = if entry.paper.authors.is_empty() {
            "Unknown authors".to_string()
        } else {
            entry.paper.authors.join(", ")
        };
        out.push_str(&format!("{}. **{}**\n", idx + 1, entry.paper.title));
        out.push_str(&format!(
            "   Source: {} | Score: {:.2}\n",
            entry.paper.source, entry.score
        ));
        out.push_str(&format!("   Authors: {}\n", authors));
        if !entry.paper.url.is_empty() {
            out.push_str(&format!("   Link: {}\n", entry.paper.url));
        }
        out.push_str(&format!("   Highlight: {}\n", entry.highlight));
        out.push_str(&format!("   Summary: {}\n\n", entry.summary));
    }

    out.push_str("## Recommendations\n\n");
    out.push_str("- Check novelty vs. prior art for the top 2 papers.\n");
    out.push_str("- Pay attention to evaluation datasets and ablation results.\n");
    if !report.themes.is_empty() {
        out.push_str(&format!("- Watch for themes: {}.\n", report.themes.join(", ")));
    }

    push_sources(&mut out, report);
    out
}

fn push_sources(out: &mut String, report: &DigestReport) {
    if report.sources.is_empty() {
        return;
    }
    out.push_str("\n## Sources\n\n");
    for source in &report.sources {
        match &source.error {
            Some(err) => out.push_str(&format!("- {}: failed ({})\n", source.name, err)),
            None => out.push_str(&format!(
                "- {}: {} paper{}\n",
                source.name,
                source.fetched,
                if source.fetched == 1 { "" } else { "s" }
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{DigestEntry, SourceReport};
    use crate::models::Paper;
    use chrono::NaiveDate;

    fn entry(title: &str, url: &str, score: f64) -> DigestEntry {
        DigestEntry {
            paper: Paper {
                id: title.to_lowercase(),
                title: title.into(),
                abstract_text: Some("An abstract.".into()),
                authors: vec!["Ada Lovelace".into()],
                url: url.into(),
                published: NaiveDate::from_ymd_opt(2026, 1, 22).unwrap(),
                source: "arxiv".into(),
            },
            score,
            highlight: "An abstract.".into(),
            summary: "An abstract.".into(),
        }
    }

    fn report(entries: Vec<DigestEntry>) -> DigestReport {
        DigestReport {
            query: "sparse attention".into(),
            date: NaiveDate::from_ymd_opt(2026, 1, 22).unwrap(),
            entries,
            themes: vec!["pruning".into(), "sparsity".into()],
            sources: vec![
                SourceReport {
                    name: "arxiv".into(),
                    fetched: 1,
                    error: None,
                },
                SourceReport {
                    name: "crossref".into(),
                    fetched: 0,
                    error: Some("api error: status 503".into()),
                },
            ],
            candidates_fetched: 1,
            unique_candidates: 1,
            elapsed_ms: 12,
        }
    }

    #[test]
    fn renders_header_query_and_numbered_entries() {
        let text = format_digest(&report(vec![
            entry("First", "https://example.org/1", 1.5),
            entry("Second", "https://example.org/2", 0.5),
        ]));
        assert!(text.starts_with("# Papers digest for 2026-01-22\n"));
        assert!(text.contains("Query: sparse attention\n"));
        let first = text.find("1. **First**").unwrap();
        let second = text.find("2. **Second**").unwrap();
        assert!(first < second);
        assert!(text.contains("   Source: arxiv | Score: 1.50\n"));
        assert!(text.contains("   Authors: Ada Lovelace\n"));
    }

    #[test]
    fn empty_digest_has_placeholder_and_sources() {
        let text = format_digest(&report(vec![]));
        assert!(text.contains("No papers matched today.\n"));
        assert!(!text.contains("## Top papers"));
        assert!(!text.contains("## Recommendations"));
        assert!(text.contains("## Sources"));
    }

    #[test]
    fn link_line_is_omitted_for_empty_urls() {
        let text = format_digest(&report(vec![entry("Linkless", "", 1.0)]));
        assert!(!text.contains("   Link:"));
    }

    #[test]
    fn recommendations_include_theme_bullet_when_themes_exist() {
        let text = format_digest(&report(vec![entry("One", "https://example.org/1", 1.0)]));
        assert!(text.contains("- Check novelty vs. prior art for the top 2 papers.\n"));
        assert!(text.contains("- Watch for themes: pruning, sparsity.\n"));

        let mut without = report(vec![entry("One", "https://example.org/1", 1.0)]);
        without.themes.clear();
        assert!(!format_digest(&without).contains("Watch for themes"));
    }

    #[test]
    fn source_footer_shows_counts_and_failures() {
        let text = format_digest(&report(vec![entry("One", "https://example.org/1", 1.0)]));
        assert!(text.contains("- arxiv: 1 paper\n"));
        assert!(text.contains("- crossref: failed (api error: status 503)\n"));
    }

    #[test]
    fn unknown_authors_fallback() {
        let mut e = entry("Anon", "https://example.org/a", 1.0);
        e.paper.authors.clear();
        let text = format_digest(&report(vec![e]));
        assert!(text.contains("   Authors: Unknown authors\n"));
    }
}
