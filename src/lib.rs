//! # paper-digest
//!
//! Aggregate, dedupe, and rank freshly published papers from public
//! scholarly APIs.
//!
//! paper-digest queries a set of source adapters (arXiv, Crossref,
//! OpenAlex, Semantic Scholar) for papers published on a given day,
//! collapses duplicates by URL, scores each paper against a free-text
//! query with a deterministic term-overlap formula, and renders the best
//! matches as a Markdown digest with highlights and short summaries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ┌─────────────────┐    ┌───────────┐
//! │   Sources    │───▶│    Pipeline     │───▶│  Digest   │
//! │ arXiv/CR/OA/ │    │ dedup + rank +  │    │ Markdown  │
//! │      S2      │    │ summarize       │    │ or JSON   │
//! └──────────────┘    └─────────────────┘    └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! pdg sources                                  # list configured sources
//! pdg digest --query "sparse attention"        # today's digest
//! pdg digest -q "sparse attention" -d 2026-01-22 --limit 5
//! pdg fetch arxiv -q "sparse attention"        # debug one source
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`tokenize`] | Query/content tokenization |
//! | [`dedup`] | URL deduplication |
//! | [`rank`] | Scoring, highlights, ranking |
//! | [`summarize`] | Extractive summaries |
//! | [`traits`] | Source trait and registry |
//! | [`source_arxiv`] | arXiv adapter |
//! | [`source_crossref`] | Crossref adapter |
//! | [`source_openalex`] | OpenAlex adapter |
//! | [`source_semantic_scholar`] | Semantic Scholar adapter |
//! | [`digest`] | Pipeline orchestration |
//! | [`format`] | Markdown rendering |
//! | [`sources`] | Source listing and single-source fetch |

pub mod config;
pub mod dedup;
pub mod digest;
pub mod format;
pub mod models;
pub mod rank;
pub mod source_arxiv;
pub mod source_crossref;
pub mod source_openalex;
pub mod source_semantic_scholar;
pub mod sources;
pub mod summarize;
pub mod tokenize;
pub mod traits;
