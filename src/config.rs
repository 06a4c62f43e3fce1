use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Config path used when `--config` is not given. A missing file at this
/// path is not an error; built-in defaults apply instead.
pub const DEFAULT_CONFIG_PATH: &str = "pdg.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DigestConfig {
    /// Maximum number of papers in the rendered digest.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request timeout applied to every source call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    format!("paper-digest/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SourcesConfig {
    #[serde(default)]
    pub arxiv: ArxivConfig,
    #[serde(default)]
    pub crossref: CrossrefConfig,
    #[serde(default)]
    pub openalex: OpenAlexConfig,
    #[serde(default)]
    pub semantic_scholar: SemanticScholarConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArxivConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_page_size")]
    pub max_results: usize,
    /// Override the API endpoint, e.g. for a mirror.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_results: default_page_size(),
            base_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CrossrefConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_page_size")]
    pub rows: usize,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rows: default_page_size(),
            base_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OpenAlexConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_page_size")]
    pub per_page: usize,
    /// Contact address sent with requests, per the OpenAlex polite pool.
    #[serde(default)]
    pub mailto: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for OpenAlexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_page: default_page_size(),
            mailto: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SemanticScholarConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_page_size")]
    pub limit: usize,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for SemanticScholarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_page_size(),
            base_url: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}
fn default_page_size() -> usize {
    50
}

/// Parse and validate a TOML config document.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.digest.limit == 0 {
        anyhow::bail!("digest.limit must be >= 1");
    }

    if config.http.timeout_secs == 0 {
        anyhow::bail!("http.timeout_secs must be >= 1");
    }

    // Validate per-source page sizes
    if config.sources.arxiv.max_results == 0 {
        anyhow::bail!("sources.arxiv.max_results must be >= 1");
    }
    if config.sources.crossref.rows == 0 {
        anyhow::bail!("sources.crossref.rows must be >= 1");
    }
    if config.sources.openalex.per_page == 0 {
        anyhow::bail!("sources.openalex.per_page must be >= 1");
    }
    if config.sources.semantic_scholar.limit == 0 {
        anyhow::bail!("sources.semantic_scholar.limit must be >= 1");
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}

/// Load the config at `path`, or fall back to built-in defaults when the
/// default config file is simply absent. An explicit `--config` pointing
/// at a missing file is still an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else if path == Path::new(DEFAULT_CONFIG_PATH) {
        Ok(Config::default())
    } else {
        anyhow::bail!("Config file not found: {}", path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.digest.limit, 10);
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.sources.arxiv.enabled);
        assert_eq!(config.sources.openalex.per_page, 50);
        assert!(config.sources.openalex.mailto.is_none());
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = parse_config(
            r#"
[digest]
limit = 3

[sources.crossref]
enabled = false

[sources.openalex]
mailto = "team@example.org"
"#,
        )
        .unwrap();
        assert_eq!(config.digest.limit, 3);
        assert!(!config.sources.crossref.enabled);
        assert!(config.sources.arxiv.enabled);
        assert_eq!(config.sources.crossref.rows, 50);
        assert_eq!(config.sources.openalex.mailto.as_deref(), Some("team@example.org"));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = parse_config("[digest]\nlimit = 0\n").unwrap_err();
        assert!(err.to_string().contains("digest.limit"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = parse_config("[sources.arxiv]\nmax_results = 0\n").unwrap_err();
        assert!(err.to_string().contains("sources.arxiv.max_results"));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config("[digest\nlimit = 1").is_err());
    }

    #[test]
    fn default_matches_empty_parse() {
        let parsed = parse_config("").unwrap();
        let built = Config::default();
        assert_eq!(parsed.digest.limit, built.digest.limit);
        assert_eq!(parsed.http.user_agent, built.http.user_agent);
        assert_eq!(parsed.sources.semantic_scholar.limit, built.sources.semantic_scholar.limit);
    }
}
