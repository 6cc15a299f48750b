use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::github::client::{DEFAULT_API_URL, DEFAULT_REQUEST_DELAY};
use crate::models::RepoId;
use crate::output::markdown::DEFAULT_SECTION_HEADER;
use crate::pipeline::recommend::RecommendOptions;
use crate::similarity::{ConfigError, MatchMode, Method, SimilarityConfig};

/// Central configuration loaded from environment variables.
///
/// Inside a GitHub Actions run `GITHUB_REPOSITORY` and `GITHUB_TOKEN` are
/// provided by the runner; locally they come from `.env` via dotenvy.
/// CLI flags override individual fields after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target repository as `owner/name`
    pub repository: String,
    pub github_token: Option<String>,
    pub api_url: String,
    /// Raw method name, parsed by `similarity()`
    pub method: String,
    pub topic_weight: f64,
    pub max_results: usize,
    pub min_score: f64,
    pub exclude: Vec<String>,
    /// Raw match mode name, parsed by `similarity()`
    pub exclude_match: String,
    pub fallback: bool,
    pub include_forks: bool,
    pub include_archived: bool,
    pub readme_path: PathBuf,
    /// Heading line that marks the managed README section
    pub section_header: String,
    pub concurrency: usize,
    pub request_delay: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset and blank variables take their defaults. Numeric and boolean
    /// values that fail to parse are errors, not silent defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = SimilarityConfig::default();
        let pipeline = RecommendOptions::default();

        let request_delay = match get("REQUEST_DELAY_MS") {
            Some(ms) => Duration::from_millis(parse_number("REQUEST_DELAY_MS", &ms)?),
            None => DEFAULT_REQUEST_DELAY,
        };

        Ok(Self {
            repository: get("GITHUB_REPOSITORY").unwrap_or_default(),
            github_token: get("GITHUB_TOKEN"),
            api_url: get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            method: get("SIMILARITY_METHOD").unwrap_or_else(|| defaults.method.to_string()),
            topic_weight: get("TOPIC_WEIGHT")
                .map(|v| parse_number("TOPIC_WEIGHT", &v))
                .transpose()?
                .unwrap_or(defaults.topic_weight),
            max_results: get("MAX_RESULTS")
                .map(|v| parse_number("MAX_RESULTS", &v))
                .transpose()?
                .unwrap_or(defaults.max_results),
            min_score: get("MIN_SCORE")
                .map(|v| parse_number("MIN_SCORE", &v))
                .transpose()?
                .unwrap_or(pipeline.min_score),
            exclude: get("EXCLUDE_REPOS")
                .map(|v| parse_exclusions(&v))
                .unwrap_or_default(),
            exclude_match: get("EXCLUDE_MATCH").unwrap_or_default(),
            fallback: get("ADJACENT_FALLBACK")
                .map(|v| parse_bool("ADJACENT_FALLBACK", &v))
                .transpose()?
                .unwrap_or(pipeline.fallback),
            include_forks: get("INCLUDE_FORKS")
                .map(|v| parse_bool("INCLUDE_FORKS", &v))
                .transpose()?
                .unwrap_or(pipeline.include_forks),
            include_archived: get("INCLUDE_ARCHIVED")
                .map(|v| parse_bool("INCLUDE_ARCHIVED", &v))
                .transpose()?
                .unwrap_or(pipeline.include_archived),
            readme_path: get("README_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("README.md")),
            section_header: get("SECTION_HEADER")
                .unwrap_or_else(|| DEFAULT_SECTION_HEADER.to_string()),
            concurrency: get("FETCH_CONCURRENCY")
                .map(|v| parse_number("FETCH_CONCURRENCY", &v))
                .transpose()?
                .unwrap_or(pipeline.concurrency),
            request_delay,
        })
    }

    /// Parse the target repository.
    /// Call this before any operation that fetches metadata.
    pub fn require_repository(&self) -> Result<RepoId> {
        if self.repository.is_empty() {
            anyhow::bail!(
                "GITHUB_REPOSITORY not set. Pass --repo owner/name or add it to your .env file."
            );
        }
        RepoId::from_str(&self.repository).context("GITHUB_REPOSITORY is malformed")
    }

    /// Build and validate the similarity configuration.
    pub fn similarity(&self) -> Result<SimilarityConfig, ConfigError> {
        let config = SimilarityConfig {
            method: self.method.parse::<Method>()?,
            topic_weight: self.topic_weight,
            exclude: self.exclude.clone(),
            match_mode: self.exclude_match.parse::<MatchMode>()?,
            max_results: self.max_results,
            ..SimilarityConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn recommend_options(&self, show_progress: bool) -> RecommendOptions {
        RecommendOptions {
            fallback: self.fallback,
            min_score: self.min_score,
            include_forks: self.include_forks,
            include_archived: self.include_archived,
            concurrency: self.concurrency.max(1),
            show_progress,
        }
    }
}

/// Split a comma-separated exclusion list, dropping blank entries.
pub fn parse_exclusions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a boolean flag the way CI environments spell them.
pub fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be true or false, got '{other}'"),
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{key} is not a valid number: '{raw}'"))
}
