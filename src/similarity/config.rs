// Similarity configuration: method selection, topic weight, exclusions.
//
// Values arrive already parsed from the environment or CLI; this module
// only validates them. A SimilarityConfig is built once per run and passed
// explicitly into `rank`, so the scorers never read ambient state.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::models::RepoId;

/// Configuration problems that abort a run before any scoring happens.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Unknown similarity method '{0}' (expected topics, readme or combined)")]
    UnknownMethod(String),

    #[error("Unknown exclusion match mode '{0}' (expected case-insensitive or exact)")]
    UnknownMatchMode(String),

    #[error("Topic weight must be a finite number, got {0}")]
    WeightNotFinite(f64),

    #[error("Topic weight {0} is outside [0, 1] and clamping is disabled")]
    WeightOutOfRange(f64),

    #[error("Maximum result count must be at least 1")]
    ZeroMaxResults,
}

/// Which signals drive the similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Jaccard overlap of topic sets only
    Topics,
    /// TF-IDF cosine of README bodies only
    Readme,
    /// Weighted blend of both
    Combined,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Topics => "topics",
            Method::Readme => "readme",
            Method::Combined => "combined",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "topics" => Ok(Method::Topics),
            "readme" => Ok(Method::Readme),
            "combined" => Ok(Method::Combined),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

/// How exclusion entries and the target identifier are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// GitHub treats owner and repository names case-insensitively
    #[default]
    CaseInsensitive,
    Exact,
}

impl MatchMode {
    pub fn names_match(self, a: &str, b: &str) -> bool {
        match self {
            MatchMode::CaseInsensitive => a.eq_ignore_ascii_case(b),
            MatchMode::Exact => a == b,
        }
    }

    pub fn same_repo(self, a: &RepoId, b: &RepoId) -> bool {
        self.names_match(&a.owner, &b.owner) && self.names_match(&a.name, &b.name)
    }
}

impl FromStr for MatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "case-insensitive" | "insensitive" | "" => Ok(MatchMode::CaseInsensitive),
            "exact" | "case-sensitive" => Ok(MatchMode::Exact),
            _ => Err(ConfigError::UnknownMatchMode(s.to_string())),
        }
    }
}

/// Per-run similarity settings. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityConfig {
    pub method: Method,
    /// Share of the `combined` score taken from topic similarity
    pub topic_weight: f64,
    /// Clamp an out-of-range weight into [0, 1] instead of rejecting it
    pub clamp_weight: bool,
    /// Repository names or `owner/name` identifiers to leave out
    pub exclude: Vec<String>,
    pub match_mode: MatchMode,
    pub max_results: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            method: Method::Topics,
            topic_weight: 0.5,
            clamp_weight: true,
            exclude: Vec::new(),
            match_mode: MatchMode::CaseInsensitive,
            max_results: 5,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.topic_weight.is_finite() {
            return Err(ConfigError::WeightNotFinite(self.topic_weight));
        }
        if !self.clamp_weight && !(0.0..=1.0).contains(&self.topic_weight) {
            return Err(ConfigError::WeightOutOfRange(self.topic_weight));
        }
        if self.max_results == 0 {
            return Err(ConfigError::ZeroMaxResults);
        }
        Ok(())
    }

    /// The topic weight actually applied by the blender.
    pub fn effective_weight(&self) -> f64 {
        self.topic_weight.clamp(0.0, 1.0)
    }

    /// Whether any candidate's topic score can affect the result.
    pub fn uses_topics(&self) -> bool {
        match self.method {
            Method::Topics => true,
            Method::Readme => false,
            Method::Combined => self.effective_weight() > 0.0,
        }
    }

    /// Whether any candidate's README score can affect the result.
    pub fn uses_content(&self) -> bool {
        match self.method {
            Method::Topics => false,
            Method::Readme => true,
            Method::Combined => self.effective_weight() < 1.0,
        }
    }

    /// True when an exclusion entry names this repository, either by its
    /// bare name or by its full `owner/name` identifier.
    pub fn is_excluded(&self, id: &RepoId) -> bool {
        let full_name = id.full_name();
        self.exclude
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .any(|entry| {
                self.match_mode.names_match(entry, &id.name)
                    || self.match_mode.names_match(entry, &full_name)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!("topics".parse::<Method>(), Ok(Method::Topics));
        assert_eq!(" README ".parse::<Method>(), Ok(Method::Readme));
        assert_eq!("Combined".parse::<Method>(), Ok(Method::Combined));
        assert_eq!(
            "embeddings".parse::<Method>(),
            Err(ConfigError::UnknownMethod("embeddings".to_string()))
        );
    }

    #[test]
    fn test_weight_clamped_by_default() {
        let config = SimilarityConfig {
            topic_weight: 1.7,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_weight(), 1.0);

        let config = SimilarityConfig {
            topic_weight: -0.2,
            ..Default::default()
        };
        assert_eq!(config.effective_weight(), 0.0);
    }

    #[test]
    fn test_weight_rejected_when_clamping_disabled() {
        let config = SimilarityConfig {
            topic_weight: 1.7,
            clamp_weight: false,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WeightOutOfRange(1.7)));
    }

    #[test]
    fn test_nan_weight_always_rejected() {
        let config = SimilarityConfig {
            topic_weight: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WeightNotFinite(_))
        ));
    }

    #[test]
    fn test_zero_max_results_rejected() {
        let config = SimilarityConfig {
            max_results: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMaxResults));
    }

    #[test]
    fn test_signal_usage_per_method() {
        let mut config = SimilarityConfig::default();
        assert!(config.uses_topics() && !config.uses_content());

        config.method = Method::Readme;
        assert!(!config.uses_topics() && config.uses_content());

        config.method = Method::Combined;
        config.topic_weight = 0.5;
        assert!(config.uses_topics() && config.uses_content());

        config.topic_weight = 1.0;
        assert!(config.uses_topics() && !config.uses_content());

        config.topic_weight = 0.0;
        assert!(!config.uses_topics() && config.uses_content());
    }

    #[test]
    fn test_exclusion_matches_name_or_full_identifier() {
        let config = SimilarityConfig {
            exclude: vec!["Dotfiles".to_string(), " soodoku/notes ".to_string()],
            ..Default::default()
        };
        assert!(config.is_excluded(&RepoId::new("soodoku", "dotfiles")));
        assert!(config.is_excluded(&RepoId::new("soodoku", "Notes")));
        assert!(!config.is_excluded(&RepoId::new("soodoku", "bloomjoin")));
        // Full identifier must match the owner too
        assert!(!config.is_excluded(&RepoId::new("someone-else", "notes")));
    }

    #[test]
    fn test_exact_match_mode_is_case_sensitive() {
        let config = SimilarityConfig {
            exclude: vec!["Dotfiles".to_string()],
            match_mode: MatchMode::Exact,
            ..Default::default()
        };
        assert!(!config.is_excluded(&RepoId::new("soodoku", "dotfiles")));
        assert!(config.is_excluded(&RepoId::new("soodoku", "Dotfiles")));
    }

    #[test]
    fn test_blank_exclusion_entries_ignored() {
        let config = SimilarityConfig {
            exclude: vec!["".to_string(), "   ".to_string()],
            ..Default::default()
        };
        assert!(!config.is_excluded(&RepoId::new("o", "r")));
    }
}
