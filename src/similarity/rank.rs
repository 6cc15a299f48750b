// Ranking: the single entry point of the similarity core.
//
// rank() takes the target, the candidate pool and a SimilarityConfig and
// returns an ordered list of scored candidates:
//   1. validate the configuration (nothing is scored on error)
//   2. drop the target itself, excluded repositories and duplicates
//   3. score each survivor (topic overlap, README TF-IDF, blended)
//   4. sort by score descending, identifier ascending on ties
//   5. truncate to the configured maximum
//
// The tie-break matters: the output is committed to a README, and an
// unstable order would produce a diff on every run.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::blend::blend;
use super::config::{ConfigError, MatchMode, SimilarityConfig};
use super::text::tokenize;
use super::tfidf::{TermVector, Vocabulary};
use super::topics::{shared_topics, topic_similarity};
use crate::models::{RepoDescriptor, RepoId};

/// A candidate repository with its similarity to the target.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub repo: RepoDescriptor,
    /// Blended score in [0, 1]
    pub score: f64,
    /// Topic overlap, when the method computed it
    pub topic_score: Option<f64>,
    /// README similarity, when the method computed it
    pub content_score: Option<f64>,
    /// Topics the candidate shares with the target, sorted
    pub shared_topics: Vec<String>,
    /// The repository this candidate was scored against
    #[serde(skip)]
    pub target: Arc<RepoDescriptor>,
}

impl ScoredCandidate {
    pub fn id(&self) -> &RepoId {
        &self.repo.id
    }

    pub fn description(&self) -> &str {
        &self.repo.description
    }
}

/// Rank the candidate pool against the target.
///
/// An empty pool (or one emptied by exclusions) is not an error and yields
/// an empty list. Candidates with missing topics or README text score lower
/// but are never dropped before truncation.
pub fn rank(
    target: &RepoDescriptor,
    pool: &[RepoDescriptor],
    config: &SimilarityConfig,
) -> Result<Vec<ScoredCandidate>, ConfigError> {
    config.validate()?;

    let candidates = surviving_candidates(target, pool, config);
    if candidates.is_empty() {
        debug!(
            target_repo = %target.id,
            pool = pool.len(),
            "No candidates left after exclusions"
        );
        return Ok(Vec::new());
    }

    // README vectors are only worth building when they can move a score
    let readmes = config
        .uses_content()
        .then(|| ReadmeVectors::build(target, &candidates));

    let target_arc = Arc::new(target.clone());
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let blended = blend(
                config,
                || topic_similarity(&target.topics, &candidate.topics),
                || readmes.as_ref().map_or(0.0, |r| r.similarity(i)),
            );
            ScoredCandidate {
                repo: (*candidate).clone(),
                score: blended.score,
                topic_score: blended.topic,
                content_score: blended.content,
                shared_topics: shared_topics(&target.topics, &candidate.topics),
                target: Arc::clone(&target_arc),
            }
        })
        .collect();

    scored.sort_by(compare_candidates);

    debug!(
        target_repo = %target.id,
        method = %config.method,
        candidates = scored.len(),
        top_score = scored.first().map_or(0.0, |c| c.score),
        "Ranked candidate pool"
    );

    scored.truncate(config.max_results);
    Ok(scored)
}

/// Ranking order: higher score first, then identifier ascending.
pub fn compare_candidates(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.repo.id.cmp(&b.repo.id))
}

/// Pool entries that are neither the target, excluded, nor a repeat of an
/// earlier entry. Keeps pool order.
fn surviving_candidates<'a>(
    target: &RepoDescriptor,
    pool: &'a [RepoDescriptor],
    config: &SimilarityConfig,
) -> Vec<&'a RepoDescriptor> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    pool.iter()
        .filter(|candidate| {
            if config.match_mode.same_repo(&candidate.id, &target.id) {
                return false;
            }
            if config.is_excluded(&candidate.id) {
                debug!(repo = %candidate.id, "Excluded by configuration");
                return false;
            }
            seen.insert(dedup_key(&candidate.id, config.match_mode))
        })
        .collect()
}

/// Identity used to spot repeated pool entries under the match mode.
fn dedup_key(id: &RepoId, mode: MatchMode) -> (String, String) {
    match mode {
        MatchMode::CaseInsensitive => (id.owner.to_lowercase(), id.name.to_lowercase()),
        MatchMode::Exact => (id.owner.clone(), id.name.clone()),
    }
}

/// TF-IDF vectors for the target and every candidate, fitted on one shared
/// vocabulary. The target vector is computed once and reused.
struct ReadmeVectors {
    target: TermVector,
    candidates: Vec<TermVector>,
}

impl ReadmeVectors {
    fn build(target: &RepoDescriptor, candidates: &[&RepoDescriptor]) -> Self {
        let target_tokens = tokenize(&target.readme);
        let candidate_tokens: Vec<Vec<String>> =
            candidates.iter().map(|c| tokenize(&c.readme)).collect();

        let mut corpus = Vec::with_capacity(candidate_tokens.len() + 1);
        corpus.push(target_tokens.clone());
        corpus.extend(candidate_tokens.iter().cloned());
        let vocabulary = Vocabulary::from_tokenized(&corpus);

        debug!(
            documents = vocabulary.documents(),
            terms = vocabulary.len(),
            "Built README vocabulary"
        );

        Self {
            target: vocabulary.vectorize_tokens(&target_tokens),
            candidates: candidate_tokens
                .iter()
                .map(|tokens| vocabulary.vectorize_tokens(tokens))
                .collect(),
        }
    }

    fn similarity(&self, candidate: usize) -> f64 {
        self.candidates
            .get(candidate)
            .map_or(0.0, |v| self.target.cosine(v))
    }
}
