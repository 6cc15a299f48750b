// Recommendation pipeline: fetch metadata -> rank -> threshold.
//
// 1. Fetch the target's topics and README
// 2. Fall back to whichever signal the target actually has
// 3. List the owner's repositories and drop forks, archived repos, the
//    target and excluded names before spending requests on them
// 4. Fetch each candidate's metadata (only the signals the method uses)
// 5. Rank with the similarity core and apply the minimum score

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::github::traits::{CandidateListing, MetadataSource, Signals};
use crate::models::{RepoDescriptor, RepoId};
use crate::similarity::{rank, Method, ScoredCandidate, SimilarityConfig};

/// Pipeline knobs that sit outside the similarity core.
#[derive(Debug, Clone)]
pub struct RecommendOptions {
    /// Switch method when the target lacks the signal the method needs
    pub fallback: bool,
    /// Drop ranked candidates scoring below this before rendering
    pub min_score: f64,
    pub include_forks: bool,
    pub include_archived: bool,
    /// Candidate metadata requests in flight at once
    pub concurrency: usize,
    pub show_progress: bool,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            fallback: true,
            min_score: 0.1,
            include_forks: false,
            include_archived: false,
            concurrency: 4,
            show_progress: false,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub target: RepoDescriptor,
    /// The configuration actually used, after any fallback
    pub config: SimilarityConfig,
    /// Candidates whose metadata was fetched and scored
    pub pool_size: usize,
    pub ranked: Vec<ScoredCandidate>,
}

/// Adjust the configuration to the signals the target actually has.
///
/// - `topics` without target topics falls back to `readme`
/// - `readme` without a target README falls back to `topics`
/// - `combined` puts all weight on whichever signal exists
///
/// Returns `None` when the target has neither topics nor a README.
pub fn resolve_fallback(
    target: &RepoDescriptor,
    config: &SimilarityConfig,
) -> Option<SimilarityConfig> {
    let has_topics = target.has_topics();
    let has_readme = target.has_readme();
    if !has_topics && !has_readme {
        return None;
    }

    let mut resolved = config.clone();
    match config.method {
        Method::Topics if !has_topics => resolved.method = Method::Readme,
        Method::Readme if !has_readme => resolved.method = Method::Topics,
        Method::Combined if !has_topics => resolved.topic_weight = 0.0,
        Method::Combined if !has_readme => resolved.topic_weight = 1.0,
        _ => {}
    }
    Some(resolved)
}

/// Keep only candidates scoring at least `min_score`.
///
/// The ranked list is sorted, so this trims a suffix and never reorders.
pub fn apply_min_score(ranked: Vec<ScoredCandidate>, min_score: f64) -> Vec<ScoredCandidate> {
    ranked.into_iter().filter(|c| c.score >= min_score).collect()
}

/// Run the full recommendation pipeline for one target repository.
pub async fn run(
    source: &dyn MetadataSource,
    target_id: &RepoId,
    config: &SimilarityConfig,
    options: &RecommendOptions,
) -> Result<Recommendation> {
    config.validate()?;

    let target = source
        .fetch_descriptor(&CandidateListing::new(target_id.clone()), Signals::ALL)
        .await;
    if !target.has_topics() {
        warn!(repo = %target_id, "Target repository has no topics");
    }
    if !target.has_readme() {
        warn!(repo = %target_id, "Target repository has no README content");
    }

    let effective = if options.fallback {
        match resolve_fallback(&target, config) {
            Some(resolved) => resolved,
            None => {
                warn!(
                    repo = %target_id,
                    "No viable similarity method: target has neither topics nor README"
                );
                return Ok(Recommendation {
                    target,
                    config: config.clone(),
                    pool_size: 0,
                    ranked: Vec::new(),
                });
            }
        }
    } else {
        config.clone()
    };

    if effective != *config {
        info!(
            requested = %config.method,
            method = %effective.method,
            topic_weight = effective.effective_weight(),
            "Falling back to the signal the target has"
        );
    }

    let listings = source
        .list_candidates(&target_id.owner)
        .await
        .with_context(|| format!("Failed to list candidate repositories for {}", target_id.owner))?;
    let listed = listings.len();

    let listings: Vec<CandidateListing> = listings
        .into_iter()
        .filter(|l| options.include_forks || !l.fork)
        .filter(|l| options.include_archived || !l.archived)
        .filter(|l| !effective.match_mode.same_repo(&l.id, target_id))
        .filter(|l| !effective.is_excluded(&l.id))
        .collect();

    info!(
        listed = listed,
        candidates = listings.len(),
        method = %effective.method,
        "Fetching candidate metadata"
    );

    let signals = Signals {
        topics: effective.uses_topics(),
        readme: effective.uses_content(),
    };
    let pool = fetch_pool(source, &listings, signals, options).await;

    let ranked = rank(&target, &pool, &effective)?;
    let ranked_count = ranked.len();
    let ranked = apply_min_score(ranked, options.min_score);

    info!(
        pool = pool.len(),
        ranked = ranked_count,
        kept = ranked.len(),
        min_score = options.min_score,
        "Ranking complete"
    );

    Ok(Recommendation {
        target,
        config: effective,
        pool_size: pool.len(),
        ranked,
    })
}

/// Fetch candidate descriptors with bounded concurrency, returned in
/// listing order regardless of completion order.
async fn fetch_pool(
    source: &dyn MetadataSource,
    listings: &[CandidateListing],
    signals: Signals,
    options: &RecommendOptions,
) -> Vec<RepoDescriptor> {
    let pb = if options.show_progress {
        ProgressBar::new(listings.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    if let Ok(style) = ProgressStyle::default_bar().template("  Fetching [{bar:30}] {pos}/{len} ({eta})") {
        pb.set_style(style);
    }

    let mut fetched: Vec<(usize, RepoDescriptor)> = stream::iter(
        listings.iter().enumerate().map(|(i, listing)| async move {
            (i, source.fetch_descriptor(listing, signals).await)
        }),
    )
    .buffer_unordered(options.concurrency.max(1))
    .inspect(|_| pb.inc(1))
    .collect()
    .await;

    pb.finish_and_clear();

    fetched.sort_by_key(|(i, _)| *i);
    fetched.into_iter().map(|(_, descriptor)| descriptor).collect()
}
