// Metadata source trait: the seam between the fetcher and the pipeline.
//
// The pipeline only needs three reads: list an owner's repositories, get a
// repository's topics, get its README. GithubClient implements them over
// the REST API; tests plug in an in-memory source.

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use super::client::GithubClient;
use super::repos;
use crate::models::{RepoDescriptor, RepoId};

/// A candidate repository as it appears in an owner listing.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateListing {
    pub id: RepoId,
    pub description: String,
    /// Topics returned with the listing; `None` when it didn't carry them
    pub topics: Option<Vec<String>>,
    pub fork: bool,
    pub archived: bool,
}

impl CandidateListing {
    pub fn new(id: RepoId) -> Self {
        Self {
            id,
            description: String::new(),
            topics: None,
            fork: false,
            archived: false,
        }
    }
}

/// Which metadata to download for a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    pub topics: bool,
    pub readme: bool,
}

impl Signals {
    pub const ALL: Signals = Signals {
        topics: true,
        readme: true,
    };
}

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Repositories owned by `owner`, in listing order.
    async fn list_candidates(&self, owner: &str) -> Result<Vec<CandidateListing>>;

    async fn fetch_topics(&self, id: &RepoId) -> Result<Vec<String>>;

    /// README body, or an empty string when the repository has none.
    async fn fetch_readme(&self, id: &RepoId) -> Result<String>;

    /// Build a descriptor, fetching only the requested signals. Topics
    /// already present on the listing are used without another request.
    ///
    /// Never fails: a topic or README fetch error is logged and replaced
    /// by an empty value so one broken repository can't abort the run.
    async fn fetch_descriptor(
        &self,
        listing: &CandidateListing,
        signals: Signals,
    ) -> RepoDescriptor {
        let mut descriptor =
            RepoDescriptor::new(listing.id.clone()).with_description(listing.description.clone());

        if signals.topics {
            if let Some(topics) = &listing.topics {
                descriptor = descriptor.with_topics(topics.iter().cloned());
            } else {
                match self.fetch_topics(&listing.id).await {
                    Ok(topics) => descriptor = descriptor.with_topics(topics),
                    Err(e) => {
                        warn!(repo = %listing.id, error = %e, "Topic fetch failed, using no topics")
                    }
                }
            }
        }

        if signals.readme {
            match self.fetch_readme(&listing.id).await {
                Ok(readme) => descriptor = descriptor.with_readme(readme),
                Err(e) => {
                    warn!(repo = %listing.id, error = %e, "README fetch failed, using empty text")
                }
            }
        }

        descriptor
    }
}

#[async_trait]
impl MetadataSource for GithubClient {
    async fn list_candidates(&self, owner: &str) -> Result<Vec<CandidateListing>> {
        let listings = repos::list_owner_repos(self, owner).await?;
        Ok(listings
            .into_iter()
            .map(|r| CandidateListing {
                id: r.id(),
                description: r.description.unwrap_or_default(),
                topics: r.topics,
                fork: r.fork,
                archived: r.archived,
            })
            .collect())
    }

    async fn fetch_topics(&self, id: &RepoId) -> Result<Vec<String>> {
        repos::fetch_topics(self, id).await
    }

    async fn fetch_readme(&self, id: &RepoId) -> Result<String> {
        repos::fetch_readme(self, id).await
    }
}
