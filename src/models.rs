// Data models: repository identifiers and descriptors.
//
// These are the types that flow from the fetcher through the similarity
// core and into the renderer. Missing metadata is always an empty value
// (no topics, empty README) rather than an Option, so a repository whose
// README failed to download is scored like one that never had a README.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A repository identifier: the owning account plus the repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid repository identifier '{0}' (expected owner/name)")]
pub struct ParseRepoIdError(pub String);

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The `owner/name` form used by GitHub and in exclusion lists.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn html_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = ParseRepoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(ParseRepoIdError(s.to_string())),
        }
    }
}

// Ordered exactly like the `owner/name` strings, so ranking ties break the
// same way the rendered identifiers sort.
impl Ord for RepoId {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.owner.bytes().chain(std::iter::once(b'/')).chain(self.name.bytes());
        let b = other.owner.bytes().chain(std::iter::once(b'/')).chain(other.name.bytes());
        // An owner containing '/' can make two distinct ids spell the same
        // string; fall back to the fields so Ord agrees with Eq
        a.cmp(b)
            .then_with(|| (&self.owner, &self.name).cmp(&(&other.owner, &other.name)))
    }
}

impl PartialOrd for RepoId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Everything the similarity core knows about one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoDescriptor {
    pub id: RepoId,
    /// Display text for the rendered entry, passed through unmodified
    pub description: String,
    pub topics: BTreeSet<String>,
    /// Raw README body (markdown). Empty when absent or unfetchable.
    /// Left out of serialized output.
    #[serde(default, skip_serializing)]
    pub readme: String,
}

impl RepoDescriptor {
    /// A descriptor with no description, no topics and no README.
    pub fn new(id: RepoId) -> Self {
        Self {
            id,
            description: String::new(),
            topics: BTreeSet::new(),
            readme: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = readme.into();
        self
    }

    pub fn has_topics(&self) -> bool {
        !self.topics.is_empty()
    }

    pub fn has_readme(&self) -> bool {
        !self.readme.trim().is_empty()
    }
}
