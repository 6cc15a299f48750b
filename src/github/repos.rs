// Repository metadata: owner listings, topics and README bodies.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::{debug, info};

use super::client::GithubClient;
use crate::models::RepoId;

/// One entry of `GET /users/{owner}/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoListing {
    pub name: String,
    pub owner: RepoOwner,
    pub description: Option<String>,
    /// Absent on some API versions and enterprise servers
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

impl RepoListing {
    pub fn id(&self) -> RepoId {
        RepoId::new(&self.owner.login, &self.name)
    }
}

#[derive(Deserialize)]
struct TopicsResponse {
    #[serde(default)]
    names: Vec<String>,
}

#[derive(Deserialize)]
struct ReadmeResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

/// List every repository owned by an account (all pages).
pub async fn list_owner_repos(client: &GithubClient, owner: &str) -> Result<Vec<RepoListing>> {
    let repos: Vec<RepoListing> = client
        .get_paginated(
            &format!("/users/{owner}/repos"),
            &[("per_page", "100"), ("type", "owner")],
        )
        .await
        .with_context(|| format!("Failed to list repositories for {owner}"))?;

    info!(owner = owner, repos = repos.len(), "Listed owner repositories");
    Ok(repos)
}

/// Fetch a repository's topic tags.
pub async fn fetch_topics(client: &GithubClient, id: &RepoId) -> Result<Vec<String>> {
    let resp: TopicsResponse = client
        .get_json(&format!("/repos/{}/{}/topics", id.owner, id.name), &[])
        .await
        .with_context(|| format!("Failed to fetch topics for {id}"))?;

    debug!(repo = %id, topics = resp.names.len(), "Fetched topics");
    Ok(resp.names)
}

/// Fetch and decode a repository's README. A repository without a README
/// yields an empty string.
pub async fn fetch_readme(client: &GithubClient, id: &RepoId) -> Result<String> {
    let resp: Option<ReadmeResponse> = client
        .get_json_optional(&format!("/repos/{}/{}/readme", id.owner, id.name), &[])
        .await
        .with_context(|| format!("Failed to fetch README for {id}"))?;

    let Some(resp) = resp else {
        debug!(repo = %id, "No README");
        return Ok(String::new());
    };

    if !resp.encoding.is_empty() && resp.encoding != "base64" {
        anyhow::bail!("Unsupported README encoding '{}' for {id}", resp.encoding);
    }

    let text = decode_readme_content(&resp.content)
        .with_context(|| format!("Failed to decode README for {id}"))?;
    debug!(repo = %id, chars = text.chars().count(), "Fetched README");
    Ok(text)
}

/// Decode the base64 `content` field of a README response.
///
/// GitHub wraps the base64 payload at 60 columns, so whitespace is removed
/// before decoding. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_readme_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .context("README content is not valid base64")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
