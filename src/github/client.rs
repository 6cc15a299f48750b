// GitHub REST client: thin reqwest wrapper with a generic JSON GET helper.
//
// Every read the tool needs (repository listings, topics, README bodies) is
// a GET against api.github.com. A token is optional for public repositories
// but raises the rate limit from 60 to 5000 requests per hour, so the
// scheduled workflow always passes GITHUB_TOKEN.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, LINK};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Pause after every request. GitHub's secondary rate limits punish bursts
/// even when the hourly budget is fine.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    request_delay: Duration,
}

impl GithubClient {
    /// Create a client pointing at the given API base URL.
    ///
    /// Pass a different URL for GitHub Enterprise or for tests.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("adjacent/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
            request_delay: DEFAULT_REQUEST_DELAY,
        })
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    async fn send(&self, url: &str, params: &[(&str, &str)]) -> Result<reqwest::Response> {
        debug!(url = url, "GitHub GET request");

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .query(params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("GitHub request failed: {url}"))?;

        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        Ok(response)
    }

    /// GET an API path and deserialize the JSON response.
    ///
    /// `path` is relative to the base URL (e.g. "/repos/owner/name/topics").
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        self.get_json_optional(path, params)
            .await?
            .ok_or_else(|| anyhow::anyhow!("GitHub {path} returned 404 Not Found"))
    }

    /// Like `get_json`, but a 404 is `Ok(None)` instead of an error.
    ///
    /// Repositories without a README answer the readme endpoint with 404.
    pub async fn get_json_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.send(&url, params).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub {path} returned {status}: {body}");
        }

        let value = response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to deserialize GitHub {path} response"))?;
        Ok(Some(value))
    }

    /// GET a list endpoint, following `Link: rel="next"` pagination until
    /// the last page.
    pub async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut url = format!("{}{}", self.base_url, path);
        let mut page_params = params;
        let mut pages = 0;

        loop {
            let response = self.send(&url, page_params).await?;
            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("GitHub {path} returned {status}: {body}");
            }

            let next = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page_url);

            let page: Vec<T> = response
                .json()
                .await
                .with_context(|| format!("Failed to deserialize GitHub {path} page"))?;
            pages += 1;
            items.extend(page);

            match next {
                // The next URL already carries the query string
                Some(next_url) => {
                    url = next_url;
                    page_params = &[];
                }
                None => break,
            }
        }

        debug!(path = path, pages = pages, items = items.len(), "Fetched paginated list");
        Ok(items)
    }
}

/// Extract the `rel="next"` target from a GitHub `Link` header.
///
/// Header format: `<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`
pub fn next_page_url(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim() == "rel=\"next\"");
        if !is_next {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}
