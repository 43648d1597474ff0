//! GitHub API client
//!
//! Minimal read-only client for the rate limit, commit, issue, and contents endpoints.
//! The client never retries; callers decide what a failure means for their metric.

use crate::Result;
use crate::facts::RepoRef;
use chrono::{DateTime, Utc};
use core::pin::Pin;
use futures_util::stream::{self, Stream};
use ohno::{IntoAppError, bail};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;
use url::Url;

pub(crate) const LOG_TARGET: &str = "   hosting";

/// Base URL of the public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Number of commits requested per page; a shorter page marks the end of history
pub const COMMIT_PAGE_SIZE: usize = 100;

/// Number of issues requested in the single issue page
pub const ISSUE_PAGE_SIZE: usize = 100;

/// Current API quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub remaining: u64,
    pub limit: u64,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitStatus {
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

#[derive(Debug, Deserialize)]
struct RateLimitResponse {
    rate: RateLimitResource,
}

#[derive(Debug, Deserialize)]
struct RateLimitResource {
    limit: u64,
    remaining: u64,
    reset: i64,
}

/// Minimal commit info with only the fields needed to attribute authorship
#[derive(Debug, Deserialize)]
pub struct Commit {
    /// The GitHub account linked to the commit author, if any
    pub author: Option<Account>,
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct Account {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub author: Option<Signature>,
}

/// Author signature recorded in the git object itself
#[derive(Debug, Deserialize)]
pub struct Signature {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Commit {
    /// Identity the commit is attributed to: the GitHub login, else the git author name, else the email.
    #[must_use]
    pub fn author_identity(&self) -> Option<&str> {
        if let Some(account) = &self.author {
            return Some(account.login.as_str());
        }

        let signature = self.commit.author.as_ref()?;
        signature
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| signature.email.as_deref().filter(|email| !email.is_empty()))
    }
}

/// Minimal issue info
#[derive(Debug, Deserialize)]
pub struct Issue {
    pub state: IssueState,

    /// Present when the "issue" is really a pull request
    #[serde(default)]
    pub pull_request: Option<IgnoredAny>,
}

/// Issue state: open or closed
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Which issue states to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    Open,
    Closed,
    All,
}

impl StateFilter {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

/// Issue query parameters
#[derive(Debug, Clone, Copy)]
pub struct IssueFilter<'a> {
    pub label: &'a str,
    pub state: StateFilter,
}

/// One child of a directory in the repository tree
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,

    /// Symlinks and submodules
    #[serde(other)]
    Other,
}

/// Hosting API client
#[derive(Debug, Clone)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: Arc<str>,
}

impl Client {
    /// Create a new client authenticating with a bearer token against the given API base URL
    pub fn new(token: &str, base_url: impl Into<String>) -> Result<Self> {
        let mut auth_val = HeaderValue::from_str(&format!("Bearer {token}")).into_app_err("invalid characters in API token")?;
        auth_val.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth_val);
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = reqwest::Client::builder()
            .user_agent("repo-score")
            .default_headers(headers)
            .build()
            .into_app_err("could not create HTTP client")?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    /// Get the base URL for this client
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the current API quota.
    ///
    /// This endpoint does not count against the quota itself.
    pub async fn rate_limit(&self) -> Result<RateLimitStatus> {
        let url = format!("{}/rate_limit", self.base_url);
        let response: RateLimitResponse = self.get_json(&url).await?;
        let rate = response.rate;

        if rate.limit == 0 {
            bail!("hosting API reported a rate limit of zero");
        }

        let reset_at = DateTime::from_timestamp(rate.reset, 0).into_app_err_with(|| format!("invalid rate limit reset time {}", rate.reset))?;

        Ok(RateLimitStatus {
            remaining: rate.remaining,
            limit: rate.limit,
            reset_at,
        })
    }

    /// Lazily page through a repository's commit history, newest first.
    ///
    /// Each item is one page. The stream ends after a short page or after `max_pages` pages,
    /// whichever comes first, and yields at most one error.
    pub fn commit_pages<'a>(&'a self, repo: &'a RepoRef, max_pages: u32) -> Pin<Box<dyn Stream<Item = Result<Vec<Commit>>> + Send + 'a>> {
        Box::pin(stream::try_unfold(Some(1_u32), move |next_page| async move {
            let Some(page) = next_page else {
                return Ok(None);
            };

            let url = format!("{}?per_page={COMMIT_PAGE_SIZE}&page={page}", self.repo_url(repo, "/commits"));
            let commits: Vec<Commit> = self.get_json(&url).await?;

            let next_page = if commits.len() < COMMIT_PAGE_SIZE {
                None
            } else if page >= max_pages {
                log::debug!(target: LOG_TARGET, "Reached maximum commit page limit ({max_pages}) for '{repo}'");
                None
            } else {
                Some(page + 1)
            };

            Ok(Some((commits, next_page)))
        }))
    }

    /// Fetch a single page of issues matching the filter.
    ///
    /// Pull requests, which the issues endpoint also returns, are dropped. This is a bounded
    /// sample: callers must not assume it covers the full issue history.
    pub async fn issues(&self, repo: &RepoRef, filter: IssueFilter<'_>) -> Result<Vec<Issue>> {
        let mut url = Url::parse(&self.repo_url(repo, "/issues")).into_app_err("building issues URL")?;
        let _ = url
            .query_pairs_mut()
            .append_pair("labels", filter.label)
            .append_pair("state", filter.state.as_str())
            .append_pair("per_page", &ISSUE_PAGE_SIZE.to_string());

        let issues: Vec<Issue> = self.get_json(url.as_str()).await?;
        Ok(issues.into_iter().filter(|issue| issue.pull_request.is_none()).collect())
    }

    /// List the immediate children of `path`; an empty path lists the repository root.
    pub async fn tree_entries(&self, repo: &RepoRef, path: &str) -> Result<Vec<TreeEntry>> {
        let mut url = Url::parse(&self.repo_url(repo, "/contents")).into_app_err("building contents URL")?;

        // each segment is percent-encoded, so names holding '#' or '?' stay in the path
        let _ = url
            .path_segments_mut()
            .ok()
            .into_app_err("API base URL cannot carry a path")?
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        self.get_json(url.as_str()).await
    }

    /// Construct API URL for a repository with optional path suffix
    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!("{}/repos/{}/{}{suffix}", self.base_url, repo.owner(), repo.name())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = self.client.get(url).send().await.into_app_err_with(|| format!("requesting '{url}'"))?;
        let status = resp.status();

        if !status.is_success() {
            if matches!(status.as_u16(), 403 | 429)
                && let Some(rate_limit) = extract_rate_limit_from_headers(resp.headers())
                && rate_limit.remaining == 0
            {
                bail!("hosting API rate limit exhausted while requesting '{url}', resets at {}", rate_limit.reset_at);
            }

            bail!("request to '{url}' failed with status {status}");
        }

        resp.json().await.into_app_err_with(|| format!("decoding response from '{url}'"))
    }
}

/// Rate limit information carried by API response headers
#[derive(Debug, Clone, Copy)]
struct HeaderRateLimit {
    remaining: u64,
    reset_at: DateTime<Utc>,
}

fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<HeaderRateLimit> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<u64>().ok()?;
    let reset_timestamp = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;
    let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

    Some(HeaderRateLimit { remaining, reset_at })
}
