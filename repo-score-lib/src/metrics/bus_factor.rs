use super::metric::{LOG_TARGET, Metric, ensure_quota};
use crate::error::MetricError;
use crate::facts::RepoRef;
use crate::facts::hosting::{Client, Commit};
use futures_util::TryStreamExt;
use std::collections::HashMap;

/// Number of commits attributed to each author, in first-encounter order
#[derive(Debug, Clone, Default)]
pub struct CommitAuthorship {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl CommitAuthorship {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `commits` more commits to `author`.
    pub fn add(&mut self, author: &str, commits: u64) {
        if let Some(&slot) = self.index.get(author) {
            self.counts[slot].1 += commits;
        } else {
            let _ = self.index.insert(author.to_string(), self.counts.len());
            self.counts.push((author.to_string(), commits));
        }
    }

    /// Attribute a page of commits; commits without any identity are skipped.
    pub fn add_commits(&mut self, commits: &[Commit]) {
        for commit in commits {
            if let Some(author) = commit.author_identity() {
                self.add(author, 1);
            }
        }
    }

    #[must_use]
    pub fn total_commits(&self) -> u64 {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    #[must_use]
    pub fn contributors(&self) -> usize {
        self.counts.len()
    }

    /// Authors by commit count, most active first; equal counts keep encounter order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self.counts.iter().map(|(author, count)| (author.as_str(), *count)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Bus factor score, or `None` when there are no commits.
    ///
    /// Takes the smallest group of top authors covering at least half of all commits and
    /// reports twice its share of the contributor base, capped at 1. A project where half
    /// of the contributors are needed to reach half of the commits scores a perfect 1.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "contributor counts are far below 2^52")]
    pub fn score(&self) -> Option<f64> {
        let total = self.total_commits();
        if total == 0 {
            return None;
        }

        let mut running = 0_u64;
        let mut key_authors = 0_usize;
        for (_, count) in self.ranked() {
            running += count;
            key_authors += 1;
            if running * 2 >= total {
                break;
            }
        }

        let raw = key_authors as f64 / self.contributors() as f64;
        Some((raw * 2.0).min(1.0))
    }
}

/// Measures how concentrated commit authorship is
#[derive(Debug, Clone)]
pub struct BusFactor {
    client: Client,
    max_pages: u32,
}

impl BusFactor {
    #[must_use]
    pub const fn new(client: Client, max_pages: u32) -> Self {
        Self { client, max_pages }
    }

    async fn authorship(&self, repo: &RepoRef) -> Result<CommitAuthorship, MetricError> {
        let mut authorship = CommitAuthorship::new();
        let mut pages = self.client.commit_pages(repo, self.max_pages);

        while let Some(page) = pages.try_next().await.map_err(MetricError::RemoteFetch)? {
            authorship.add_commits(&page);
        }

        Ok(authorship)
    }
}

impl Metric for BusFactor {
    fn name(&self) -> &'static str {
        "bus factor"
    }

    async fn score(&self, repo: &RepoRef) -> Result<f64, MetricError> {
        let _ = ensure_quota(&self.client).await?;

        let authorship = self.authorship(repo).await?;
        let score = authorship.score().ok_or(MetricError::NoData("repository has no commits"))?;

        log::debug!(
            target: LOG_TARGET,
            "'{repo}' has {} commit(s) from {} contributor(s), bus factor {score:.3}",
            authorship.total_commits(),
            authorship.contributors()
        );

        Ok(score)
    }
}
