use super::bus_factor::BusFactor;
use super::correctness::Correctness;
use super::license::License;
use super::metric::{LOG_TARGET, Metric, MetricResult, UNAVAILABLE};
use super::net_score::{ComponentScores, NetScore};
use super::ramp_up::RampUp;
use crate::error::MetricError;
use crate::facts::RepoRef;
use crate::facts::hosting::Client;
use core::time::Duration;
use std::time::Instant;

/// Bounds on the work done for one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Commit pages fetched by the bus factor metric
    pub max_commit_pages: u32,

    /// How far below the root the ramp-up tree walk descends
    pub max_tree_depth: u32,

    /// Directories listed by the ramp-up tree walk
    pub max_tree_listings: u32,

    /// Deadline applied to each metric separately
    pub metric_timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_commit_pages: 10,
            max_tree_depth: 3,
            max_tree_listings: 50,
            metric_timeout: Duration::from_mins(2),
        }
    }
}

/// Every metric for one repository, plus the net score
#[derive(Debug, Clone, PartialEq)]
pub struct NetScoreResult {
    /// The input as given, trimmed
    pub url: String,
    pub bus_factor: MetricResult,
    pub correctness: MetricResult,
    pub ramp_up: MetricResult,
    pub license: MetricResult,
    pub net_score: f64,

    /// Wall-clock time to produce the whole result
    pub latency: Duration,
}

/// Runs all metrics against a repository and combines them
#[derive(Debug, Clone)]
pub struct Scorer {
    bus_factor: BusFactor,
    correctness: Correctness,
    ramp_up: RampUp,
    license: License,
    net_score: NetScore,
    timeout: Duration,
}

impl Scorer {
    #[must_use]
    pub fn new(client: &Client, net_score: NetScore, limits: Limits) -> Self {
        Self {
            bus_factor: BusFactor::new(client.clone(), limits.max_commit_pages),
            correctness: Correctness::new(client.clone()),
            ramp_up: RampUp::new(client.clone(), limits.max_tree_depth, limits.max_tree_listings),
            license: License::new(),
            net_score,
            timeout: limits.metric_timeout,
        }
    }

    /// Score one repository URL.
    ///
    /// Never fails: an unusable URL or a failing metric shows up as unavailable scores.
    pub async fn score_url(&self, url: &str) -> NetScoreResult {
        let start = Instant::now();
        let url = url.trim();

        let repo = match RepoRef::parse(url) {
            Ok(repo) => repo,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "{e}");
                let unavailable = MetricResult::unavailable(Duration::ZERO);
                return NetScoreResult {
                    url: url.to_string(),
                    bus_factor: unavailable,
                    correctness: unavailable,
                    ramp_up: unavailable,
                    license: unavailable,
                    net_score: UNAVAILABLE,
                    latency: start.elapsed(),
                };
            }
        };

        let (bus_factor, correctness, ramp_up, license) = tokio::join!(
            self.evaluate(&self.bus_factor, &repo),
            self.evaluate(&self.correctness, &repo),
            self.evaluate(&self.ramp_up, &repo),
            self.evaluate(&self.license, &repo),
        );

        let net_score = self.net_score.combine(&ComponentScores {
            bus_factor: bus_factor.score,
            correctness: correctness.score,
            ramp_up: ramp_up.score,
            license: license.score,
        });

        let latency = start.elapsed();
        log::info!(target: LOG_TARGET, "Scored '{repo}': net score {net_score:.3} in {:.3}s", latency.as_secs_f64());

        NetScoreResult {
            url: url.to_string(),
            bus_factor,
            correctness,
            ramp_up,
            license,
            net_score,
            latency,
        }
    }

    async fn evaluate(&self, metric: &impl Metric, repo: &RepoRef) -> MetricResult {
        let start = Instant::now();

        if let Ok(result) = tokio::time::timeout(self.timeout, metric.evaluate(repo)).await {
            result
        } else {
            let e = MetricError::Timeout(self.timeout);
            log::warn!(target: LOG_TARGET, "Could not compute {} for '{repo}': {e}", metric.name());
            MetricResult::unavailable(start.elapsed())
        }
    }
}
