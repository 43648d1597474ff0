use crate::error::MetricError;
use crate::facts::RepoRef;
use crate::facts::hosting::{Client, RateLimitStatus};
use core::time::Duration;
use std::time::Instant;

pub(super) const LOG_TARGET: &str = "   metrics";

/// Score reported when a metric could not be computed
pub const UNAVAILABLE: f64 = -1.0;

/// Outcome of evaluating one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    /// In `[0, 1]`, or [`UNAVAILABLE`]
    pub score: f64,

    /// Wall-clock time spent in [`Metric::evaluate`]
    pub latency: Duration,
}

impl MetricResult {
    #[must_use]
    pub const fn unavailable(latency: Duration) -> Self {
        Self {
            score: UNAVAILABLE,
            latency,
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.score >= 0.0
    }
}

/// A scoring algorithm over a single repository
pub trait Metric: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Compute the score in `[0, 1]`, or the reason it cannot be computed.
    fn score(&self, repo: &RepoRef) -> impl Future<Output = Result<f64, MetricError>> + Send;

    /// Compute the score and time it, folding any failure into [`UNAVAILABLE`].
    fn evaluate(&self, repo: &RepoRef) -> impl Future<Output = MetricResult> + Send {
        async move {
            let start = Instant::now();

            let score = match self.score(repo).await {
                Ok(score) => score.clamp(0.0, 1.0),
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Could not compute {} for '{repo}': {e}", self.name());
                    UNAVAILABLE
                }
            };

            MetricResult {
                score,
                latency: start.elapsed(),
            }
        }
    }
}

/// Read the quota fresh and refuse to start remote work when it is used up.
pub(super) async fn ensure_quota(client: &Client) -> Result<RateLimitStatus, MetricError> {
    let status = client.rate_limit().await.map_err(MetricError::RemoteFetch)?;

    if status.is_exhausted() {
        return Err(MetricError::RateLimitExhausted { reset_at: status.reset_at });
    }

    log::trace!(target: LOG_TARGET, "Rate limit: {}/{} remaining", status.remaining, status.limit);
    Ok(status)
}
