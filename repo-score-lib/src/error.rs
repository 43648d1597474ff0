//! Failure kinds for metric evaluation
//!
//! Every metric isolates its own failures: a [`MetricError`] never aborts a run, it
//! only turns the affected metric into an unavailable score.

use chrono::{DateTime, Utc};
use core::time::Duration;
use thiserror::Error;

/// Reasons a metric could not be computed
#[derive(Error, Debug)]
pub enum MetricError {
    /// The input does not look like `https://<host>/<owner>/<repo>`
    #[error("invalid repository URL '{url}': {reason}")]
    InvalidRepositoryUrl {
        /// The offending input
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The hosting API quota is used up, so the metric was skipped before issuing any calls
    #[error("hosting API rate limit exhausted, resets at {reset_at}")]
    RateLimitExhausted {
        /// When the quota is replenished
        reset_at: DateTime<Utc>,
    },

    /// A hosting API call failed (network, authentication, not found, malformed response)
    #[error("remote fetch failed: {0:#}")]
    RemoteFetch(ohno::AppError),

    /// Cloning the repository or reading the clone failed
    #[error("clone failed: {0:#}")]
    CloneFailure(ohno::AppError),

    /// The remote data exists but gives nothing to score
    #[error("{0}")]
    NoData(&'static str),

    /// The metric ran past its deadline
    #[error("evaluation timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl MetricError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRepositoryUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohno::app_err;

    #[test]
    fn test_invalid_url_display() {
        let err = MetricError::invalid_url("nope", "missing owner");
        assert_eq!(err.to_string(), "invalid repository URL 'nope': missing owner");
    }

    #[test]
    fn test_rate_limit_display_mentions_reset() {
        let reset_at = DateTime::from_timestamp(1_704_067_200, 0).unwrap();
        let err = MetricError::RateLimitExhausted { reset_at };
        assert!(err.to_string().contains("2024-01-01"));
    }

    #[test]
    fn test_remote_fetch_display_includes_cause() {
        let err = MetricError::RemoteFetch(app_err!("connection refused"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_timeout_display() {
        let err = MetricError::Timeout(Duration::from_secs(90));
        assert_eq!(err.to_string(), "evaluation timed out after 90s");
    }
}
