use super::metric::{LOG_TARGET, Metric, ensure_quota};
use crate::error::MetricError;
use crate::facts::RepoRef;
use crate::facts::hosting::{Client, IssueFilter, IssueState, StateFilter};

const BUG_LABEL: &str = "bug";

/// Approximates defect density from the share of bug reports still open
#[derive(Debug, Clone)]
pub struct Correctness {
    client: Client,
}

impl Correctness {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

/// `1 - open / total`, or 1 when there are no bug reports at all.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "issue counts are bounded by one page")]
pub fn correctness_score(open_bugs: usize, total_bugs: usize) -> f64 {
    if total_bugs == 0 {
        return 1.0;
    }

    1.0 - open_bugs as f64 / total_bugs as f64
}

impl Metric for Correctness {
    fn name(&self) -> &'static str {
        "correctness"
    }

    async fn score(&self, repo: &RepoRef) -> Result<f64, MetricError> {
        let _ = ensure_quota(&self.client).await?;

        let filter = IssueFilter {
            label: BUG_LABEL,
            state: StateFilter::All,
        };

        let issues = self.client.issues(repo, filter).await.map_err(MetricError::RemoteFetch)?;
        let open = issues.iter().filter(|issue| issue.state == IssueState::Open).count();

        log::debug!(target: LOG_TARGET, "'{repo}' has {open} open out of {} bug report(s)", issues.len());

        Ok(correctness_score(open, issues.len()))
    }
}
