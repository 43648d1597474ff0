//! Metric evaluators and the net score aggregator
//!
//! Each metric implements [`Metric`] and owns all of its state, so the four of them
//! can run concurrently against the same repository. A metric that cannot be
//! computed reports [`UNAVAILABLE`] instead of failing the run. [`Scorer`] runs
//! every metric for a repository and folds the results into a [`NetScoreResult`].

mod bus_factor;
mod correctness;
mod license;
mod metric;
mod net_score;
mod ramp_up;
mod scorer;

pub use bus_factor::{BusFactor, CommitAuthorship};
pub use correctness::{Correctness, correctness_score};
pub use license::{ALLOWED_LICENSES, License, extract_license_text, is_allowed};
pub use metric::{Metric, MetricResult, UNAVAILABLE};
pub use net_score::{ComponentScores, NetScore, UnavailablePolicy, Weights};
pub use ramp_up::{Checklist, ChecklistTerm, DEFAULT_CHECKLIST, MatchScope, RampUp};
pub use scorer::{Limits, NetScoreResult, Scorer};
