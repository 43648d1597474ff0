use super::common::round3;
use crate::Result;
use crate::metrics::NetScoreResult;
use core::fmt::Write;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Record<'a> {
    url: &'a str,
    net_score: f64,
    net_score_latency: f64,
    ramp_up_score: f64,
    ramp_up_latency: f64,
    correctness_score: f64,
    correctness_latency: f64,
    bus_factor_score: f64,
    bus_factor_latency: f64,
    license_score: f64,
    license_latency: f64,
}

impl<'a> From<&'a NetScoreResult> for Record<'a> {
    fn from(result: &'a NetScoreResult) -> Self {
        Self {
            url: &result.url,
            net_score: round3(result.net_score),
            net_score_latency: round3(result.latency.as_secs_f64()),
            ramp_up_score: round3(result.ramp_up.score),
            ramp_up_latency: round3(result.ramp_up.latency.as_secs_f64()),
            correctness_score: round3(result.correctness.score),
            correctness_latency: round3(result.correctness.latency.as_secs_f64()),
            bus_factor_score: round3(result.bus_factor.score),
            bus_factor_latency: round3(result.bus_factor.latency.as_secs_f64()),
            license_score: round3(result.license.score),
            license_latency: round3(result.license.latency.as_secs_f64()),
        }
    }
}

/// Write one repository as a single line of JSON.
pub fn generate<W: Write>(result: &NetScoreResult, writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", serde_json::to_string(&Record::from(result))?)?;
    Ok(())
}
