//! Reduces a completed run into a [`BenchmarkSummary`].
//!
//! Aggregation is a pure function of the outcomes and the measured elapsed time: the same input
//! always yields the same summary.
use crate::constants::{MEDIAN, P95, P99, REPORT_DECIMALS, TIMESTAMP_DECIMALS};
use crate::data::{
    BenchmarkRun, BenchmarkSummary, LatencyDistribution, RequestOutcome, TimeseriesPoint,
};
use crate::error::DegenerateInputError;
use crate::round::round_half_away;
use std::time::Duration;

/// Nearest-rank percentile with ceiling over an ascending slice.
///
/// Picks index `ceil(len * p) - 1`, clamped to the slice bounds. Returns `None` for an empty
/// slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = (sorted.len() as f64 * p).ceil() as usize;
    let index = rank.saturating_sub(1).min(sorted.len() - 1);
    Some(sorted[index])
}

pub fn summarize(
    outcomes: &[RequestOutcome],
    total_elapsed: Duration,
    implementation: &str,
) -> Result<BenchmarkSummary, DegenerateInputError> {
    if outcomes.is_empty() {
        return Err(DegenerateInputError::NoOutcomes);
    }
    if total_elapsed.is_zero() {
        return Err(DegenerateInputError::ZeroElapsed);
    }

    let successful: Vec<&RequestOutcome> = outcomes.iter().filter(|o| o.success).collect();
    let total = outcomes.len();
    let elapsed_secs = total_elapsed.as_secs_f64();

    let mut latencies: Vec<f64> = successful.iter().map(|o| o.latency_ms).collect();
    latencies.sort_by(f64::total_cmp);

    let timeseries = successful
        .iter()
        .map(|o| TimeseriesPoint {
            timestamp: round_half_away(o.relative_timestamp, TIMESTAMP_DECIMALS),
            response_time_ms: round_half_away(o.latency_ms, REPORT_DECIMALS),
        })
        .collect();

    Ok(BenchmarkSummary {
        implementation: implementation.to_string(),
        total_requests: total,
        successful_requests: successful.len(),
        failed_requests: total - successful.len(),
        total_time_seconds: round_half_away(elapsed_secs, REPORT_DECIMALS),
        requests_per_second: round_half_away(total as f64 / elapsed_secs, REPORT_DECIMALS),
        latency: distribution(&latencies),
        timeseries,
    })
}

fn distribution(sorted: &[f64]) -> Option<LatencyDistribution> {
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    let average = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let at = |p| percentile(sorted, p).map(|v| round_half_away(v, REPORT_DECIMALS));

    Some(LatencyDistribution {
        min_ms: round_half_away(min, REPORT_DECIMALS),
        max_ms: round_half_away(max, REPORT_DECIMALS),
        average_ms: round_half_away(average, REPORT_DECIMALS),
        median_ms: at(MEDIAN)?,
        p95_ms: at(P95)?,
        p99_ms: at(P99)?,
    })
}

impl BenchmarkRun {
    pub fn summarize(&self, implementation: &str) -> Result<BenchmarkSummary, DegenerateInputError> {
        summarize(&self.outcomes, self.elapsed, implementation)
    }
}
