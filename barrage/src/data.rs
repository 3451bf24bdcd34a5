use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// The resolved result of one dispatched request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestOutcome {
    pub id: usize,
    pub success: bool,
    /// Issue to completion, in milliseconds.
    #[serde(rename = "response_time_ms")]
    pub latency_ms: f64,
    /// Run start to completion, in seconds.
    #[serde(rename = "timestamp")]
    pub relative_timestamp: f64,
    /// Set only when the request failed at the transport level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestOutcome {
    pub(crate) fn new(
        id: usize,
        latency: Duration,
        relative_timestamp: Duration,
        result: Result<bool, String>,
    ) -> Self {
        let (success, error) = match result {
            Ok(status_matched) => (status_matched, None),
            Err(err) => (false, Some(err)),
        };

        Self {
            id,
            success,
            latency_ms: latency.as_secs_f64() * 1000.,
            relative_timestamp: relative_timestamp.as_secs_f64(),
            error,
        }
    }
}

/// Every outcome of one run, in collection order, plus the wall-clock time the run took.
#[derive(Debug, Clone)]
pub struct BenchmarkRun {
    pub outcomes: Vec<RequestOutcome>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyDistribution {
    pub min_ms: f64,
    pub max_ms: f64,
    pub average_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeseriesPoint {
    pub timestamp: f64,
    pub response_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkSummary {
    #[serde(rename = "language")]
    pub implementation: String,
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_time_seconds: f64,
    pub requests_per_second: f64,
    /// Absent when no request succeeded.
    #[serde(rename = "response_times", skip_serializing_if = "Option::is_none")]
    pub latency: Option<LatencyDistribution>,
    pub timeseries: Vec<TimeseriesPoint>,
}

impl fmt::Display for BenchmarkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Requests={}/{} (failed {}), Time={:.2}s, RPS={:.2}",
            self.successful_requests,
            self.total_requests,
            self.failed_requests,
            self.total_time_seconds,
            self.requests_per_second,
        )?;

        if let Some(latency) = &self.latency {
            write!(
                f,
                ", p50={:.2}ms, p95={:.2}ms, p99={:.2}ms",
                latency.median_ms, latency.p95_ms, latency.p99_ms,
            )?;
        }
        Ok(())
    }
}
