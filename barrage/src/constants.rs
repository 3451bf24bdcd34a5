use std::time::Duration;

/// Status code a response must carry to count as a success, unless overridden.
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// Per-request transport timeout, covering connect, send and body drain.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Idle connections kept per host by the pooled client.
pub const DEFAULT_POOL_SIZE: usize = 50;

/// Tag written into every summary to identify the implementation that produced it.
pub const DEFAULT_IMPLEMENTATION: &str = "rust";

pub const MEDIAN: f64 = 0.50;
pub const P95: f64 = 0.95;
pub const P99: f64 = 0.99;

/// Decimals kept for latencies, rates and elapsed seconds.
pub const REPORT_DECIMALS: u32 = 2;

/// Decimals kept for time-series timestamps.
pub const TIMESTAMP_DECIMALS: u32 = 3;
