use crate::config::BenchConfig;
use crate::data::{BenchmarkRun, BenchmarkSummary, RequestOutcome};
use crate::error::BenchError;
use crate::metrics::{record as record_metrics, OUTCOME_LABELS};
use humantime::format_duration;
use reqwest::{Client, StatusCode};
use std::error::Error as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, instrument, trace, Instrument};
use url::Url;

/// Fires a fixed number of concurrent GET requests at one target and collects an outcome for
/// each.
///
/// The pooled [`Client`] and the per-host connection permits are the only state shared between
/// in-flight requests.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    client: Client,
    target: Url,
    expected: StatusCode,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(config: &BenchConfig) -> Result<Self, BenchError> {
        config.validate()?;
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_size_limit())
            .timeout(config.timeout_duration())
            .build()?;

        Ok(
            Self::with_client(client, config.target().clone(), config.status()?)
                .max_connections(config.pool_size_limit()),
        )
    }

    /// Dispatcher over a caller-built client. In-flight requests are unbounded until
    /// [`Dispatcher::max_connections`] is set.
    pub fn with_client(client: Client, target: Url, expected: StatusCode) -> Self {
        Self {
            client,
            target,
            expected,
            permits: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
        }
    }

    /// Cap the number of requests in flight at once. A limit of zero is treated as one.
    pub fn max_connections(mut self, limit: usize) -> Self {
        let limit = limit.clamp(1, Semaphore::MAX_PERMITS);
        self.permits = Arc::new(Semaphore::new(limit));
        self
    }

    /// Issue `count` requests at once and wait for every one of them.
    ///
    /// Requests beyond the connection limit wait for a free connection. That wait is part of
    /// their measured latency.
    ///
    /// Always returns exactly `count` outcomes, in the order they completed. Individual
    /// failures are recorded on their outcome and never cut the run short.
    #[instrument(name = "dispatch", skip(self), fields(target = %self.target))]
    pub async fn dispatch(&self, count: usize) -> BenchmarkRun {
        let (tx, mut rx) = mpsc::channel(count.max(1));
        let run_start = Instant::now();

        let mut handles = Vec::with_capacity(count);
        for id in 0..count {
            let tx = tx.clone();
            let client = self.client.clone();
            let target = self.target.clone();
            let expected = self.expected;
            let permits = self.permits.clone();

            let handle = tokio::spawn(
                async move {
                    let outcome =
                        issue(&client, &permits, target, expected, id, run_start).await;
                    // NOTE: Capacity matches the request count so this never waits.
                    let _ = tx.send(outcome).await;
                }
                .in_current_span(),
            );
            handles.push((id, handle));
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(count);
        while let Some(outcome) = rx.recv().await {
            record_metrics(OUTCOME_LABELS, &outcome);
            outcomes.push(outcome);
        }
        let elapsed = run_start.elapsed();

        for (id, handle) in handles {
            if let Err(err) = handle.await {
                error!("Request {id} never reported an outcome: {err}");
                let since_start = run_start.elapsed();
                outcomes.push(RequestOutcome::new(
                    id,
                    since_start,
                    since_start,
                    Err(format!("request task failed: {err}")),
                ));
            }
        }

        BenchmarkRun { outcomes, elapsed }
    }
}

async fn issue(
    client: &Client,
    permits: &Semaphore,
    target: Url,
    expected: StatusCode,
    id: usize,
    run_start: Instant,
) -> RequestOutcome {
    let issued = Instant::now();
    // Queueing for a connection counts towards latency.
    let _permit = permits.acquire().await.ok();
    let result = send_and_drain(client, target).await;
    let completed = Instant::now();

    let result = match result {
        Ok(status) => {
            trace!("Request {id} returned {status}");
            Ok(status == expected)
        }
        Err(err) => {
            let err = describe(&err);
            debug!("Request {id} failed: {err}");
            Err(err)
        }
    };

    RequestOutcome::new(
        id,
        completed.duration_since(issued),
        completed.duration_since(run_start),
        result,
    )
}

async fn send_and_drain(client: &Client, target: Url) -> Result<StatusCode, reqwest::Error> {
    let mut response = client.get(target).send().await?;
    let status = response.status();
    // Drain so the connection can go back to the pool.
    while response.chunk().await?.is_some() {}
    Ok(status)
}

/// One-line diagnostic covering the whole error chain.
fn describe(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else {
        "request"
    };

    let mut message = format!("{kind}: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Validate `config`, run the benchmark and summarize it.
#[instrument(name = "benchmark", skip_all, fields(target = %config.target(), requests = config.requests()))]
pub async fn run(config: &BenchConfig) -> Result<BenchmarkSummary, BenchError> {
    let dispatcher = Dispatcher::new(config)?;
    info!(
        "Dispatching {} requests (timeout {}, pool {})",
        config.requests(),
        format_duration(config.timeout_duration()),
        config.pool_size_limit(),
    );

    let run = dispatcher.dispatch(config.requests()).await;
    let summary = run.summarize(config.implementation_tag())?;
    info!("Completed in {}: {summary}", format_duration(round_millis(run.elapsed)));

    Ok(summary)
}

fn round_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}
