use utils::*;

use barrage::{BenchConfig, BenchmarkRun, Dispatcher};
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

fn assert_complete(run: &BenchmarkRun, count: usize) {
    assert_eq!(run.outcomes.len(), count);
    let ids: HashSet<usize> = run.outcomes.iter().map(|o| o.id).collect();
    assert_eq!(ids, (0..count).collect());

    let elapsed = run.elapsed.as_secs_f64();
    for outcome in &run.outcomes {
        assert!(outcome.latency_ms >= 0.);
        assert!(outcome.relative_timestamp <= elapsed);
        // Completion can never precede issue.
        assert!(outcome.latency_ms / 1000. <= outcome.relative_timestamp + 1e-9);
    }
}

#[tokio::test]
async fn expected_status_succeeds() {
    let mock = mock().await;
    let dispatcher = dispatcher(&mock.url("/status/200"), 200, Duration::from_secs(5));

    let run = dispatcher.dispatch(50).await;

    assert_complete(&run, 50);
    assert!(run.outcomes.iter().all(|o| o.success && o.error.is_none()));
    assert_eq!(mock.hits.count(), 50);
}

#[tokio::test]
async fn unexpected_status_fails_without_transport_error() {
    let mock = mock().await;
    let dispatcher = dispatcher(&mock.url("/status/500"), 200, Duration::from_secs(5));

    let run = dispatcher.dispatch(10).await;

    assert_complete(&run, 10);
    assert!(run.outcomes.iter().all(|o| !o.success && o.error.is_none()));
}

#[tokio::test]
async fn status_match_is_exact() {
    let mock = mock().await;
    let created = mock.url("/status/201");

    let run = dispatcher(&created, 201, Duration::from_secs(5))
        .dispatch(10)
        .await;
    assert!(run.outcomes.iter().all(|o| o.success));

    // 201 is a success class status, but not the one expected.
    let run = dispatcher(&created, 200, Duration::from_secs(5))
        .dispatch(10)
        .await;
    assert!(run.outcomes.iter().all(|o| !o.success));
}

#[tokio::test]
async fn failures_do_not_affect_other_requests() {
    let mock = mock().await;
    let dispatcher = dispatcher(&mock.url("/fail/every/4"), 200, Duration::from_secs(5));

    let run = dispatcher.dispatch(20).await;

    assert_complete(&run, 20);
    let successful = run.outcomes.iter().filter(|o| o.success).count();
    assert_eq!(successful, 15);
    assert_eq!(mock.hits.count(), 20);
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn timeout_is_a_transport_error() {
    let mock = mock().await;
    let dispatcher = dispatcher(
        &mock.url("/delay/ms/3000"),
        200,
        Duration::from_millis(200),
    );

    let run = dispatcher.dispatch(5).await;

    assert_complete(&run, 5);
    for outcome in &run.outcomes {
        assert!(!outcome.success);
        let error = outcome.error.as_deref().unwrap();
        assert!(error.starts_with("timeout"), "unexpected error: {error}");
        assert!(outcome.latency_ms >= 150.);
        assert!(outcome.latency_ms < 3000.);
    }
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn requests_run_concurrently() {
    let mock = mock().await;
    let dispatcher = dispatcher(&mock.url("/delay/ms/200"), 200, Duration::from_secs(5));

    let run = dispatcher.dispatch(50).await;

    assert_complete(&run, 50);
    assert!(run.outcomes.iter().all(|o| o.success));
    // Serialized, fifty 200ms requests would take ten seconds.
    assert!(run.elapsed < Duration::from_secs(3), "took {:?}", run.elapsed);
}

#[tokio::test(flavor = "multi_thread")]
#[ntest::timeout(10_000)]
async fn pool_size_caps_in_flight_requests() {
    let mock = mock().await;
    let config = BenchConfig::new(&mock.url("/delay/ms/300"), 10)
        .unwrap()
        .pool_size(2);
    let dispatcher = Dispatcher::new(&config).unwrap();

    let run = dispatcher.dispatch(10).await;

    assert_complete(&run, 10);
    assert!(run.outcomes.iter().all(|o| o.success));
    // Two at a time, ten 300ms requests need five rounds.
    assert!(
        run.elapsed >= Duration::from_millis(1400),
        "took {:?}",
        run.elapsed
    );
    let slowest = run
        .outcomes
        .iter()
        .map(|o| o.latency_ms)
        .fold(0., f64::max);
    assert!(slowest >= 1100., "slowest request took {slowest}ms");
}

#[tokio::test(flavor = "multi_thread")]
#[ntest::timeout(10_000)]
async fn caller_supplied_client_with_connection_cap() {
    let mock = mock().await;
    let target = Url::parse(&mock.url("/delay/ms/200")).unwrap();
    let dispatcher =
        Dispatcher::with_client(Client::new(), target, StatusCode::OK).max_connections(1);

    let run = dispatcher.dispatch(4).await;

    assert_complete(&run, 4);
    assert!(run.outcomes.iter().all(|o| o.success));
    assert!(
        run.elapsed >= Duration::from_millis(750),
        "took {:?}",
        run.elapsed
    );
}

#[tokio::test]
async fn zero_requests() {
    let mock = mock().await;
    let dispatcher = dispatcher(&mock.url("/status/200"), 200, Duration::from_secs(5));

    let run = dispatcher.dispatch(0).await;

    assert!(run.outcomes.is_empty());
    assert_eq!(mock.hits.count(), 0);
}

#[tokio::test]
async fn caller_supplied_client() {
    let mock = mock().await;
    let target = Url::parse(&mock.url("/status/204")).unwrap();
    let dispatcher = Dispatcher::with_client(Client::new(), target, StatusCode::NO_CONTENT);

    let run = dispatcher.dispatch(8).await;

    assert_complete(&run, 8);
    assert!(run.outcomes.iter().all(|o| o.success));
}
