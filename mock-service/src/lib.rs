//! Minimal HTTP endpoint for exercising the benchmark: fixed status codes, fixed or normally
//! distributed delays, and a shared hit counter.
use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use rand_distr::{Distribution, Normal};
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Number of requests the service has received. Clones share the same counter.
#[derive(Clone, Debug, Default)]
pub struct Hits(Arc<AtomicU64>);

impl Hits {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Record a hit and return its 1-based position.
    fn record(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

pub fn router(hits: Hits) -> Router {
    Router::new()
        .route("/status/:code", get(status))
        .route("/delay/ms/:delay_ms", get(delay))
        .route("/status/:code/delay/ms/:delay_ms", get(status_delay))
        .route("/normal/ms/:mean/:std", get(normal))
        .route("/fail/every/:nth", get(fail_every))
        .with_state(hits)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(addr: SocketAddr, hits: Hits) -> std::io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router(hits)).await
}

/// A mock service running in the background on an ephemeral local port.
pub struct MockService {
    pub addr: SocketAddr,
    pub hits: Hits,
}

impl MockService {
    pub async fn spawn() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let hits = Hits::default();
        let app = router(hits.clone());

        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                error!("Mock service stopped: {err}");
            }
        });
        debug!("Mock service listening on {addr}");

        Ok(Self { addr, hits })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

#[debug_handler]
async fn status(State(hits): State<Hits>, Path(code): Path<u16>) -> (StatusCode, &'static str) {
    hits.record();
    respond(code)
}

#[debug_handler]
async fn delay(State(hits): State<Hits>, Path(delay_ms): Path<u64>) -> (StatusCode, &'static str) {
    hits.record();
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    respond(StatusCode::OK.as_u16())
}

#[debug_handler]
async fn status_delay(
    State(hits): State<Hits>,
    Path((code, delay_ms)): Path<(u16, u64)>,
) -> (StatusCode, &'static str) {
    hits.record();
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    respond(code)
}

#[debug_handler]
async fn normal(
    State(hits): State<Hits>,
    Path((mean_ms, std_ms)): Path<(f64, f64)>,
) -> (StatusCode, &'static str) {
    hits.record();
    let Ok(normal) = Normal::new(mean_ms, std_ms) else {
        return (StatusCode::BAD_REQUEST, "invalid distribution");
    };
    let delay_ms = normal.sample(&mut rand::thread_rng()).max(0.);
    tokio::time::sleep(Duration::from_secs_f64(delay_ms / 1000.)).await;
    respond(StatusCode::OK.as_u16())
}

/// Every `nth` hit answers 500, the rest 200.
#[debug_handler]
async fn fail_every(State(hits): State<Hits>, Path(nth): Path<u64>) -> (StatusCode, &'static str) {
    let hit = hits.record();
    if nth > 0 && hit % nth == 0 {
        respond(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
    } else {
        respond(StatusCode::OK.as_u16())
    }
}

fn respond(code: u16) -> (StatusCode, &'static str) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, "ok"),
        Err(_) => (StatusCode::BAD_REQUEST, "invalid status"),
    }
}

/// Log the number of requests served in each second.
pub async fn hits_per_second(hits: Hits) {
    let mut last = hits.count();
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let now = hits.count();
        info!("{} RPS", now - last);
        last = now;
    }
}
