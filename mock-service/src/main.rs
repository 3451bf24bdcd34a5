use mock_service::Hits;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mock_service=info,tower_http=info")),
        )
        .init();

    let hits = Hits::default();
    tokio::spawn(mock_service::hits_per_second(hits.clone()));

    let addr: SocketAddr = "0.0.0.0:3002".parse()?;
    info!("Listening on {addr}");
    mock_service::run(addr, hits).await?;
    Ok(())
}
