use barrage::{
    BenchConfig, DEFAULT_EXPECTED_STATUS, DEFAULT_IMPLEMENTATION, DEFAULT_POOL_SIZE,
};
use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const DEFAULT_TARGET: &str = "https://jsonplaceholder.typicode.com/posts/1";

/// Fire concurrent GET requests at one endpoint and print a JSON latency summary.
#[derive(Parser, Debug)]
#[command(name = "barrage", version, about)]
struct BarrageCli {
    #[arg(short, long, default_value = DEFAULT_TARGET)]
    url: String,

    #[arg(short('n'), long, default_value_t = 1000)]
    requests: usize,

    #[arg(long, default_value_t = DEFAULT_EXPECTED_STATUS)]
    expected_status: u16,

    /// Per-request timeout, e.g. `10s` or `250ms`.
    #[arg(short, long, default_value = "10s", value_parser = humantime::parse_duration)]
    timeout: Duration,

    #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
    pool_size: usize,

    #[arg(long, default_value = DEFAULT_IMPLEMENTATION)]
    implementation: String,

    /// Print the summary on a single line.
    #[arg(long)]
    compact: bool,
}

impl BarrageCli {
    fn config(&self) -> Result<BenchConfig, barrage::ConfigError> {
        Ok(BenchConfig::new(&self.url, self.requests)?
            .expected_status(self.expected_status)
            .timeout(self.timeout)
            .pool_size(self.pool_size)
            .implementation(&self.implementation))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("barrage=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = BarrageCli::parse();
    let config = args.config()?;
    info!("Starting benchmark: {} requests to {}", config.requests(), config.target());

    let summary = barrage::run(&config).await?;
    let json = if args.compact {
        serde_json::to_string(&summary)?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    println!("{json}");

    Ok(())
}
