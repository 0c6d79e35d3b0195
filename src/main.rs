use anyhow::Context;
use credimeter::{Aggregator, Config, SolanaRpcSource};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Report failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let rpc = Arc::new(SolanaRpcSource::new(config.rpc_url.clone(), config.program_id));
    let aggregator = Aggregator::new(rpc.clone(), rpc, config);

    let tvl = aggregator
        .total_value_locked()
        .await
        .context("computing total value locked")?;
    let borrowed = aggregator
        .total_borrowed()
        .await
        .context("computing total borrowed")?;

    let report = serde_json::json!({
        "tvl": tvl,
        "borrowed": borrowed,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
