//! Sentiment analysis HTTP service.
//!
//! ```text
//! PORT=10000 SENTIMIENTO_PRELOAD=true sentimiento-server
//! ```

use std::sync::Arc;

use sentimiento::config::ServerConfig;
use sentimiento::sentiment::SentimentAnalyzerBuilder;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ServerConfig::load()?;

    // Thread pools read these on first use, so they go in before the runtime exists.
    config.runtime.apply_to_process();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config))
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = Arc::new(
        SentimentAnalyzerBuilder::robertuito()
            .repo(config.model_repo.clone())
            .runtime(config.runtime.clone())
            .build(),
    );

    if config.preload {
        let warm = Arc::clone(&analyzer);
        match tokio::task::spawn_blocking(move || warm.warm_up().map(|_| ())).await? {
            Ok(()) => info!("model preloaded"),
            Err(e) => warn!(error = %e, "preload failed; the first request will retry"),
        }
    }

    let router = sentimiento::server::router(analyzer, config.index_path.clone());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(
        addr = %bind_addr,
        model = %config.model_repo,
        compute_threads = config.runtime.compute_threads,
        "sentiment service listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sentiment service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
