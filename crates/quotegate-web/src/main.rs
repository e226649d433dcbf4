use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use quotegate_core::{QuoteCache, StockPipeline};
use quotegate_web::{router, AppState, ServerArgs, ServerError};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const CACHE_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotegate_core=info,quotegate_web=info,tower_http=debug".into()),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let args = ServerArgs::parse();
    let addr = args.socket_addr()?;
    let config = args.gateway_config();
    debug!(?config, "gateway configuration");

    let pipeline = StockPipeline::from_config(&config);
    if pipeline.validator().is_empty() {
        warn!("symbol allow-list is empty; every request will be rejected");
    }
    tokio::spawn(sweep_cache(pipeline.cache().clone()));

    let app = router(AppState::new(pipeline));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, provider = "alphavantage", "quotegate listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn sweep_cache(cache: QuoteCache) {
    let mut ticker = tokio::time::interval(CACHE_SWEEP_INTERVAL);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let removed = cache.clear_expired().await;
        if removed > 0 {
            debug!(removed, "swept expired cache entries");
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
