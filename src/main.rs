// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use sqi_engine::config::Config;
use sqi_engine::routes;
use sqi_engine::scoring::{ScoringEngine, WeightTables};
use sqi_engine::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "sqi.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Weight tables are fixed; build them once and share the engine.
    let engine = Arc::new(ScoringEngine::new(WeightTables::standard()));

    let addr = config.socket_addr()?;
    let state = AppState { engine, config };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("SQI engine listening on {}", addr);

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
