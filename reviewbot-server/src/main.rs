use anyhow::Result;
use axum::{http::StatusCode, response::Json, routing::get, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};

use reviewbot_server::config::{BotMode, Config};
use reviewbot_server::poller::polling_loop;
use reviewbot_server::webhook::webhook_router;
use reviewbot_server::AppState;

async fn health_check() -> Result<Json<serde_json::Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "reviewbot"
    })))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    dotenvy::dotenv().ok();

    info!("Starting Azure DevOps code review bot");

    let config =
        Config::from_env().expect("Failed to load configuration from environment variables");
    let mode = config.mode;

    let state = Arc::new(AppState::from_config(config));

    match mode {
        BotMode::Poll => {
            polling_loop(state).await;
        }
        BotMode::Webhook => {
            serve(state).await?;
        }
        BotMode::Both => {
            let polling_state = state.clone();
            tokio::spawn(async move {
                polling_loop(polling_state).await;
            });
            serve(state).await?;
        }
    }

    Ok(())
}

async fn serve(state: Arc<AppState>) -> Result<()> {
    let port = state.config.port;

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(webhook_router(state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server listening on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
