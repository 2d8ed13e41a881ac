mod aggregate;
mod auth;
mod chart;
mod config;
mod error;
mod gateway;
mod model;
mod rank;
mod relay;
mod routes;
mod state;
mod symbols;

use axum::middleware;
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use auth::AuthToken;
use config::BoardConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = BoardConfig::from_env();
    let bind = cfg.bind.clone();
    let port = cfg.port;
    let token = cfg.token.clone();

    let state = AppState::new(cfg);

    let app = Router::new()
        .merge(routes::api_router())
        .route("/health", axum::routing::get(health))
        .layer(middleware::from_fn(auth::require_auth))
        .layer(axum::Extension(AuthToken(token)))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .expect("invalid bind address");

    tracing::info!("trendboard listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, gracefully stopping…");
}
