//! HTTP surface: `GET /trending-news` behind a per-IP rate limit.

mod handlers;
mod rate_limit;
mod response;

pub use rate_limit::RateLimiter;
pub use response::{ApiError, ApiResponse};

use crate::feed::HttpFetcher;
use crate::pipeline::HeadlinePipeline;
use axum::routing::get;
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared, immutable request context.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<HeadlinePipeline<HttpFetcher>>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(pipeline: HeadlinePipeline<HttpFetcher>, limiter: RateLimiter) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            limiter: Arc::new(limiter),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/trending-news", get(handlers::trending_news))
        .route_layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit::enforce_rate_limit,
        ))
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl+C.
///
/// Peer addresses are exposed to the rate limiter through `ConnectInfo`.
pub async fn run_server(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
