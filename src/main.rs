//! GiftFlow - conversational gift-card ordering
//!
//! A Rust backend that walks buyers through a personal gift-card purchase,
//! or a bulk business order, one chat turn at a time.

mod api;
mod catalog;
mod config;
mod format;
mod parse;
mod runtime;
mod state_machine;

use api::{create_router, panic_response, AppState};
use config::AppConfig;
use runtime::{InMemorySessionStore, RandomTokens, SharedRuntime};
use std::net::SocketAddr;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftflow=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env();
    tracing::info!(
        flow = ?config.flow.variant,
        discount_percent = config.flow.discount_percent,
        link_domain = %config.flow.link_domain,
        session_ttl = ?config.sessions.ttl,
        max_sessions = ?config.sessions.max_sessions,
        "Configuration loaded"
    );
    if config.sessions.ttl.is_none() || config.sessions.max_sessions.is_none() {
        tracing::warn!("Session store is unbounded; sessions may accumulate without limit");
    }

    // Create application state
    let runtime = SharedRuntime::shared(
        config.flow.clone(),
        InMemorySessionStore::new(config.sessions.clone()),
        RandomTokens,
    );
    let state = AppState::new(runtime);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("GiftFlow server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
