//! capjobs — read-only HTTP API over scraped job listings.
//!
//! Listings are grouped per keyword (one MongoDB collection each) and per
//! capital city inside each document. The API only validates, rate limits and
//! reshapes; the dataset itself is written by an external scraper.
//!
//! # Routes
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `GET /` | static HTML page |
//! | `GET /keywords` | the configured keyword whitelist |
//! | `GET /jobs/capitals/{keyword}` | reduced records for one keyword, rate limited |
//! | `GET /jobs/capitals/city/{city}` | 405, not implemented |
//! | `GET /jobs/capitals/{keyword}/{city}` | 405, not implemented |
//!
//! Anything else is a 404 with the same `{"detail": ...}` body as every other
//! error.
//!
//! # Request lifecycle
//!
//! ```text
//! rate limiter ──► keyword registry ──► count ──► find ──► ReducedRecord ──► JSON
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use capjobs_core::Config;
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tracing::info;

pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod state;

use routes::{
    capital_city_jobs_handler, capital_city_keyword_jobs_handler, capital_keyword_jobs_handler,
    keywords_handler, not_found_handler, root_handler,
};
use state::AppState;

/// Build the application router around `state`.
///
/// Only the keyword lookup is rate limited. The limiter runs as a route
/// layer, so it sees the matched route and rejects before the handler body.
pub fn router(state: Arc<AppState>) -> Router {
    let limited = Router::new()
        .route(
            "/jobs/capitals/{keyword}",
            get(capital_keyword_jobs_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit,
        ));

    Router::new()
        .route("/", get(root_handler))
        .route("/keywords", get(keywords_handler))
        .route("/jobs/capitals/city/{city}", get(capital_city_jobs_handler))
        .route(
            "/jobs/capitals/{keyword}/{city}",
            get(capital_city_keyword_jobs_handler),
        )
        .merge(limited)
        .fallback(not_found_handler)
        .with_state(state)
}

/// Connect to the store, bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let state = AppState::connect(&config).await?;
    info!(keywords = state.keywords.len(), "State ready");

    let app = router(state);

    let address = config.server.bind_addr;
    let listener = TcpListener::bind(address).await?;
    info!("Server running on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
