//! # Levelsmith: Gann & Retracement Level Service
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐  POST /api/calculators/gann         ┌─────────────────────┐
//!  │  Watchlist   │ ───────────────────────────────────▶│  engine::gann       │
//!  │  Frontend    │                                     │        ▲            │
//!  │              │  POST /api/calculators/retracement  │        │ close      │
//!  │              │ ───────────────────────────────────▶│  engine::retracement│
//!  └──────────────┘                                     └────────┼────────────┘
//!                                                                │
//!                                       ┌────────────────────────┴──┐
//!                                       │  market::PriceFeed        │──▶ daily chart API
//!                                       │  (Yahoo | Mock)           │
//!                                       └───────────────────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! See [`config`] for the full table.  `RUST_LOG` adds tracing directives on
//! top of the built-in `levelsmith=debug,tower_http=info`.

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod engine;
mod error;
mod market;
mod models;
mod routes;
mod state;

use config::Config;
use state::{build_state, SharedState};

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional, real env vars win) ────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("levelsmith=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    // ── 3. Config + shared state ──────────────────────────────────────────────
    let config = Config::from_env()?;
    let addr = config.bind_addr;

    info!(
        market_source   = %config.market_source,
        market_url      = %config.market_url,
        gann_steps      = ?config.gann_steps,
        retracement_set = %config.retracement_set,
        "Configuration loaded"
    );

    let state = build_state(config);

    // ── 4. Router + middleware ────────────────────────────────────────────────
    let app = app(state);

    // ── 5. Bind & Serve ───────────────────────────────────────────────────────
    info!(?addr, "Levelsmith server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// API routes wrapped in tracing and CORS layers.
fn app(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
