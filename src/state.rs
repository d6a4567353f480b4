//! # state
//!
//! Shared application state injected into every Axum handler.
//!
//! The calculators themselves are stateless; what is shared is the
//! configuration, the price feed (which owns the pooled `reqwest::Client`)
//! and a couple of counters for the health endpoint.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::config::Config;
use crate::market::PriceFeed;

// ─── AppState ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Resolves symbol + day offset into a reference close.
    pub feed: Arc<PriceFeed>,

    // ── Metrics ───────────────────────────────────────────────────────────────
    pub gann_count:        Arc<AtomicU64>,
    pub retracement_count: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config, feed: PriceFeed) -> Self {
        Self {
            config:            Arc::new(config),
            feed:              Arc::new(feed),
            gann_count:        Arc::new(AtomicU64::new(0)),
            retracement_count: Arc::new(AtomicU64::new(0)),
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

/// Wire the configured price feed around one shared HTTP client.
pub fn build_state(config: Config) -> SharedState {
    let feed = PriceFeed::from_config(&config, reqwest::Client::new());
    Arc::new(AppState::new(config, feed))
}
