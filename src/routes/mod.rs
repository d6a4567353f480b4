//! # routes
//!
//! | Method | Path                           | Description                          |
//! |--------|--------------------------------|--------------------------------------|
//! | GET    | `/api/health`                  | Liveness + counters                  |
//! | POST   | `/api/calculators/gann`        | Gann Square-of-Nine ladder           |
//! | POST   | `/api/calculators/retracement` | Retracement levels between two prices |

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::SharedState;

pub mod calculators;
pub mod health;

/// All API routes, without middleware.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/health",                  get(health::health_check))
        .route("/api/calculators/gann",        post(calculators::gann_levels))
        .route("/api/calculators/retracement", post(calculators::retracement_levels))
        .with_state(state)
}
