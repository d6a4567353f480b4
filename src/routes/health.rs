//! # routes::health

use std::sync::atomic::Ordering;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::state::SharedState;

// ─── GET /api/health ──────────────────────────────────────────────────────────

pub async fn health_check(
    State(state): State<SharedState>,
) -> impl IntoResponse {
    Json(json!({
        "ok":                true,
        "market_source":     state.config.market_source.to_string(),
        "gann_steps":        state.config.gann_steps,
        "retracement_set":   state.config.retracement_set,
        "gann_count":        state.gann_count.load(Ordering::Relaxed),
        "retracement_count": state.retracement_count.load(Ordering::Relaxed),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::{send, test_app};

    #[tokio::test]
    async fn test_health_reports_config() {
        let (status, body) = send(test_app(), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["market_source"], "mock");
        assert_eq!(body["gann_steps"], serde_json::json!([0.25, 0.125]));
        assert_eq!(body["retracement_set"], "thirds");
        assert_eq!(body["gann_count"], 0);
    }
}
