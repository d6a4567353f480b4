//! # error
//!
//! Centralised application error type.
//!
//! Every handler returns `Result<_, AppError>`.  Axum's `IntoResponse` impl
//! converts these into structured JSON error bodies so the frontend always
//! gets a machine-readable response and can show a notification instead of
//! the results table.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::CalcError;
use crate::market::MarketError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Unreadable body, wrong-typed field, or values the calculators reject.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The price feed has nothing for the requested symbol / day.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The upstream market API failed or was unreachable.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

/// Body extraction failures answer 400 with the JSON error body.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<CalcError> for AppError {
    fn from(err: CalcError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::MissingSymbol => AppError::BadRequest(err.to_string()),
            MarketError::NotFound(msg) => AppError::NotFound(msg),
            MarketError::Upstream { .. } | MarketError::Http(_) => {
                AppError::Upstream(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(CalcError::InvalidInput("x".into())), StatusCode::BAD_REQUEST),
            (AppError::from(MarketError::MissingSymbol), StatusCode::BAD_REQUEST),
            (AppError::from(MarketError::NotFound("gone".into())), StatusCode::NOT_FOUND),
            (
                AppError::from(MarketError::Upstream { status: 503, body: "busy".into() }),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
