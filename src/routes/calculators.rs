//! # routes::calculators
//!
//! HTTP front of the two level calculators.
//!
//! ## Endpoints
//!
//! | Method | Path                           | Description                                   |
//! |--------|--------------------------------|-----------------------------------------------|
//! | POST   | `/api/calculators/gann`        | Ladder from a price, or a symbol + day offset |
//! | POST   | `/api/calculators/retracement` | Levels between a start and an end price       |

use std::sync::atomic::Ordering;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{
    engine::{
        gann::{generate_gann_levels, spiral_folds},
        retracement::{generate_retracement_levels, parse_price, RetracementSet},
        CalcError,
    },
    error::AppError,
    market::normalize_symbol,
    state::SharedState,
};

// ─── POST /api/calculators/gann ───────────────────────────────────────────────

/// ### Request body (JSON)
/// ```json
/// { "symbol": "RELIANCE", "days_ago": 1, "step": 0.25 }
/// ```
/// or, with a known price:
/// ```json
/// { "reference_price": 2911.0, "step": 0.125 }
/// ```
#[derive(Debug, Deserialize)]
pub struct GannRequest {
    pub reference_price: Option<f64>,
    pub symbol:          Option<String>,
    /// Sessions back from the latest close; only used with `symbol`.
    #[serde(default)]
    pub days_ago:        u32,
    /// Defaults to the first configured step.
    pub step:            Option<f64>,
}

pub async fn gann_levels(
    State(state): State<SharedState>,
    payload: Result<Json<GannRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let step = req.step.unwrap_or_else(|| state.config.default_step());
    if !state.config.allows_step(step) {
        return Err(AppError::BadRequest(format!(
            "Step {step} is not allowed. Choose one of {:?}",
            state.config.gann_steps
        )));
    }

    // ── Resolve the reference price ───────────────────────────────────────────
    let (symbol, reference_price) = match (req.reference_price, req.symbol.as_deref()) {
        (Some(price), None) => (None, price),
        (None, Some(raw)) => {
            let symbol = normalize_symbol(raw, &state.config.symbol_suffix)?;
            let quote = state.feed.closing_price(&symbol, req.days_ago).await?;
            info!(symbol = %quote.symbol, close = quote.close, days_ago = quote.days_ago, "Reference close resolved");
            (Some(quote.symbol), quote.close)
        }
        (Some(_), Some(_)) => {
            return Err(AppError::BadRequest(
                "Supply either reference_price or symbol, not both".into(),
            ))
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Please supply a stock symbol or a reference_price".into(),
            ))
        }
    };

    // ── Generate ──────────────────────────────────────────────────────────────
    let levels = generate_gann_levels(reference_price, step)?;
    let folded = spiral_folds(reference_price, step);
    if folded {
        warn!(reference_price, step, "Gann spiral folds below zero, outer levels are not monotonic");
    }

    state.gann_count.fetch_add(1, Ordering::Relaxed);

    Ok(Json(json!({
        "ok":              true,
        "symbol":          symbol,
        "reference_price": reference_price,
        "step":            step,
        "folded":          folded,
        "levels":          levels,
    })))
}

// ─── POST /api/calculators/retracement ────────────────────────────────────────

/// A price as typed by the user: a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl PriceInput {
    fn value(&self) -> Result<f64, CalcError> {
        match self {
            PriceInput::Number(v) => Ok(*v),
            PriceInput::Text(s)   => parse_price(s),
        }
    }
}

/// ### Request body (JSON)
/// ```json
/// { "start_price": "100", "end_price": 150, "set": "fibonacci" }
/// ```
#[derive(Debug, Deserialize)]
pub struct RetracementRequest {
    pub start_price: PriceInput,
    pub end_price:   PriceInput,
    /// `"thirds"` or `"fibonacci"`; defaults to `RETRACEMENT_SET`.
    pub set:         Option<String>,
}

pub async fn retracement_levels(
    State(state): State<SharedState>,
    payload: Result<Json<RetracementRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let set = match req.set.as_deref() {
        Some(raw) => raw.parse::<RetracementSet>()?,
        None => state.config.retracement_set,
    };

    let start = req.start_price.value()?;
    let end = req.end_price.value()?;
    let levels = generate_retracement_levels(start, end, set)?;

    state.retracement_count.fetch_add(1, Ordering::Relaxed);

    Ok(Json(json!({
        "ok":          true,
        "set":         set,
        "start_price": start,
        "end_price":   end,
        "levels":      levels,
    })))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
