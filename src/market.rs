//! # market: reference price feed
//!
//! Resolves a symbol and a day offset into one daily closing price for the
//! Gann calculator.
//!
//! ## Sources
//! 1. Yahoo daily chart API (`MARKET_SOURCE=yahoo`, default)
//! 2. Mock close series for dev/test without network (`MARKET_SOURCE=mock`)

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, MarketSource};
use crate::models::ReferenceQuote;

/// Sent with every chart request; the API rejects blank agents.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Deepest day offset either feed will look up, about a year of sessions.
pub const MAX_DAYS_AGO: u32 = 365;

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Missing required parameter: symbol")]
    MissingSymbol,

    /// Symbol unknown upstream, or not enough history for the offset.
    #[error("{0}")]
    NotFound(String),

    #[error("Market API returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Market API unreachable: {0}")]
    Http(#[from] reqwest::Error),
}

// ─── Symbol ───────────────────────────────────────────────────────────────────

/// Upper-case `raw` and append `suffix` unless it is already there.
pub fn normalize_symbol(raw: &str, suffix: &str) -> Result<String, MarketError> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(MarketError::MissingSymbol);
    }

    let suffix = suffix.to_uppercase();
    if suffix.is_empty() || symbol.ends_with(&suffix) {
        Ok(symbol)
    } else {
        Ok(format!("{symbol}{suffix}"))
    }
}

/// Close `days_ago` sessions before the latest one, skipping gaps.
fn pick_close(closes: &[Option<f64>], days_ago: u32) -> Option<f64> {
    closes
        .iter()
        .rev()
        .flatten()
        .nth(days_ago as usize)
        .copied()
}

fn positive_quote(symbol: &str, close: Option<f64>, days_ago: u32) -> Result<ReferenceQuote, MarketError> {
    match close {
        Some(close) if close.is_finite() && close > 0.0 => Ok(ReferenceQuote {
            symbol: symbol.to_string(),
            close,
            days_ago,
        }),
        Some(close) => Err(MarketError::NotFound(format!(
            "Unusable closing price {close} for symbol {symbol}"
        ))),
        None => Err(MarketError::NotFound(format!(
            "No closing price {days_ago} session(s) back for symbol {symbol}"
        ))),
    }
}

fn out_of_range(symbol: &str, days_ago: u32) -> MarketError {
    MarketError::NotFound(format!(
        "Day offset {days_ago} for symbol {symbol} is beyond the {MAX_DAYS_AGO} session limit"
    ))
}

// ─── Chart API wire format ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error:  Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
struct ChartApiError {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Pull the requested close out of a chart response body.
fn close_from_chart(body: &str, symbol: &str, days_ago: u32) -> Result<ReferenceQuote, MarketError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| MarketError::Upstream {
        status: 200,
        body:   format!("unparseable chart response: {e}"),
    })?;

    if let Some(err) = envelope.chart.error {
        return Err(MarketError::NotFound(err.description));
    }

    let closes = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|result| result.indicators.quote.into_iter().next())
        .map(|quote| quote.close)
        .ok_or_else(|| MarketError::NotFound(format!("No data found for symbol {symbol}")))?;

    positive_quote(symbol, pick_close(&closes, days_ago), days_ago)
}

// ─── Yahoo client ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct YahooChartClient {
    client:   reqwest::Client,
    base_url: String,
    timeout:  Duration,
}

impl YahooChartClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self { client, base_url: base_url.into(), timeout }
    }

    async fn closing_price(&self, symbol: &str, days_ago: u32) -> Result<ReferenceQuote, MarketError> {
        // Calendar window wide enough to hold `days_ago` sessions past weekends and holidays.
        let period2 = Utc::now();
        let period1 = period2
            .checked_sub_signed(chrono::Duration::days(i64::from(days_ago) * 2 + 10))
            .ok_or_else(|| out_of_range(symbol, days_ago))?;

        let url = format!(
            "{}/v8/finance/chart/{symbol}?period1={}&period2={}&interval=1d",
            self.base_url,
            period1.timestamp(),
            period2.timestamp(),
        );
        debug!(%url, "Fetching daily chart");

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            // Unknown symbols come back as 404 with a chart.error description.
            return match close_from_chart(&body, symbol, days_ago) {
                Err(MarketError::NotFound(msg)) => Err(MarketError::NotFound(msg)),
                _ => {
                    warn!(status = status.as_u16(), symbol, "Chart API error");
                    Err(MarketError::Upstream { status: status.as_u16(), body })
                }
            };
        }

        close_from_chart(&body, symbol, days_ago)
    }
}

// ─── Mock feed ────────────────────────────────────────────────────────────────

/// Fixed daily closes, oldest first.
#[derive(Debug, Clone)]
pub struct MockFeed {
    series: HashMap<String, Vec<f64>>,
}

impl MockFeed {
    pub fn new(series: HashMap<String, Vec<f64>>) -> Self {
        Self { series }
    }

    fn closing_price(&self, symbol: &str, days_ago: u32) -> Result<ReferenceQuote, MarketError> {
        let closes: Vec<Option<f64>> = self
            .series
            .get(symbol)
            .ok_or_else(|| MarketError::NotFound(format!("No data found for symbol {symbol}")))?
            .iter()
            .copied()
            .map(Some)
            .collect();

        positive_quote(symbol, pick_close(&closes, days_ago), days_ago)
    }
}

impl Default for MockFeed {
    fn default() -> Self {
        let series = [
            ("RELIANCE.NS", vec![2890.4, 2904.15, 2911.0, 2898.55, 2925.3]),
            ("INFY.NS",     vec![1502.0, 1498.75, 1511.2, 1520.05, 1516.6]),
            ("TCS.NS",      vec![3998.1, 4012.45, 4030.0, 4021.8, 4044.25]),
            ("HDFCBANK.NS", vec![1630.5, 1641.2, 1638.9, 1652.0, 1649.35]),
        ];
        Self::new(
            series
                .into_iter()
                .map(|(symbol, closes)| (symbol.to_string(), closes))
                .collect(),
        )
    }
}

// ─── PriceFeed ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum PriceFeed {
    Yahoo(YahooChartClient),
    Mock(MockFeed),
}

impl PriceFeed {
    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        match config.market_source {
            MarketSource::Yahoo => PriceFeed::Yahoo(YahooChartClient::new(
                client,
                config.market_url.clone(),
                config.market_timeout,
            )),
            MarketSource::Mock => {
                warn!("MARKET_SOURCE=mock, using MOCK closing prices");
                PriceFeed::Mock(MockFeed::default())
            }
        }
    }

    /// Close for an already-normalised `symbol`, `days_ago` sessions back.
    pub async fn closing_price(&self, symbol: &str, days_ago: u32) -> Result<ReferenceQuote, MarketError> {
        if days_ago > MAX_DAYS_AGO {
            return Err(out_of_range(symbol, days_ago));
        }
        match self {
            PriceFeed::Yahoo(client) => client.closing_price(symbol, days_ago).await,
            PriceFeed::Mock(feed)    => feed.closing_price(symbol, days_ago),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
