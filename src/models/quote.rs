//! # models::quote
//!
//! [`ReferenceQuote`]: the single closing price the price feed resolves for
//! a symbol and day offset.  It is the only thing the Gann calculator needs
//! from the market.

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceQuote {
    /// Normalised symbol as sent upstream, e.g. `"RELIANCE.NS"`.
    pub symbol: String,

    /// Daily closing price.
    pub close: f64,

    /// Trading sessions back from the latest one (`0` = latest close).
    pub days_ago: u32,
}
