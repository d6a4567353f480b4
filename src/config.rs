//! # config: service configuration from environment variables
//!
//! | Variable              | Default                            | Description                          |
//! |-----------------------|------------------------------------|--------------------------------------|
//! | `BIND_ADDR`           | `0.0.0.0:3000`                     | Address Axum listens on              |
//! | `MARKET_SOURCE`       | `yahoo`                            | `yahoo` or `mock` price feed         |
//! | `MARKET_URL`          | `https://query1.finance.yahoo.com` | Base URL of the daily chart API      |
//! | `MARKET_TIMEOUT_SECS` | `5`                                | Outbound request timeout             |
//! | `SYMBOL_SUFFIX`       | `.NS`                              | Exchange suffix appended to symbols  |
//! | `GANN_STEPS`          | `0.25,0.125`                       | Allowed Gann steps, first is default |
//! | `RETRACEMENT_SET`     | `thirds`                           | Default retracement percentages      |

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::engine::retracement::RetracementSet;

/// Where reference prices come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketSource {
    Yahoo,
    Mock,
}

impl std::fmt::Display for MarketSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketSource::Yahoo => write!(f, "yahoo"),
            MarketSource::Mock  => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr:       SocketAddr,
    pub market_source:   MarketSource,
    pub market_url:      String,
    pub market_timeout:  Duration,
    /// Appended to bare symbols, e.g. `INFY` → `INFY.NS`.  Empty = no suffix.
    pub symbol_suffix:   String,
    /// Steps the Gann endpoint accepts.  Never empty; the first is the default.
    pub gann_steps:      Vec<f64>,
    pub retracement_set: RetracementSet,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = var("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let market_source = match var("MARKET_SOURCE")
            .unwrap_or_else(|| "yahoo".to_string())
            .to_lowercase()
            .as_str()
        {
            "yahoo" => MarketSource::Yahoo,
            "mock"  => MarketSource::Mock,
            other => bail!("Unknown MARKET_SOURCE: '{other}'. Use 'yahoo' or 'mock'"),
        };

        let timeout_secs: u64 = var("MARKET_TIMEOUT_SECS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("MARKET_TIMEOUT_SECS must be a number")?;

        let gann_steps = parse_steps(&var("GANN_STEPS").unwrap_or_else(|| "0.25,0.125".to_string()))?;

        let retracement_set: RetracementSet = var("RETRACEMENT_SET")
            .unwrap_or_else(|| "thirds".to_string())
            .parse()
            .context("Invalid RETRACEMENT_SET")?;

        Ok(Self {
            bind_addr,
            market_source,
            market_url:     var("MARKET_URL")
                .unwrap_or_else(|| "https://query1.finance.yahoo.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            market_timeout: Duration::from_secs(timeout_secs),
            symbol_suffix:  var("SYMBOL_SUFFIX").unwrap_or_else(|| ".NS".to_string()),
            gann_steps,
            retracement_set,
        })
    }

    /// Step used when a request does not name one.
    pub fn default_step(&self) -> f64 {
        self.gann_steps[0]
    }

    pub fn allows_step(&self, step: f64) -> bool {
        self.gann_steps.iter().any(|&s| (s - step).abs() < f64::EPSILON)
    }
}

fn parse_steps(raw: &str) -> anyhow::Result<Vec<f64>> {
    let steps = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .with_context(|| format!("GANN_STEPS entry '{s}' must be a positive number"))
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;

    if steps.is_empty() {
        bail!("GANN_STEPS must list at least one step");
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.market_source, MarketSource::Yahoo);
        assert_eq!(config.market_url, "https://query1.finance.yahoo.com");
        assert_eq!(config.market_timeout, Duration::from_secs(5));
        assert_eq!(config.symbol_suffix, ".NS");
        assert_eq!(config.gann_steps, vec![0.25, 0.125]);
        assert_eq!(config.default_step(), 0.25);
        assert_eq!(config.retracement_set, RetracementSet::Thirds);
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("MARKET_SOURCE", "Mock"),
            ("MARKET_URL", "http://localhost:8081/"),
            ("SYMBOL_SUFFIX", ""),
            ("GANN_STEPS", "0.5, 1"),
            ("RETRACEMENT_SET", "fibonacci"),
        ])
        .unwrap();
        assert_eq!(config.market_source, MarketSource::Mock);
        assert_eq!(config.market_url, "http://localhost:8081");
        assert_eq!(config.symbol_suffix, "");
        assert!(config.allows_step(1.0));
        assert!(!config.allows_step(0.25));
        assert_eq!(config.retracement_set, RetracementSet::Fibonacci);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config_with(&[("MARKET_SOURCE", "bloomberg")]).is_err());
        assert!(config_with(&[("GANN_STEPS", "")]).is_err());
        assert!(config_with(&[("GANN_STEPS", "0.25,-1")]).is_err());
        assert!(config_with(&[("MARKET_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_with(&[("RETRACEMENT_SET", "golden")]).is_err());
    }
}
