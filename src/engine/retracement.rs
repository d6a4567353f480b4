//! # engine::retracement
//!
//! Percentage retracement levels between a start and an end price:
//! `level = start + (end - start) · ratio` for every ratio of a
//! [`RetracementSet`], in set order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::CalcError;
use crate::models::RetracementLevel;

// ─── RetracementSet ───────────────────────────────────────────────────────────

const THIRDS: &[(&str, f64)] = &[
    ("33.3%", 1.0 / 3.0),
    ("50.0%", 0.5),
    ("66.7%", 2.0 / 3.0),
];

const FIBONACCI: &[(&str, f64)] = &[
    ("0.0%", 0.0),
    ("23.6%", 0.236),
    ("38.2%", 0.382),
    ("50.0%", 0.5),
    ("61.8%", 0.618),
    ("78.6%", 0.786),
    ("100.0%", 1.0),
];

/// Which percentages to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetracementSet {
    /// 1/3, 1/2, 2/3 of the move.
    #[default]
    Thirds,
    /// 0, 23.6, 38.2, 50, 61.8, 78.6, 100 %.
    Fibonacci,
}

impl RetracementSet {
    /// `(label, ratio)` pairs, ascending by ratio.
    pub fn ratios(self) -> &'static [(&'static str, f64)] {
        match self {
            RetracementSet::Thirds => THIRDS,
            RetracementSet::Fibonacci => FIBONACCI,
        }
    }
}

impl fmt::Display for RetracementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetracementSet::Thirds => write!(f, "thirds"),
            RetracementSet::Fibonacci => write!(f, "fibonacci"),
        }
    }
}

impl FromStr for RetracementSet {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "thirds" => Ok(RetracementSet::Thirds),
            "fibonacci" | "fib" => Ok(RetracementSet::Fibonacci),
            other => Err(CalcError::InvalidInput(format!(
                "unknown retracement set '{other}'. Use 'thirds' or 'fibonacci'"
            ))),
        }
    }
}

// ─── Generator ────────────────────────────────────────────────────────────────

/// Compute the retracement levels of `set` between `start_price` and
/// `end_price`.
///
/// A zero start price is rejected even though the formula tolerates it; a
/// zero-length move (`start == end`) is fine and yields a flat list.
pub fn generate_retracement_levels(
    start_price: f64,
    end_price: f64,
    set: RetracementSet,
) -> Result<Vec<RetracementLevel>, CalcError> {
    if !start_price.is_finite() || !end_price.is_finite() {
        return Err(CalcError::InvalidInput(
            "start and end prices must be finite numbers".into(),
        ));
    }
    if start_price == 0.0 {
        return Err(CalcError::InvalidInput(
            "start price must be non-zero".into(),
        ));
    }

    let diff = end_price - start_price;

    Ok(set
        .ratios()
        .iter()
        .map(|&(label, ratio)| RetracementLevel {
            label: label.to_string(),
            ratio,
            value: start_price + diff * ratio,
        })
        .collect())
}

/// Parse a user-typed price such as `" 101.5 "`.
pub fn parse_price(text: &str) -> Result<f64, CalcError> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CalcError::InvalidInput(format!("'{trimmed}' is not a number")))?;

    if !value.is_finite() {
        return Err(CalcError::InvalidInput(format!(
            "'{trimmed}' is not a finite number"
        )));
    }
    Ok(value)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn values(levels: &[RetracementLevel]) -> Vec<f64> {
        levels.iter().map(|l| l.value).collect()
    }

    #[test]
    fn test_thirds_between_100_and_150() {
        let levels = generate_retracement_levels(100.0, 150.0, RetracementSet::Thirds).unwrap();
        let labels: Vec<&str> = levels.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["33.3%", "50.0%", "66.7%"]);

        let expected = [116.65, 125.0, 133.35];
        for (got, want) in values(&levels).iter().zip(expected) {
            assert!((got - want).abs() < 0.05, "expected ≈{want}, got {got}");
        }
        assert_eq!(levels[1].value, 125.0);
    }

    #[test]
    fn test_fibonacci_spans_the_move() {
        let levels = generate_retracement_levels(200.0, 100.0, RetracementSet::Fibonacci).unwrap();
        assert_eq!(levels.len(), 7);
        assert_eq!(levels.first().unwrap().value, 200.0);
        assert_eq!(levels.last().unwrap().value, 100.0);
        assert!((levels[4].value - 138.2).abs() < 1e-9);
        assert!(levels.windows(2).all(|w| w[0].ratio < w[1].ratio));
    }

    #[test]
    fn test_zero_range_is_flat() {
        for set in [RetracementSet::Thirds, RetracementSet::Fibonacci] {
            let levels = generate_retracement_levels(100.0, 100.0, set).unwrap();
            assert!(levels.iter().all(|l| l.value == 100.0));
        }
    }

    #[test]
    fn test_rejects_zero_start() {
        assert_eq!(
            generate_retracement_levels(0.0, 150.0, RetracementSet::Thirds),
            Err(CalcError::InvalidInput("start price must be non-zero".into()))
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(generate_retracement_levels(f64::NAN, 150.0, RetracementSet::Thirds).is_err());
        assert!(generate_retracement_levels(100.0, f64::INFINITY, RetracementSet::Thirds).is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(" 101.5 ").unwrap(), 101.5);
        assert_eq!(parse_price("-3").unwrap(), -3.0);
        assert!(parse_price("").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("inf").is_err());
        assert!(parse_price("NaN").is_err());
    }

    #[test]
    fn test_set_from_str() {
        assert_eq!("Thirds".parse::<RetracementSet>().unwrap(), RetracementSet::Thirds);
        assert_eq!(" FIBONACCI ".parse::<RetracementSet>().unwrap(), RetracementSet::Fibonacci);
        assert!("golden".parse::<RetracementSet>().is_err());
    }
}
