//! # engine::gann
//!
//! **Gann Square-of-Nine** level generator.
//!
//! ```text
//!   r = √reference
//!
//!   n   = -9 ... -1    0     1 ... 9
//!   val = (r + step·n)²  ref  (r + step·n)²
//!   ang = n · 45°
//!   ord = n + 10        (1 ..= 19, center = 10)
//! ```
//!
//! If `r + step·(-9)` drops below zero the square folds the lowest rungs back
//! onto the positive axis.  The values are kept as computed; use
//! [`spiral_folds`] to detect it.

use tracing::debug;

use super::CalcError;
use crate::models::{LevelTier, PriceLevel};

/// Spiral offsets either side of the reference price.
pub const SPIRAL_REACH: i32 = 9;

/// Degrees per spiral offset.
pub const DEGREES_PER_STEP: i32 = 45;

/// Number of levels every successful call returns.
pub const LEVEL_COUNT: usize = (2 * SPIRAL_REACH + 1) as usize;

/// Build the 19-level ladder around `reference_price`.
///
/// Fails with [`CalcError::InvalidInput`] when `reference_price` is not a
/// positive finite number or `step` is not finite.
pub fn generate_gann_levels(
    reference_price: f64,
    step: f64,
) -> Result<Vec<PriceLevel>, CalcError> {
    if !reference_price.is_finite() || reference_price <= 0.0 {
        return Err(CalcError::InvalidInput(format!(
            "reference price must be a positive number, got {reference_price}"
        )));
    }
    if !step.is_finite() {
        return Err(CalcError::InvalidInput(format!(
            "step must be a finite number, got {step}"
        )));
    }

    let root = reference_price.sqrt();

    let levels: Vec<PriceLevel> = (-SPIRAL_REACH..=SPIRAL_REACH)
        .map(|n| {
            let ordinal = (n + SPIRAL_REACH + 1) as u8;
            let value = if n == 0 {
                reference_price
            } else {
                (root + step * n as f64).powi(2)
            };

            PriceLevel {
                ordinal,
                angle_degrees: n * DEGREES_PER_STEP,
                value,
                tier: LevelTier::for_ordinal(ordinal),
            }
        })
        .collect();

    debug_assert_eq!(levels.len(), LEVEL_COUNT);
    debug!(reference_price, step, "Gann ladder generated");
    Ok(levels)
}

/// `true` when an outer rung's base `√reference - |step|·9` is negative,
/// i.e. the ladder is no longer monotonic in `value`.
pub fn spiral_folds(reference_price: f64, step: f64) -> bool {
    let lowest_base = reference_price.sqrt() - step.abs() * SPIRAL_REACH as f64;
    lowest_base < 0.0
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_ladder_shape() {
        let levels = generate_gann_levels(250.0, 0.125).unwrap();
        assert_eq!(levels.len(), LEVEL_COUNT);

        for (i, level) in levels.iter().enumerate() {
            assert_eq!(level.ordinal as usize, i + 1);
            assert_eq!(level.angle_degrees, (i as i32 - 9) * 45);
        }

        let center = &levels[9];
        assert_eq!(center.ordinal, 10);
        assert_eq!(center.angle_degrees, 0);
        assert_eq!(center.value, 250.0);
        assert_eq!(center.tier, LevelTier::Base);

        assert_eq!(levels[0].angle_degrees, -405);
        assert_eq!(levels[18].angle_degrees, 405);
    }

    #[test]
    fn test_known_values_at_100() {
        let levels = generate_gann_levels(100.0, 0.25).unwrap();
        assert_close(levels[9].value, 100.0);
        assert_close(levels[10].value, 105.0625);
        assert_close(levels[8].value, 95.0625);
        // n = 9 → (10 + 2.25)² ; n = -9 → (10 - 2.25)²
        assert_close(levels[18].value, 150.0625);
        assert_close(levels[0].value, 60.0625);
    }

    #[test]
    fn test_strictly_increasing_when_not_folded() {
        for &(price, step) in &[(100.0, 0.25), (2450.5, 0.125), (17.3, 0.25), (81.0, 1.0)] {
            assert!(!spiral_folds(price, step));
            let levels = generate_gann_levels(price, step).unwrap();
            assert!(
                levels.windows(2).all(|w| w[0].value < w[1].value),
                "ladder for {price}/{step} not increasing"
            );
        }
    }

    #[test]
    fn test_folded_spiral_keeps_values() {
        // √1 - 0.25·9 = -1.25 → lowest rung folds onto the positive axis
        assert!(spiral_folds(1.0, 0.25));
        let levels = generate_gann_levels(1.0, 0.25).unwrap();
        assert_eq!(levels.len(), LEVEL_COUNT);
        assert_close(levels[0].value, 1.5625);
        assert!(levels[0].value > levels[4].value);
    }

    #[test]
    fn test_rejects_non_positive_reference() {
        assert!(matches!(
            generate_gann_levels(0.0, 0.25),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_gann_levels(-5.0, 0.25),
            Err(CalcError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_gann_levels(f64::NAN, 0.25),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_step() {
        assert!(matches!(
            generate_gann_levels(100.0, f64::INFINITY),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_key_tiers() {
        let levels = generate_gann_levels(100.0, 0.25).unwrap();
        assert_eq!(levels[7].tier, LevelTier::Key);
        assert_eq!(levels[11].tier, LevelTier::Key);
        assert_eq!(levels[1].tier, LevelTier::Major);
        assert_eq!(levels[0].tier, LevelTier::Minor);
    }
}
