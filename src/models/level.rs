//! # models::level
//!
//! Output rows of the two calculators: [`PriceLevel`] for the Gann
//! Square-of-Nine ladder and [`RetracementLevel`] for retracements.
//!
//! Both are plain values, recomputed wholesale on every request and never
//! stored.

use serde::{Deserialize, Serialize};

// ─── LevelTier ────────────────────────────────────────────────────────────────

/// Visual weight of a Gann level in the ladder table.
///
/// The center level is the base; the two levels a full 90° turn away are the
/// key levels; the remaining even ordinals sit on cardinal angles and odd
/// ordinals on the diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevelTier {
    Base,
    Key,
    Major,
    Minor,
}

impl LevelTier {
    /// Classify a ladder ordinal (1..=19, center 10).
    pub fn for_ordinal(ordinal: u8) -> Self {
        match ordinal {
            10 => LevelTier::Base,
            8 | 12 => LevelTier::Key,
            o if o % 2 == 0 => LevelTier::Major,
            _ => LevelTier::Minor,
        }
    }
}

// ─── PriceLevel ───────────────────────────────────────────────────────────────

/// One rung of the Gann Square-of-Nine ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// `n + 10` for the spiral offset `n ∈ [-9, 9]`; the reference price is 10.
    pub ordinal: u8,

    /// `n * 45`. Not reduced mod 360, so it spans -405..=405.
    pub angle_degrees: i32,

    /// Price at this rung.
    pub value: f64,

    pub tier: LevelTier,
}

// ─── RetracementLevel ─────────────────────────────────────────────────────────

/// A price interpolated between two endpoints at a fixed percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetracementLevel {
    /// Percentage label as shown to the user, e.g. `"61.8%"`.
    pub label: String,

    /// Fraction of the move, e.g. `0.618`.
    pub ratio: f64,

    pub value: f64,
}
