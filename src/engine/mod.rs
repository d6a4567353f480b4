//! # engine
//!
//! The two level calculators.  Both are pure functions: no I/O, no shared
//! state, safe to call from any handler concurrently.

pub mod gann;
pub mod retracement;

use thiserror::Error;

/// The only way a calculation can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
