//! Domain models shared across the service.

pub mod level;
pub mod quote;

pub use level::{LevelTier, PriceLevel, RetracementLevel};
pub use quote::ReferenceQuote;
