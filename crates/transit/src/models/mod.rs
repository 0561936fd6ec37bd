//! Subway data models, types, and traits.

pub mod line;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use line::Line;
pub use traits::{TransitProvider, TransitStation};
pub use types::{EdgeWeightType, LineStation, Result, TransitError};
