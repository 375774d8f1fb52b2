//! Cross-segmentation breakdowns.
//!
//! - proportional-share allocation (`allocator`)
//! - estimated breakdowns between axes, with an opt-in measured read (`breakdown`)

pub mod allocator;
pub mod breakdown;

pub use allocator::*;
pub use breakdown::*;
