//! Input/output helpers.
//!
//! - compact dataset files and expanded snapshots (`dataset`)
//! - series exports to CSV (`export`)

pub mod dataset;
pub mod export;

pub use dataset::*;
pub use export::*;
