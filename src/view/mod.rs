//! Derived views over a decoded dataset.
//!
//! All functions here are pure: the selected year, axis and drill-down target
//! are explicit parameters, never ambient state.

pub mod compare;
pub mod drill;
pub mod kpi;
pub mod segment;

pub use compare::*;
pub use drill::*;
pub use kpi::*;
pub use segment::*;
