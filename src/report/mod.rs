//! Reporting utilities: value formatting and terminal reports.

pub mod format;

pub use format::*;
