//! `market-lens` library crate.
//!
//! The binary (`mkt`) is a thin wrapper around this library so that:
//!
//! - decoding, allocation and derived views are testable without a terminal
//! - the same data contract feeds both the CLI reports and the TUI
//! - code stays easy to navigate as the project grows

pub mod alloc;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
pub mod view;
