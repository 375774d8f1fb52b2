//! Mathematical utilities: growth rates and shares.

pub mod growth;

pub use growth::*;
