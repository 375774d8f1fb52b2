//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the time-series entities (`YearPoint`, `Series`) and year lookup
//! - the expanded dataset and its containers (`SegmentSet`, `CrossTab`, `Dataset`)
//! - the segmentation axes (`SegmentAxis`, `CrossTabKind`)
//! - allocator outputs (`AllocatedBar`, `SubSegment`) and run configuration

pub mod types;

pub use types::*;
