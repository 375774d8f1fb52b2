//! Two-level breakdowns between segmentation axes.
//!
//! Stacked views are always estimated with the proportional allocator
//! (`estimated_breakdown`). Reading a precomputed cross-tab from the payload is
//! a separate opt-in (`measured_breakdown`) that falls back to the estimate when
//! the axis pair has no cross-tab. The basis is reported so callers can label
//! estimated figures as such.

use serde::Serialize;

use crate::alloc::allocator::allocate_bars;
use crate::domain::{AllocatedBar, CrossTab, CrossTabKind, Dataset, SegmentAxis, Series, SubSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakdownBasis {
    /// Read from a cross-tab in the payload.
    Measured,
    /// Derived from global shares of the stack axis.
    Estimated,
}

impl BreakdownBasis {
    pub fn label(self) -> &'static str {
        match self {
            BreakdownBasis::Measured => "measured",
            BreakdownBasis::Estimated => "estimated (proportional share)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub primary_axis: SegmentAxis,
    pub stack_axis: SegmentAxis,
    pub year: i32,
    pub basis: BreakdownBasis,
    pub bars: Vec<AllocatedBar>,
}

impl Breakdown {
    /// Sum of every bar's total.
    pub fn grand_total(&self) -> f64 {
        self.bars.iter().map(|b| b.total).sum()
    }

    pub fn bar(&self, primary_name: &str) -> Option<&AllocatedBar> {
        self.bars.iter().find(|b| b.primary_name == primary_name)
    }
}

/// Break every category of `primary_axis` down by `stack_axis` at `year`,
/// reading the payload cross-tab for this axis pair when it is non-empty.
///
/// Cells absent from the cross-tab read as empty series.
pub fn measured_breakdown(
    dataset: &Dataset,
    primary_axis: SegmentAxis,
    stack_axis: SegmentAxis,
    year: i32,
) -> Breakdown {
    let measured = CrossTabKind::between(primary_axis, stack_axis)
        .map(|kind| (kind, dataset.cross_tab(kind)))
        .filter(|(_, tab)| !tab.is_empty());

    match measured {
        Some((kind, tab)) => Breakdown {
            primary_axis,
            stack_axis,
            year,
            basis: BreakdownBasis::Measured,
            bars: measured_bars(dataset, tab, kind, primary_axis, stack_axis, year),
        },
        None => estimated_breakdown(dataset, primary_axis, stack_axis, year),
    }
}

/// Proportional-share breakdown of every category of `primary_axis` by
/// `stack_axis` at `year`, regardless of any cross-tab in the payload.
pub fn estimated_breakdown(
    dataset: &Dataset,
    primary_axis: SegmentAxis,
    stack_axis: SegmentAxis,
    year: i32,
) -> Breakdown {
    Breakdown {
        primary_axis,
        stack_axis,
        year,
        basis: BreakdownBasis::Estimated,
        bars: allocate_bars(
            dataset.segments(primary_axis).as_slice(),
            dataset.segments(stack_axis).as_slice(),
            &dataset.total_market,
            year,
        ),
    }
}

fn measured_bars(
    dataset: &Dataset,
    tab: &CrossTab,
    kind: CrossTabKind,
    primary_axis: SegmentAxis,
    stack_axis: SegmentAxis,
    year: i32,
) -> Vec<AllocatedBar> {
    let primary_is_outer = kind.outer_axis() == primary_axis;

    dataset
        .segments(primary_axis)
        .iter()
        .map(|primary| {
            let sub_segments: Vec<SubSegment> = dataset
                .segments(stack_axis)
                .iter()
                .map(|stack| {
                    let cell = if primary_is_outer {
                        tab.get(&primary.name).and_then(|set| set.get(&stack.name))
                    } else {
                        tab.get(&stack.name).and_then(|set| set.get(&primary.name))
                    };
                    let full_series = match cell {
                        Some(series) => Series::new(stack.name.clone(), series.data.clone()),
                        None => Series::new(stack.name.clone(), Vec::new()),
                    };
                    SubSegment {
                        name: stack.name.clone(),
                        value_at_year: full_series.value_at(year),
                        full_series,
                    }
                })
                .collect();
            let total = sub_segments.iter().map(|s| s.value_at_year).sum();
            AllocatedBar {
                primary_name: primary.name.clone(),
                sub_segments,
                total,
            }
        })
        .collect()
}
