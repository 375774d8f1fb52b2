//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> decode -> select axis -> KPIs/breakdowns -> drill-down
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::alloc::estimated_breakdown;
use crate::domain::{DashboardConfig, Dataset, SegmentAxis};
use crate::error::AppError;
use crate::view::{
    DistributionSlice, DrillDown, GrowthRow, KpiSummary, SegmentView, StackedView, YoyRow, distribution,
    drill_down, drill_sub_segment, growth_table, overview_kpis, segment_kpis, segment_view, stacked_views,
    yoy_rows,
};

/// Everything the overview screen shows.
#[derive(Debug, Clone)]
pub struct OverviewScreen {
    pub kpis: KpiSummary,
    pub trend: Vec<YoyRow>,
    pub distributions: Vec<(SegmentAxis, Vec<DistributionSlice>)>,
}

/// Everything a segment detail screen shows.
#[derive(Debug, Clone)]
pub struct SegmentScreen<'a> {
    pub view: SegmentView<'a>,
    pub kpis: KpiSummary,
    pub growth: Vec<GrowthRow>,
    pub distribution: Vec<DistributionSlice>,
    pub stacked: Vec<StackedView>,
}

/// How far a drill-down goes past the first level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillTarget<'s> {
    Category,
    Related(&'s str),
    Stacked { stack_axis: SegmentAxis, sub_segment: &'s str },
}

/// Load the dataset named by the configuration.
pub fn load(config: &DashboardConfig) -> Result<Dataset, AppError> {
    crate::data::load_dataset(&config.source)
}

pub fn overview_screen(dataset: &Dataset, config: &DashboardConfig) -> OverviewScreen {
    OverviewScreen {
        kpis: overview_kpis(&dataset.total_market, config),
        trend: yoy_rows(&dataset.total_market),
        distributions: SegmentAxis::ALL
            .iter()
            .map(|&axis| (axis, distribution(dataset.segments(axis).as_slice(), config.selected_year)))
            .collect(),
    }
}

pub fn segment_screen<'a>(dataset: &'a Dataset, axis: SegmentAxis, config: &DashboardConfig) -> SegmentScreen<'a> {
    let view = segment_view(dataset, axis);
    SegmentScreen {
        kpis: segment_kpis(view.series, config),
        growth: growth_table(view.series, config),
        distribution: distribution(view.series, config.selected_year),
        stacked: stacked_views(dataset, axis, config.selected_year),
        view,
    }
}

/// Resolve a drill-down request, turning unknown names into data errors.
pub fn resolve_drill<'a>(
    dataset: &'a Dataset,
    axis: SegmentAxis,
    name: &str,
    target: DrillTarget<'_>,
    config: &DashboardConfig,
) -> Result<DrillDown<'a>, AppError> {
    let first = drill_down(dataset, axis, name, config).ok_or_else(|| unknown_category(dataset, axis, name))?;

    match target {
        DrillTarget::Category => Ok(first),
        DrillTarget::Related(related) => first.open_related(related, config).ok_or_else(|| {
            let title = first.related.as_ref().map(|r| r.title.as_str()).unwrap_or("related segments");
            AppError::data(format!("'{related}' is not listed under {title} for '{name}'"))
        }),
        DrillTarget::Stacked {
            stack_axis,
            sub_segment,
        } => {
            let b = estimated_breakdown(dataset, axis, stack_axis, config.selected_year);
            let sub = b
                .bar(name)
                .and_then(|bar| bar.sub_segments.iter().find(|s| s.name == sub_segment))
                .ok_or_else(|| unknown_category(dataset, stack_axis, sub_segment))?;
            Ok(drill_sub_segment(sub, name, config))
        }
    }
}

fn unknown_category(dataset: &Dataset, axis: SegmentAxis, name: &str) -> AppError {
    AppError::data(format!(
        "Unknown {} category '{name}' (known: {})",
        axis.title(),
        dataset.segments(axis).names().join(", ")
    ))
}
