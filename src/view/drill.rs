//! Drill-down summaries for a single series.
//!
//! The first level opens a category of an axis and lists its related
//! segments; the second level opens one of those related series. Stacked
//! sub-segments open their allocated `full_series` directly.

use crate::domain::{DashboardConfig, Dataset, SegmentAxis, Series, SubSegment};
use crate::math::cagr;
use crate::view::kpi::{YoyRow, yoy_rows};
use crate::view::segment::{RelatedSegments, related_segments, stacked_drill_label};

/// Everything a drill-down panel shows.
#[derive(Debug, Clone)]
pub struct DrillDown<'a> {
    pub name: String,
    pub series: Series,
    pub base_value: f64,
    pub forecast_value: f64,
    pub cagr: f64,
    /// Growth into the base year, in percent (`0` when the prior year is not positive).
    pub yoy_growth: f64,
    pub rows: Vec<YoyRow>,
    pub related: Option<RelatedSegments<'a>>,
}

impl<'a> DrillDown<'a> {
    /// Related series with their base-year values, in related order.
    pub fn related_bars(&self, config: &DashboardConfig) -> Vec<(String, f64)> {
        self.related
            .as_ref()
            .map(|related| {
                related
                    .series
                    .iter()
                    .map(|s| (s.name.clone(), s.value_at(config.base_year)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Second drill level: open a related series by name.
    pub fn open_related(&self, name: &str, config: &DashboardConfig) -> Option<DrillDown<'a>> {
        let related = self.related.as_ref()?;
        let series = related.series.iter().find(|s| s.name == name)?;
        Some(summarize(series.name.clone(), series.clone(), None, config))
    }
}

/// First drill level for `name` within `axis`. `None` when the category is unknown.
pub fn drill_down<'a>(
    dataset: &'a Dataset,
    axis: SegmentAxis,
    name: &str,
    config: &DashboardConfig,
) -> Option<DrillDown<'a>> {
    let series = dataset.segments(axis).get(name)?;
    Some(summarize(
        series.name.clone(),
        series.clone(),
        related_segments(dataset, axis, name),
        config,
    ))
}

/// Drill into one stack of an allocated bar.
pub fn drill_sub_segment<'a>(sub_segment: &SubSegment, primary: &str, config: &DashboardConfig) -> DrillDown<'a> {
    summarize(
        stacked_drill_label(&sub_segment.name, primary),
        sub_segment.full_series.clone(),
        None,
        config,
    )
}

/// Drill into an arbitrary series (e.g. the total market).
pub fn drill_series<'a>(series: &Series, config: &DashboardConfig) -> DrillDown<'a> {
    summarize(series.name.clone(), series.clone(), None, config)
}

fn summarize<'a>(
    name: String,
    series: Series,
    related: Option<RelatedSegments<'a>>,
    config: &DashboardConfig,
) -> DrillDown<'a> {
    let base_value = series.value_at(config.base_year);
    let forecast_value = series.value_at(config.forecast_year);
    let prior = series.value_at(config.base_year - 1);
    let yoy_growth = if prior > 0.0 {
        (base_value - prior) / prior * 100.0
    } else {
        0.0
    };
    let rows = yoy_rows(&series);

    DrillDown {
        name,
        base_value,
        forecast_value,
        cagr: cagr(base_value, forecast_value, config.growth_span()),
        yoy_growth,
        rows,
        related,
        series,
    }
}
