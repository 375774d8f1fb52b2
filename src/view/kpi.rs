//! KPI summaries, growth tables and distributions.

use crate::domain::{DashboardConfig, Series};
use crate::math::{cagr, share_percent, yoy_change};

/// The three headline figures of a dashboard screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSummary {
    pub selected_year: i32,
    /// Market size at the selected year.
    pub market_size: f64,
    /// CAGR from base year to forecast year, in percent.
    pub cagr: f64,
    /// Value at the forecast year.
    pub forecast_value: f64,
}

/// Growth analysis row for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthRow {
    pub name: String,
    pub base_value: f64,
    pub forecast_value: f64,
    pub cagr: f64,
}

/// One slice of a distribution (donut) at a given year.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSlice {
    pub name: String,
    pub value: f64,
    pub share: f64,
}

/// A point of a series with its change over the previous point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoyRow {
    pub year: i32,
    pub value: f64,
    /// `None` for the first point and after a zero value.
    pub change: Option<f64>,
}

/// KPIs over the total market series.
pub fn overview_kpis(total_market: &Series, config: &DashboardConfig) -> KpiSummary {
    let base = total_market.value_at(config.base_year);
    let forecast = total_market.value_at(config.forecast_year);
    KpiSummary {
        selected_year: config.selected_year,
        market_size: total_market.value_at(config.selected_year),
        cagr: cagr(base, forecast, config.growth_span()),
        forecast_value: forecast,
    }
}

/// KPIs over the sum of a segmentation's series.
pub fn segment_kpis(series: &[Series], config: &DashboardConfig) -> KpiSummary {
    let sum_at = |year: i32| series.iter().map(|s| s.value_at(year)).sum::<f64>();
    let base = sum_at(config.base_year);
    let forecast = sum_at(config.forecast_year);
    KpiSummary {
        selected_year: config.selected_year,
        market_size: sum_at(config.selected_year),
        cagr: cagr(base, forecast, config.growth_span()),
        forecast_value: forecast,
    }
}

pub fn growth_table(series: &[Series], config: &DashboardConfig) -> Vec<GrowthRow> {
    series
        .iter()
        .map(|s| {
            let base_value = s.value_at(config.base_year);
            let forecast_value = s.value_at(config.forecast_year);
            GrowthRow {
                name: s.name.clone(),
                base_value,
                forecast_value,
                cagr: cagr(base_value, forecast_value, config.growth_span()),
            }
        })
        .collect()
}

pub fn distribution(series: &[Series], year: i32) -> Vec<DistributionSlice> {
    let total: f64 = series.iter().map(|s| s.value_at(year)).sum();
    series
        .iter()
        .map(|s| {
            let value = s.value_at(year);
            DistributionSlice {
                name: s.name.clone(),
                value,
                share: share_percent(value, total),
            }
        })
        .collect()
}

/// Every point of `series` with its year-over-year change.
pub fn yoy_rows(series: &Series) -> Vec<YoyRow> {
    let mut rows = Vec::with_capacity(series.data.len());
    let mut previous: Option<f64> = None;
    for p in &series.data {
        rows.push(YoyRow {
            year: p.year,
            value: p.value,
            change: previous.and_then(|prev| yoy_change(prev, p.value)),
        });
        previous = Some(p.value);
    }
    rows
}
