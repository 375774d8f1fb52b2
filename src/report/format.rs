//! Value formatting and terminal reports.
//!
//! We keep formatting code in one place so:
//! - the allocation/view code stays clean and testable
//! - output changes are localized

use crate::domain::{DashboardConfig, Dataset, SegmentAxis};
use crate::view::{
    ComparisonRow, DrillDown, GrowthRow, KpiSummary, SegmentView, StackedView, distribution,
};

/// US$ millions as `$12.3B` (≥ 1000) or `$850M`.
pub fn format_currency(value: f64) -> String {
    if value >= 1000.0 {
        return format!("${:.1}B", value / 1000.0);
    }
    format!("${value:.0}M")
}

/// Percentage with an explicit sign for non-negative values (`+12.3%`).
pub fn format_percentage(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}

/// Market overview: KPIs over the total market plus one distribution per axis.
pub fn format_overview(dataset: &Dataset, kpis: &KpiSummary, config: &DashboardConfig) -> String {
    let mut out = String::new();

    out.push_str("=== mkt - Market Overview ===\n");
    out.push_str(&format!("Source: {}\n", config.source.describe()));
    if let (Some(first), Some(last)) = (dataset.first_year(), dataset.last_year()) {
        out.push_str(&format!("Years: {first}-{last} (US$ millions)\n"));
    }
    out.push('\n');
    out.push_str(&format_kpis(kpis, config));

    out.push_str("\nYoY trend:\n");
    let rows = crate::view::yoy_rows(&dataset.total_market);
    for r in &rows {
        out.push_str(&format!(
            "  {} {:>10} {:>8}\n",
            r.year,
            format_currency(r.value),
            r.change.map(format_percentage).unwrap_or_else(|| "-".to_string()),
        ));
    }

    out.push_str(&format!("\n{} Market Distribution:\n", config.selected_year));
    for axis in SegmentAxis::ALL {
        out.push_str(&format!("- {}\n", axis.title()));
        for slice in distribution(dataset.segments(axis).as_slice(), config.selected_year) {
            out.push_str(&format!(
                "    {:<28} {:>10} {:>6.1}%\n",
                truncate(&slice.name, 28),
                format_currency(slice.value),
                slice.share,
            ));
        }
    }

    out
}

/// Segment screen: KPIs, growth table and stacked breakdowns.
pub fn format_segment_detail(
    view: &SegmentView<'_>,
    kpis: &KpiSummary,
    growth: &[GrowthRow],
    stacked: &[StackedView],
    config: &DashboardConfig,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", view.title));
    out.push_str(&format_kpis(kpis, config));

    out.push_str(&format!("\n{} Distribution ({}):\n", view.title, config.selected_year));
    for slice in distribution(view.series, config.selected_year) {
        out.push_str(&format!(
            "  {:<28} {:>10} {:>6.1}%\n",
            truncate(&slice.name, 28),
            format_currency(slice.value),
            slice.share,
        ));
    }

    out.push_str(&format!("\n{} - Growth Analysis:\n", view.title));
    out.push_str(&format_growth_table(growth, config));

    for sv in stacked {
        out.push('\n');
        out.push_str(&format_stacked(sv));
    }

    out
}

fn format_kpis(kpis: &KpiSummary, config: &DashboardConfig) -> String {
    format!(
        "{} Market Size: {}\n{}-Year CAGR: {:.1}%\n{} Forecast: {}\n",
        kpis.selected_year,
        format_currency(kpis.market_size),
        config.growth_span(),
        kpis.cagr,
        config.forecast_year,
        format_currency(kpis.forecast_value),
    )
}

fn format_growth_table(rows: &[GrowthRow], config: &DashboardConfig) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<28} {:>10} {:>10} {:>8}\n",
            "name", config.base_year, config.forecast_year, "cagr"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<28} {:-<10} {:-<10} {:-<8}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        out.push_str(
            format!(
                "{:<28} {:>10} {:>10} {:>7.1}%\n",
                truncate(&r.name, 28),
                format_currency(r.base_value),
                format_currency(r.forecast_value),
                r.cagr,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// One stacked breakdown as indented bars.
pub fn format_stacked(view: &StackedView) -> String {
    let b = &view.breakdown;
    let mut out = String::new();
    out.push_str(&format!("{} ({}, {}):\n", view.title, b.year, b.basis.label()));
    for bar in &b.bars {
        out.push_str(&format!(
            "  {:<26} {:>10}\n",
            truncate(&bar.primary_name, 26),
            format_currency(bar.total)
        ));
        for sub in &bar.sub_segments {
            let share = crate::math::share_percent(sub.value_at_year, bar.total);
            out.push_str(&format!(
                "    {:<24} {:>10} {:>6.1}%\n",
                truncate(&sub.name, 24),
                format_currency(sub.value_at_year),
                share,
            ));
        }
    }
    out
}

/// Drill-down panel: KPIs, related segments and the YoY table.
pub fn format_drill_down(drill: &DrillDown<'_>, config: &DashboardConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} - Deep Dive ===\n", drill.name));
    out.push_str(&format!(
        "{} Value: ${:.2}B | {} Forecast: ${:.2}B | {}Y CAGR: {:.1}% | YoY Growth: {}\n",
        config.base_year,
        drill.base_value / 1000.0,
        config.forecast_year,
        drill.forecast_value / 1000.0,
        config.growth_span(),
        drill.cagr,
        format_percentage(drill.yoy_growth),
    ));

    if let Some(related) = &drill.related {
        if !related.series.is_empty() {
            out.push_str(&format!("\n{} ({}):\n", related.title, config.base_year));
            for (name, value) in drill.related_bars(config) {
                out.push_str(&format!("  {:<28} {:>10}\n", truncate(&name, 28), format_currency(value)));
            }
        }
    }

    out.push_str("\nYear-over-Year Data:\n");
    out.push_str(format!("{:<6} {:>12} {:>10}\n", "year", "value", "yoy").trim_end());
    out.push('\n');
    for r in &drill.rows {
        out.push_str(&format!(
            "{:<6} {:>12} {:>10}\n",
            r.year,
            format!("${:.1}M", r.value),
            r.change.map(format_percentage).unwrap_or_else(|| "-".to_string()),
        ));
    }

    out
}

/// Year comparison table (one column per year).
pub fn format_comparison(title: &str, rows: &[ComparisonRow], years: &[i32]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title} - Year Comparison\n"));

    let mut header = format!("{:<28}", "name");
    for y in years {
        header.push_str(&format!(" {y:>10}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for r in rows {
        let mut line = format!("{:<28}", truncate(&r.name, 28));
        for (_, v) in &r.values {
            line.push_str(&format!(" {:>10}", format_currency(*v)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
