//! Plotters-powered trend chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Series;

/// High-contrast palette for terminal rendering; lines cycle through it.
pub const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 255, 255),
    RGBColor(255, 200, 0),
    RGBColor(0, 255, 0),
    RGBColor(255, 0, 255),
    RGBColor(255, 80, 80),
    RGBColor(120, 160, 255),
];

/// Matching Ratatui colors for legends drawn outside the chart.
pub fn legend_color(index: usize) -> Color {
    let RGBColor(r, g, b) = PALETTE[index % PALETTE.len()];
    Color::Rgb(r, g, b)
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call.
pub struct TrendChart<'a> {
    /// One line per series, `(year, value)` points.
    pub lines: &'a [Vec<(f64, f64)>],
    /// Vertical marker at the selected year.
    pub marker_x: Option<f64>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for TrendChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            if let Some(x) = self.marker_x {
                chart.draw_series(LineSeries::new([(x, y0), (x, y1)], &RGBColor(110, 110, 110)))?;
            }

            for (i, line) in self.lines.iter().enumerate() {
                let color = PALETTE[i % PALETTE.len()];
                chart.draw_series(LineSeries::new(line.iter().copied(), &color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Chart points and bounds for a set of series.
pub fn chart_lines(series: &[&Series]) -> (Vec<Vec<(f64, f64)>>, [f64; 2], [f64; 2]) {
    let lines: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| s.data.iter().map(|p| (p.year as f64, p.value)).collect())
        .collect();

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in lines.iter().flatten() {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        x_min = 0.0;
        x_max = 1.0;
    }
    // Market values are never negative; anchor the axis at zero.
    y_min = y_min.min(0.0);
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    (lines, [x_min, x_max], [y_min, y_max + pad])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearPoint;

    #[test]
    fn bounds_cover_all_lines_from_zero() {
        let a = Series::new("A", vec![YearPoint { year: 2016, value: 10.0 }, YearPoint { year: 2020, value: 30.0 }]);
        let b = Series::new("B", vec![YearPoint { year: 2034, value: 90.0 }]);
        let (lines, x, y) = chart_lines(&[&a, &b]);
        assert_eq!(lines.len(), 2);
        assert_eq!(x, [2016.0, 2034.0]);
        assert_eq!(y[0], 0.0);
        assert!((y[1] - 94.5).abs() < 1e-9);
    }

    #[test]
    fn empty_input_falls_back_to_unit_bounds() {
        let (lines, x, y) = chart_lines(&[]);
        assert!(lines.is_empty());
        assert_eq!(x, [0.0, 1.0]);
        assert_eq!(y[0], 0.0);
    }
}
