//! ASCII trend plots for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks of a series shape in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - data points: `o`
//! - interpolated trend: `-` line

use crate::domain::Series;

/// Render `series` over its own year range.
pub fn render_trend_plot(series: &Series, width: usize, height: usize) -> String {
    let Some((y0, y1)) = year_range(series) else {
        return format!("Plot: {} has no data\n", series.name);
    };

    let width = width.max(10);
    let height = height.max(5);

    let (v_min, v_max) = value_range(series).unwrap_or((0.0, 1.0));
    let (v_min, v_max) = pad_range(v_min, v_max, 0.05);
    let (t_min, t_max) = (y0 as f64, y1 as f64);

    let mut grid = vec![vec![' '; width]; height];

    let points: Vec<(usize, usize)> = series
        .data
        .iter()
        .map(|p| {
            (
                map_x(p.year as f64, t_min, t_max, width),
                map_y(p.value, v_min, v_max, height),
            )
        })
        .collect();

    // Line first so points can overlay.
    let mut prev = None;
    for &(x, y) in &points {
        if let Some((x0, yy0)) = prev {
            draw_line(&mut grid, x0, yy0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
    for &(x, y) in &points {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | years=[{y0}, {y1}] | value=[{v_min:.2}, {v_max:.2}] US$M\n",
        series.name
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn year_range(series: &Series) -> Option<(i32, i32)> {
    let min = series.data.iter().map(|p| p.year).min()?;
    let max = series.data.iter().map(|p| p.year).max()?;
    if max > min { Some((min, max)) } else { Some((min, min + 1)) }
}

fn value_range(series: &Series) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for p in &series.data {
        min_v = min_v.min(p.value);
        max_v = max_v.max(p.value);
    }
    if min_v.is_finite() && max_v.is_finite() && max_v > min_v {
        Some((min_v, max_v))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, v_min: f64, v_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((v - v_min) / (v_max - v_min)).clamp(0.0, 1.0);
    // max value -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
