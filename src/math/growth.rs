//! Growth arithmetic over yearly values.
//!
//! All functions are total: degenerate inputs (non-positive bases, zero
//! denominators, empty spans) resolve to a defined value instead of NaN/inf.

/// Compound annual growth rate, in percent.
///
/// Returns `0` when `start_value <= 0` or `years_span <= 0`.
pub fn cagr(start_value: f64, end_value: f64, years_span: i32) -> f64 {
    if start_value <= 0.0 || years_span <= 0 {
        return 0.0;
    }
    ((end_value / start_value).powf(1.0 / years_span as f64) - 1.0) * 100.0
}

/// Year-over-year change in percent; `None` when there is no base to grow from.
pub fn yoy_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// `value` as a percentage of `total`; `0` for an empty total.
pub fn share_percent(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }
    value / total * 100.0
}
