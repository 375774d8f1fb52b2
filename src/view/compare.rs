//! Multi-year comparison.

use crate::domain::Series;

/// Sorted, distinct set of 1..=`max` years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSelection {
    years: Vec<i32>,
    max: usize,
}

impl YearSelection {
    /// Start with a single year. `max` is clamped to at least 1.
    pub fn new(initial: i32, max: usize) -> Self {
        Self {
            years: vec![initial],
            max: max.max(1),
        }
    }

    /// Build from a list, deduplicated, sorted and truncated to `max`.
    ///
    /// Returns `None` for an empty list.
    pub fn from_years(years: &[i32], max: usize) -> Option<Self> {
        let mut sorted = years.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        sorted.truncate(max.max(1));
        if sorted.is_empty() {
            return None;
        }
        Some(Self {
            years: sorted,
            max: max.max(1),
        })
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn is_compare_mode(&self) -> bool {
        self.years.len() > 1
    }

    /// Add or remove `year`. The last remaining year is never removed and
    /// nothing is added beyond the maximum. Returns whether anything changed.
    pub fn toggle(&mut self, year: i32) -> bool {
        if let Some(pos) = self.years.iter().position(|&y| y == year) {
            if self.years.len() > 1 {
                self.years.remove(pos);
                return true;
            }
            return false;
        }
        if self.years.len() < self.max {
            self.years.push(year);
            self.years.sort_unstable();
            return true;
        }
        false
    }
}

/// Values of one category at each compared year.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub name: String,
    pub values: Vec<(i32, f64)>,
}

pub fn year_comparison(series: &[Series], years: &[i32]) -> Vec<ComparisonRow> {
    series
        .iter()
        .map(|s| ComparisonRow {
            name: s.name.clone(),
            values: years.iter().map(|&y| (y, s.value_at(y))).collect(),
        })
        .collect()
}
