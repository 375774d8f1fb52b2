//! Proportional-share allocation of a primary category across a secondary
//! segmentation.
//!
//! The payload only carries independent segment totals, so a "by X by Y"
//! breakdown is estimated: each stack category's share of the overall market
//! in a year is applied to the primary category's own value for that year.
//!
//! ```text
//! ratio(stack, y)  = stack(y) / total(y)          (total(y) == 0 → ratio 0)
//! allocated(y)     = primary(y) * ratio(stack, y)
//! ```
//!
//! The result is a weighted partition of `primary(y)`: when the stack
//! categories sum to the total market, the allocated values sum to the
//! primary's own value.

use tracing::{debug, warn};

use crate::domain::{AllocatedBar, Series, SubSegment, YearPoint};

/// Share of the overall market held by `stack` in `year`.
///
/// A zero (or absent) total gives a ratio of `0` whatever the stack holds.
pub fn share_ratio(stack: &Series, total_market: &Series, year: i32) -> f64 {
    let total = total_market.value_at(year);
    if total == 0.0 {
        return 0.0;
    }
    stack.value_at(year) / total
}

/// Year-by-year estimate of the (primary, stack) pair over every year in
/// `primary.data`.
pub fn allocate_series(primary: &Series, stack: &Series, total_market: &Series) -> Series {
    let data = primary
        .data
        .iter()
        .map(|p| YearPoint {
            year: p.year,
            value: p.value * share_ratio(stack, total_market, p.year),
        })
        .collect();
    Series::new(stack.name.clone(), data)
}

/// Split `primary`'s value at `year` across `stack_categories`.
pub fn allocate_bar(
    primary: &Series,
    stack_categories: &[Series],
    total_market: &Series,
    year: i32,
) -> AllocatedBar {
    let primary_value = primary.value_at(year);

    let sub_segments: Vec<SubSegment> = stack_categories
        .iter()
        .map(|stack| SubSegment {
            name: stack.name.clone(),
            value_at_year: primary_value * share_ratio(stack, total_market, year),
            full_series: allocate_series(primary, stack, total_market),
        })
        .collect();

    let total = sub_segments.iter().map(|s| s.value_at_year).sum();

    AllocatedBar {
        primary_name: primary.name.clone(),
        sub_segments,
        total,
    }
}

/// One allocated bar per primary category, in primary order.
pub fn allocate_bars(
    primaries: &[Series],
    stack_categories: &[Series],
    total_market: &Series,
    year: i32,
) -> Vec<AllocatedBar> {
    if total_market.value_at(year) == 0.0 {
        warn!(year, "total market is zero; every allocated share is 0");
    }
    debug!(
        year,
        primaries = primaries.len(),
        stacks = stack_categories.len(),
        "allocating proportional breakdown"
    );

    primaries
        .iter()
        .map(|primary| allocate_bar(primary, stack_categories, total_market, year))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, points: &[(i32, f64)]) -> Series {
        Series::new(
            name,
            points.iter().map(|&(year, value)| YearPoint { year, value }).collect(),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn splits_primary_by_global_shares() {
        let apac = series("APAC", &[(2024, 500.0)]);
        let total = series("Total Market", &[(2024, 2000.0)]);
        let stacks = vec![
            series("AircraftA", &[(2024, 800.0)]),
            series("AircraftB", &[(2024, 1200.0)]),
        ];

        assert!(approx(share_ratio(&stacks[0], &total, 2024), 0.4));
        assert!(approx(share_ratio(&stacks[1], &total, 2024), 0.6));

        let bar = allocate_bar(&apac, &stacks, &total, 2024);
        assert_eq!(bar.primary_name, "APAC");
        assert_eq!(bar.sub_segments.len(), 2);
        assert!(approx(bar.sub_segments[0].value_at_year, 200.0));
        assert!(approx(bar.sub_segments[1].value_at_year, 300.0));
        assert!(approx(bar.total, 500.0));
    }

    #[test]
    fn zero_total_market_allocates_nothing() {
        let apac = series("APAC", &[(2024, 500.0)]);
        let total = series("Total Market", &[(2024, 0.0)]);
        let stacks = vec![
            series("AircraftA", &[(2024, 800.0)]),
            series("AircraftB", &[(2024, 1200.0)]),
        ];

        assert_eq!(share_ratio(&stacks[0], &total, 2024), 0.0);
        assert_eq!(share_ratio(&stacks[1], &total, 2024), 0.0);

        let bar = allocate_bar(&apac, &stacks, &total, 2024);
        assert_eq!(bar.sub_segments[0].value_at_year, 0.0);
        assert_eq!(bar.sub_segments[1].value_at_year, 0.0);
        assert_eq!(bar.total, 0.0);
        assert!(bar.sub_segments.iter().all(|s| s.full_series.value_at(2024) == 0.0));
    }

    #[test]
    fn absent_total_year_gives_zero_ratio() {
        let total = series("Total Market", &[(2024, 1000.0)]);
        let stack = series("AircraftA", &[(2024, 300.0), (2031, 450.0)]);
        assert!(approx(share_ratio(&stack, &total, 2024), 0.3));
        assert_eq!(share_ratio(&stack, &total, 2031), 0.0);
    }

    #[test]
    fn empty_stack_categories() {
        let apac = series("APAC", &[(2024, 500.0)]);
        let total = series("Total Market", &[(2024, 2000.0)]);
        let bar = allocate_bar(&apac, &[], &total, 2024);
        assert!(bar.sub_segments.is_empty());
        assert_eq!(bar.total, 0.0);
    }

    #[test]
    fn sum_preserved_when_stacks_cover_total() {
        let years = [2022, 2023, 2024, 2025];
        let total = series("Total Market", &[(2022, 900.0), (2023, 1000.0), (2024, 1300.0), (2025, 1450.5)]);
        let stacks = vec![
            series("Narrow-Body", &[(2022, 400.0), (2023, 430.0), (2024, 610.0), (2025, 700.25)]),
            series("Wide-Body", &[(2022, 300.0), (2023, 370.0), (2024, 440.0), (2025, 500.0)]),
            series("Regional", &[(2022, 200.0), (2023, 200.0), (2024, 250.0), (2025, 250.25)]),
        ];
        let primary = series("Europe", &[(2022, 250.0), (2023, 275.0), (2024, 333.3), (2025, 401.7)]);

        for year in years {
            let bar = allocate_bar(&primary, &stacks, &total, year);
            assert!(
                approx(bar.total, primary.value_at(year)),
                "year {year}: {} vs {}",
                bar.total,
                primary.value_at(year)
            );
            let expected: f64 = stacks
                .iter()
                .map(|s| primary.value_at(year) * share_ratio(s, &total, year))
                .sum();
            assert!(approx(bar.total, expected));
        }
    }

    #[test]
    fn bar_total_is_primary_times_summed_ratios() {
        // Stacks cover only part of the market (or overshoot it), and 2026 has
        // no market at all.
        let years = [2023, 2024, 2025, 2026];
        let total = series("Total Market", &[(2023, 1000.0), (2024, 1200.0), (2025, 800.0), (2026, 0.0)]);
        let stacks = vec![
            series("North America", &[(2023, 300.0), (2024, 350.0), (2025, 500.0), (2026, 90.0)]),
            series("Europe", &[(2023, 200.0), (2024, 150.0), (2025, 420.0), (2026, 60.0)]),
        ];
        let primary = series("OE", &[(2023, 640.0), (2024, 700.0), (2025, 512.5), (2026, 75.0)]);

        for year in years {
            let bar = allocate_bar(&primary, &stacks, &total, year);
            let ratio_sum: f64 = stacks.iter().map(|s| share_ratio(s, &total, year)).sum();
            assert!(
                approx(bar.total, primary.value_at(year) * ratio_sum),
                "year {year}: {} vs {}",
                bar.total,
                primary.value_at(year) * ratio_sum
            );
            for (sub, stack) in bar.sub_segments.iter().zip(&stacks) {
                assert!(approx(
                    sub.value_at_year,
                    primary.value_at(year) * share_ratio(stack, &total, year)
                ));
            }
        }

        // Partial coverage scales the bar below the primary's own value.
        let bar_2023 = allocate_bar(&primary, &stacks, &total, 2023);
        assert!(approx(bar_2023.total, 320.0));
        assert_eq!(allocate_bar(&primary, &stacks, &total, 2026).total, 0.0);
    }

    #[test]
    fn full_series_follows_primary_years() {
        let primary = series("OE", &[(2023, 100.0), (2024, 200.0), (2025, 300.0)]);
        // 2025 is absent from the total market, so its ratio is 0.
        let total = series("Total Market", &[(2023, 1000.0), (2024, 1000.0)]);
        let stack = series("Asia-Pacific", &[(2023, 250.0), (2024, 500.0), (2025, 600.0)]);

        let full = allocate_series(&primary, &stack, &total);
        assert_eq!(full.name, "Asia-Pacific");
        assert_eq!(full.years().collect::<Vec<_>>(), vec![2023, 2024, 2025]);
        assert!(approx(full.value_at(2023), 25.0));
        assert!(approx(full.value_at(2024), 100.0));
        assert_eq!(full.value_at(2025), 0.0);
    }

    #[test]
    fn allocate_bars_keeps_primary_order() {
        let total = series("Total Market", &[(2024, 100.0)]);
        let primaries = vec![series("OE", &[(2024, 60.0)]), series("Aftermarket", &[(2024, 40.0)])];
        let stacks = vec![series("North America", &[(2024, 50.0)]), series("Europe", &[(2024, 50.0)])];

        let bars = allocate_bars(&primaries, &stacks, &total, 2024);
        let names: Vec<&str> = bars.iter().map(|b| b.primary_name.as_str()).collect();
        assert_eq!(names, vec!["OE", "Aftermarket"]);
        assert!(approx(bars[0].total, 60.0));
        assert!(approx(bars[1].sub_segments[1].value_at_year, 20.0));
    }
}
