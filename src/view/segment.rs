//! Segment selection and drill-down adjacency.
//!
//! Pure dispatch over `SegmentAxis`: no arithmetic happens here, only the
//! choice of which dataset field (and which title) drives a chart.

use crate::alloc::{Breakdown, estimated_breakdown, measured_breakdown};
use crate::domain::{Dataset, SegmentAxis, Series};

/// Title plus series for one segmentation axis.
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    pub axis: SegmentAxis,
    pub title: &'static str,
    pub series: &'a [Series],
}

/// The drill-down axis exposed when a category of an axis is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedAxis {
    /// Countries of the selected region (`countryDataByRegion[name]`).
    CountriesInRegion,
    Segment(SegmentAxis),
}

/// Series exposed for a drill-down, with its heading.
#[derive(Debug, Clone)]
pub struct RelatedSegments<'a> {
    pub title: String,
    pub series: &'a [Series],
}

/// A stacked breakdown shown on a segment screen.
#[derive(Debug, Clone)]
pub struct StackedView {
    pub title: &'static str,
    pub breakdown: Breakdown,
}

/// Static adjacency: which axis a drill-down on `axis` reveals.
pub fn related_axis(axis: SegmentAxis) -> RelatedAxis {
    match axis {
        SegmentAxis::Region => RelatedAxis::CountriesInRegion,
        SegmentAxis::Aircraft => RelatedAxis::Segment(SegmentAxis::Application),
        SegmentAxis::EndUser => RelatedAxis::Segment(SegmentAxis::Region),
        SegmentAxis::Application => RelatedAxis::Segment(SegmentAxis::Aircraft),
        SegmentAxis::Equipment => RelatedAxis::Segment(SegmentAxis::EndUser),
    }
}

pub fn segment_view(dataset: &Dataset, axis: SegmentAxis) -> SegmentView<'_> {
    SegmentView {
        axis,
        title: axis.title(),
        series: dataset.segments(axis).as_slice(),
    }
}

/// Related series for a drill-down on `name` within `axis`.
///
/// `None` when the axis has nothing to reveal for this category (a region
/// without country data).
pub fn related_segments<'a>(dataset: &'a Dataset, axis: SegmentAxis, name: &str) -> Option<RelatedSegments<'a>> {
    match related_axis(axis) {
        RelatedAxis::CountriesInRegion => dataset.country_data_by_region.get(name).map(|set| RelatedSegments {
            title: format!("Countries in {name}"),
            series: set.as_slice(),
        }),
        RelatedAxis::Segment(related) => Some(RelatedSegments {
            title: related_title(axis).to_string(),
            series: dataset.segments(related).as_slice(),
        }),
    }
}

fn related_title(axis: SegmentAxis) -> &'static str {
    match axis {
        SegmentAxis::Aircraft => "Applications for this Aircraft Type",
        SegmentAxis::EndUser => "Regions for this End User",
        SegmentAxis::Application => "Aircraft Types by Application",
        SegmentAxis::Equipment => "End Users by Equipment",
        SegmentAxis::Region => "Countries",
    }
}

/// Stack axes shown as breakdowns on an axis' detail screen.
pub fn stacked_companions(axis: SegmentAxis) -> &'static [(SegmentAxis, &'static str)] {
    match axis {
        SegmentAxis::EndUser => &[
            (SegmentAxis::Aircraft, "OE vs Aftermarket by Aircraft Type"),
            (SegmentAxis::Region, "OE vs Aftermarket by Region"),
        ],
        SegmentAxis::Aircraft | SegmentAxis::Region | SegmentAxis::Application | SegmentAxis::Equipment => &[],
    }
}

/// Proportional-share breakdowns for an axis' detail screen at `year`.
///
/// Payload cross-tabs are ignored here; see `measured_stacked_views`.
pub fn stacked_views(dataset: &Dataset, axis: SegmentAxis, year: i32) -> Vec<StackedView> {
    stacked_companions(axis)
        .iter()
        .map(|&(stack_axis, title)| StackedView {
            title,
            breakdown: estimated_breakdown(dataset, axis, stack_axis, year),
        })
        .collect()
}

/// Same views, read from payload cross-tabs where the dataset carries them.
pub fn measured_stacked_views(dataset: &Dataset, axis: SegmentAxis, year: i32) -> Vec<StackedView> {
    stacked_companions(axis)
        .iter()
        .map(|&(stack_axis, title)| StackedView {
            title,
            breakdown: measured_breakdown(dataset, axis, stack_axis, year),
        })
        .collect()
}

/// Drill-down label for a stacked sub-segment.
pub fn stacked_drill_label(sub_segment: &str, primary: &str) -> String {
    format!("{sub_segment} ({primary})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CrossTab, SegmentSet, YearPoint};

    fn series(name: &str, value: f64) -> Series {
        Series::new(name, vec![YearPoint { year: 2024, value }])
    }

    fn dataset() -> Dataset {
        Dataset {
            years: vec![2024],
            total_market: series("Total Market", 100.0),
            end_user: SegmentSet::new(vec![series("OE", 60.0), series("Aftermarket", 40.0)]),
            aircraft_type: SegmentSet::new(vec![series("Narrow-Body", 70.0), series("Wide-Body", 30.0)]),
            region: SegmentSet::new(vec![series("North America", 55.0), series("Europe", 45.0)]),
            application: SegmentSet::new(vec![series("Seating", 80.0), series("Galley", 20.0)]),
            furnished_equipment: SegmentSet::new(vec![series("SFE", 50.0), series("BFE", 50.0)]),
            country_data_by_region: CrossTab::new(vec![(
                "North America".to_string(),
                SegmentSet::new(vec![series("USA", 50.0), series("Canada", 5.0)]),
            )]),
            ..Dataset::default()
        }
    }

    #[test]
    fn adjacency_table() {
        assert_eq!(related_axis(SegmentAxis::Region), RelatedAxis::CountriesInRegion);
        assert_eq!(related_axis(SegmentAxis::Aircraft), RelatedAxis::Segment(SegmentAxis::Application));
        assert_eq!(related_axis(SegmentAxis::EndUser), RelatedAxis::Segment(SegmentAxis::Region));
        assert_eq!(related_axis(SegmentAxis::Application), RelatedAxis::Segment(SegmentAxis::Aircraft));
        assert_eq!(related_axis(SegmentAxis::Equipment), RelatedAxis::Segment(SegmentAxis::EndUser));
    }

    #[test]
    fn segment_view_selects_field_and_title() {
        let ds = dataset();
        let view = segment_view(&ds, SegmentAxis::Equipment);
        assert_eq!(view.title, "Equipment");
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.series[1].name, "BFE");

        let aircraft = segment_view(&ds, SegmentAxis::Aircraft);
        assert_eq!(aircraft.title, "Aircraft Type");
        assert_eq!(aircraft.series[0].name, "Narrow-Body");
    }

    #[test]
    fn aircraft_drill_down_reveals_applications() {
        let ds = dataset();
        let related = related_segments(&ds, SegmentAxis::Aircraft, "Narrow-Body").unwrap();
        assert_eq!(related.title, "Applications for this Aircraft Type");
        assert_eq!(related.series[0].name, "Seating");
    }

    #[test]
    fn region_drill_down_reveals_countries_when_present() {
        let ds = dataset();
        let related = related_segments(&ds, SegmentAxis::Region, "North America").unwrap();
        assert_eq!(related.title, "Countries in North America");
        assert_eq!(related.series.len(), 2);

        assert!(related_segments(&ds, SegmentAxis::Region, "Europe").is_none());
    }

    #[test]
    fn only_end_user_has_stacked_views() {
        let ds = dataset();
        let views = stacked_views(&ds, SegmentAxis::EndUser, 2024);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].title, "OE vs Aftermarket by Aircraft Type");
        assert_eq!(views[1].breakdown.stack_axis, SegmentAxis::Region);
        assert!((views[0].breakdown.grand_total() - 100.0).abs() < 1e-9);

        for axis in [SegmentAxis::Aircraft, SegmentAxis::Region, SegmentAxis::Application, SegmentAxis::Equipment] {
            assert!(stacked_views(&ds, axis, 2024).is_empty());
        }
    }

    #[test]
    fn stacked_views_ignore_payload_cross_tab() {
        let mut ds = dataset();
        ds.region = SegmentSet::new(vec![series("North America", 50.0), series("Europe", 50.0)]);
        ds.end_user_by_region = CrossTab::new(vec![(
            "North America".to_string(),
            SegmentSet::new(vec![series("OE", 45.0)]),
        )]);

        let views = stacked_views(&ds, SegmentAxis::EndUser, 2024);
        let by_region = &views[1].breakdown;
        assert_eq!(by_region.stack_axis, SegmentAxis::Region);
        assert_eq!(by_region.basis, crate::alloc::BreakdownBasis::Estimated);
        let oe = by_region.bar("OE").unwrap();
        assert_eq!(oe.sub_segments[0].name, "North America");
        assert!((oe.sub_segments[0].value_at_year - 30.0).abs() < 1e-9);
        assert!((oe.sub_segments[1].value_at_year - 30.0).abs() < 1e-9);
        assert!((oe.total - 60.0).abs() < 1e-9);

        // The cross-tab is still reachable on request.
        let measured = measured_stacked_views(&ds, SegmentAxis::EndUser, 2024);
        assert_eq!(measured[1].breakdown.basis, crate::alloc::BreakdownBasis::Measured);
        assert_eq!(measured[1].breakdown.bar("OE").unwrap().sub_segments[0].value_at_year, 45.0);
        assert_eq!(measured[0].breakdown.basis, crate::alloc::BreakdownBasis::Estimated);
    }

    #[test]
    fn stacked_label() {
        assert_eq!(stacked_drill_label("Europe", "Aftermarket"), "Europe (Aftermarket)");
    }
}
