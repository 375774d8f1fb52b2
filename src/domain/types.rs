//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once per fetch by the decoder and shared read-only afterwards
//! - consumed by the allocator and the derived-view layer
//! - exported to JSON/CSV

use std::path::PathBuf;

use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// First year of the forecast horizon; KPIs grow from here.
pub const BASE_YEAR: i32 = 2024;

/// Last forecast year shown by KPIs and growth tables.
pub const FORECAST_YEAR: i32 = 2034;

/// Year selected when the dashboard opens.
pub const DEFAULT_SELECTED_YEAR: i32 = 2025;

/// Name given to the aggregate market series.
pub const TOTAL_MARKET_NAME: &str = "Total Market";

/// A single yearly observation (US$ millions).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: i32,
    pub value: f64,
}

/// A named yearly series, ordered by year ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub data: Vec<YearPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, data: Vec<YearPoint>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Value at `year`, or `0` when the series has no point for it.
    pub fn value_at(&self, year: i32) -> f64 {
        value_at_year(&self.data, year)
    }

    /// Years covered by this series, in order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.data.iter().map(|p| p.year)
    }
}

/// Look up the value for `year`; absent years resolve to `0`.
pub fn value_at_year(data: &[YearPoint], year: i32) -> f64 {
    data.iter()
        .find(|p| p.year == year)
        .map(|p| p.value)
        .unwrap_or(0.0)
}

/// An ordered collection of series with unique names (one segmentation).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SegmentSet {
    series: Vec<Series>,
}

impl SegmentSet {
    pub fn new(series: Vec<Series>) -> Self {
        Self { series }
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn as_slice(&self) -> &[Series] {
        &self.series
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Sum of every member's value at `year`.
    pub fn total_at(&self, year: i32) -> f64 {
        self.series.iter().map(|s| s.value_at(year)).sum()
    }
}

impl<'a> IntoIterator for &'a SegmentSet {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}

/// Two-level keyed container: outer category name → inner segmentation.
///
/// Missing outer keys are a typed absence (`None`), never a default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrossTab {
    entries: Vec<(String, SegmentSet)>,
}

impl CrossTab {
    pub fn new(entries: Vec<(String, SegmentSet)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&SegmentSet> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, set)| set)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentSet)> {
        self.entries.iter().map(|(k, set)| (k.as_str(), set))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CrossTab {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, set) in &self.entries {
            map.serialize_entry(key, set)?;
        }
        map.end()
    }
}

/// The expanded market dataset. Immutable once decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub years: Vec<i32>,
    pub total_market: Series,
    pub end_user: SegmentSet,
    pub aircraft_type: SegmentSet,
    pub region: SegmentSet,
    pub application: SegmentSet,
    pub furnished_equipment: SegmentSet,
    pub country_data_by_region: CrossTab,
    pub end_user_by_aircraft_type: CrossTab,
    pub end_user_by_region: CrossTab,
    pub aircraft_type_by_region: CrossTab,
    pub application_by_region: CrossTab,
    pub equipment_by_region: CrossTab,
}

impl Default for Series {
    fn default() -> Self {
        Self::new(TOTAL_MARKET_NAME, Vec::new())
    }
}

impl Dataset {
    /// Primary segmentation for an axis.
    pub fn segments(&self, axis: SegmentAxis) -> &SegmentSet {
        match axis {
            SegmentAxis::EndUser => &self.end_user,
            SegmentAxis::Aircraft => &self.aircraft_type,
            SegmentAxis::Region => &self.region,
            SegmentAxis::Application => &self.application,
            SegmentAxis::Equipment => &self.furnished_equipment,
        }
    }

    /// Precomputed cross-tab, if the payload carried one.
    pub fn cross_tab(&self, kind: CrossTabKind) -> &CrossTab {
        match kind {
            CrossTabKind::EndUserByAircraftType => &self.end_user_by_aircraft_type,
            CrossTabKind::EndUserByRegion => &self.end_user_by_region,
            CrossTabKind::AircraftTypeByRegion => &self.aircraft_type_by_region,
            CrossTabKind::ApplicationByRegion => &self.application_by_region,
            CrossTabKind::EquipmentByRegion => &self.equipment_by_region,
        }
    }

    pub fn first_year(&self) -> Option<i32> {
        self.years.first().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }
}

/// One of the five ways the market is sliced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SegmentAxis {
    #[value(name = "end-user")]
    EndUser,
    Aircraft,
    Region,
    Application,
    Equipment,
}

impl SegmentAxis {
    pub const ALL: [SegmentAxis; 5] = [
        SegmentAxis::EndUser,
        SegmentAxis::Aircraft,
        SegmentAxis::Region,
        SegmentAxis::Application,
        SegmentAxis::Equipment,
    ];

    /// Section title used for charts and reports.
    pub fn title(self) -> &'static str {
        match self {
            SegmentAxis::EndUser => "End User",
            SegmentAxis::Aircraft => "Aircraft Type",
            SegmentAxis::Region => "Region",
            SegmentAxis::Application => "Application",
            SegmentAxis::Equipment => "Equipment",
        }
    }

    /// Short tab label.
    pub fn tab_label(self) -> &'static str {
        match self {
            SegmentAxis::EndUser => "End-User",
            SegmentAxis::Aircraft => "Aircraft-Type",
            SegmentAxis::Region => "Region",
            SegmentAxis::Application => "Application",
            SegmentAxis::Equipment => "Equipment",
        }
    }
}

/// Precomputed cross-tabulations a payload may carry.
///
/// The outer key of each table belongs to the axis after "By"; the inner
/// categories belong to the axis before it (same shape as
/// `countryDataByRegion`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossTabKind {
    EndUserByAircraftType,
    EndUserByRegion,
    AircraftTypeByRegion,
    ApplicationByRegion,
    EquipmentByRegion,
}

impl CrossTabKind {
    pub const ALL: [CrossTabKind; 5] = [
        CrossTabKind::EndUserByAircraftType,
        CrossTabKind::EndUserByRegion,
        CrossTabKind::AircraftTypeByRegion,
        CrossTabKind::ApplicationByRegion,
        CrossTabKind::EquipmentByRegion,
    ];

    /// Axis of the inner categories.
    pub fn inner_axis(self) -> SegmentAxis {
        match self {
            CrossTabKind::EndUserByAircraftType | CrossTabKind::EndUserByRegion => SegmentAxis::EndUser,
            CrossTabKind::AircraftTypeByRegion => SegmentAxis::Aircraft,
            CrossTabKind::ApplicationByRegion => SegmentAxis::Application,
            CrossTabKind::EquipmentByRegion => SegmentAxis::Equipment,
        }
    }

    /// Axis of the outer keys.
    pub fn outer_axis(self) -> SegmentAxis {
        match self {
            CrossTabKind::EndUserByAircraftType => SegmentAxis::Aircraft,
            CrossTabKind::EndUserByRegion
            | CrossTabKind::AircraftTypeByRegion
            | CrossTabKind::ApplicationByRegion
            | CrossTabKind::EquipmentByRegion => SegmentAxis::Region,
        }
    }

    /// The table relating two axes, in either orientation.
    pub fn between(a: SegmentAxis, b: SegmentAxis) -> Option<CrossTabKind> {
        CrossTabKind::ALL.into_iter().find(|kind| {
            (kind.inner_axis() == a && kind.outer_axis() == b)
                || (kind.inner_axis() == b && kind.outer_axis() == a)
        })
    }
}

/// One stack of an allocated bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubSegment {
    pub name: String,
    pub value_at_year: f64,
    /// Year-by-year values of this (primary, stack) pair, for drill-down.
    pub full_series: Series,
}

/// A primary category split across a secondary segmentation.
///
/// `total` is the sum of `sub_segments[..].value_at_year`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedBar {
    pub primary_name: String,
    pub sub_segments: Vec<SubSegment>,
    pub total: f64,
}

/// Where the dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    pub fn describe(&self) -> String {
        match self {
            DataSource::Url(url) => url.clone(),
            DataSource::File(path) => path.display().to_string(),
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub selected_year: i32,
    pub base_year: i32,
    pub forecast_year: i32,
    /// Maximum number of years in a comparison.
    pub max_compare_years: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl DashboardConfig {
    /// Years between base and forecast, used as the CAGR span.
    pub fn growth_span(&self) -> i32 {
        self.forecast_year - self.base_year
    }
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

    #[test]
    fn value_at_returns_zero_for_missing_year() {
        let s = series("APAC", &[(2016, 100.0), (2017, 150.0)]);
        assert_eq!(s.value_at(2017), 150.0);
        assert_eq!(s.value_at(1999), 0.0);
        assert_eq!(s.value_at(i32::MAX), 0.0);
        assert_eq!(value_at_year(&[], 2024), 0.0);
    }

    #[test]
    fn segment_set_lookup_and_total() {
        let set = SegmentSet::new(vec![
            series("OE", &[(2024, 600.0)]),
            series("Aftermarket", &[(2024, 400.0)]),
        ]);
        assert_eq!(set.names(), vec!["OE", "Aftermarket"]);
        assert!(set.get("Retrofit").is_none());
        assert!((set.total_at(2024) - 1000.0).abs() < 1e-9);
        assert_eq!(set.total_at(2030), 0.0);
    }

    #[test]
    fn cross_tab_missing_key_is_none() {
        let tab = CrossTab::new(vec![(
            "North America".to_string(),
            SegmentSet::new(vec![series("USA", &[(2024, 10.0)])]),
        )]);
        assert!(tab.get("North America").is_some());
        assert!(tab.get("Atlantis").is_none());
    }

    #[test]
    fn dataset_segments_dispatch_is_exhaustive() {
        let ds = Dataset {
            region: SegmentSet::new(vec![series("Europe", &[])]),
            furnished_equipment: SegmentSet::new(vec![series("BFE", &[])]),
            ..Dataset::default()
        };
        assert_eq!(ds.segments(SegmentAxis::Region).names(), vec!["Europe"]);
        assert_eq!(ds.segments(SegmentAxis::Equipment).names(), vec!["BFE"]);
        assert!(ds.segments(SegmentAxis::Aircraft).is_empty());
    }

    #[test]
    fn cross_tab_kind_between_either_orientation() {
        assert_eq!(
            CrossTabKind::between(SegmentAxis::EndUser, SegmentAxis::Region),
            Some(CrossTabKind::EndUserByRegion)
        );
        assert_eq!(
            CrossTabKind::between(SegmentAxis::Region, SegmentAxis::EndUser),
            Some(CrossTabKind::EndUserByRegion)
        );
        assert_eq!(CrossTabKind::between(SegmentAxis::Aircraft, SegmentAxis::Application), None);
    }
}
