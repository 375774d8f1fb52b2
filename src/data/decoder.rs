//! Expansion of the compact payload into the `Dataset` model.
//!
//! Every expanded series covers exactly the years of the payload's `years`
//! array: a value array that is shorter (or holds missing cells) zero-fills
//! instead of dropping points. Names pass through unchanged; duplicates are
//! not detected here.

use tracing::debug;

use crate::data::compact::{CategoryColumns, CompactDataset, CompactValue, NestedColumns};
use crate::domain::{CrossTab, Dataset, SegmentSet, Series, TOTAL_MARKET_NAME, YearPoint};

/// Zip `years[i]` with `values[i]`, defaulting missing entries to `0`.
pub fn expand_series(years: &[i32], values: &[CompactValue]) -> Vec<YearPoint> {
    years
        .iter()
        .enumerate()
        .map(|(i, &year)| YearPoint {
            year,
            value: values.get(i).and_then(|v| v.get()).unwrap_or(0.0),
        })
        .collect()
}

/// Expand every category of one segmentation.
pub fn expand_segment_map(years: &[i32], columns: &CategoryColumns) -> SegmentSet {
    SegmentSet::new(
        columns
            .iter()
            .map(|(name, values)| Series::new(name, expand_series(years, values)))
            .collect(),
    )
}

/// Expand a nested segmentation, one `SegmentSet` per outer key.
pub fn expand_nested(years: &[i32], nested: &NestedColumns) -> CrossTab {
    CrossTab::new(
        nested
            .iter()
            .map(|(key, columns)| (key.to_string(), expand_segment_map(years, columns)))
            .collect(),
    )
}

/// Decode a full payload.
pub fn decode(compact: &CompactDataset) -> Dataset {
    let years = compact.years.as_slice();

    let dataset = Dataset {
        years: compact.years.clone(),
        total_market: Series::new(TOTAL_MARKET_NAME, expand_series(years, &compact.total_market)),
        end_user: expand_segment_map(years, &compact.end_user),
        aircraft_type: expand_segment_map(years, &compact.aircraft_type),
        region: expand_segment_map(years, &compact.region),
        application: expand_segment_map(years, &compact.application),
        furnished_equipment: expand_segment_map(years, &compact.furnished_equipment),
        country_data_by_region: expand_nested(years, &compact.country_data_by_region),
        end_user_by_aircraft_type: expand_nested(years, &compact.end_user_by_aircraft_type),
        end_user_by_region: expand_nested(years, &compact.end_user_by_region),
        aircraft_type_by_region: expand_nested(years, &compact.aircraft_type_by_region),
        application_by_region: expand_nested(years, &compact.application_by_region),
        equipment_by_region: expand_nested(years, &compact.equipment_by_region),
    };

    debug!(
        years = dataset.years.len(),
        end_user = dataset.end_user.len(),
        aircraft_type = dataset.aircraft_type.len(),
        region = dataset.region.len(),
        application = dataset.application.len(),
        equipment = dataset.furnished_equipment.len(),
        country_regions = dataset.country_data_by_region.len(),
        "decoded compact dataset"
    );

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::compact::{OrderedMap, parse_compact};

    fn values(raw: &[Option<f64>]) -> Vec<CompactValue> {
        raw.iter().map(|&v| CompactValue(v)).collect()
    }

    #[test]
    fn expand_series_covers_every_year() {
        let years = [2016, 2017, 2018, 2019];
        let expanded = expand_series(&years, &values(&[Some(1.0), Some(2.0)]));
        assert_eq!(expanded.len(), years.len());
        for (point, year) in expanded.iter().zip(years) {
            assert_eq!(point.year, year);
        }
        assert_eq!(expanded[2].value, 0.0);
        assert_eq!(expanded[3].value, 0.0);
    }

    #[test]
    fn expand_series_zero_fills_missing_cells() {
        let years = [2016, 2017, 2018];
        let expanded = expand_series(&years, &values(&[Some(100.0), Some(150.0), None]));
        assert_eq!(
            expanded,
            vec![
                YearPoint { year: 2016, value: 100.0 },
                YearPoint { year: 2017, value: 150.0 },
                YearPoint { year: 2018, value: 0.0 },
            ]
        );
    }

    #[test]
    fn expand_series_ignores_extra_values() {
        let expanded = expand_series(&[2016], &values(&[Some(1.0), Some(2.0)]));
        assert_eq!(expanded, vec![YearPoint { year: 2016, value: 1.0 }]);
    }

    #[test]
    fn expand_segment_map_keeps_names_and_order() {
        let columns = OrderedMap::from_entries(vec![
            ("Narrow-Body".to_string(), values(&[Some(5.0)])),
            ("Wide-Body".to_string(), values(&[Some(7.0)])),
        ]);
        let set = expand_segment_map(&[2024], &columns);
        assert_eq!(set.names(), vec!["Narrow-Body", "Wide-Body"]);
        assert_eq!(set.get("Wide-Body").map(|s| s.value_at(2024)), Some(7.0));
    }

    #[test]
    fn decode_scenario_with_missing_cell() {
        let json = r#"{
            "years": [2016, 2017, 2018],
            "totalMarket": [1000, 1100, 1200],
            "endUser": {},
            "aircraftType": {},
            "region": {"APAC": [100, 150, "?"]},
            "application": {},
            "furnishedEquipment": {},
            "countryDataByRegion": {"APAC": {"China": [10, 20]}},
            "endUserByRegion": {"APAC": {"OE": [60, 90, 0], "Aftermarket": [40, 60, 0]}}
        }"#;
        let dataset = decode(&parse_compact(json).unwrap());

        let apac = dataset.region.get("APAC").unwrap();
        assert_eq!(
            apac.data,
            vec![
                YearPoint { year: 2016, value: 100.0 },
                YearPoint { year: 2017, value: 150.0 },
                YearPoint { year: 2018, value: 0.0 },
            ]
        );

        let china = dataset
            .country_data_by_region
            .get("APAC")
            .and_then(|set| set.get("China"))
            .unwrap();
        assert_eq!(china.data.len(), 3);
        assert_eq!(china.value_at(2018), 0.0);

        assert_eq!(dataset.total_market.name, TOTAL_MARKET_NAME);
        assert_eq!(dataset.end_user_by_region.len(), 1);
        assert!(dataset.equipment_by_region.is_empty());
    }
}
