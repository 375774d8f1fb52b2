//! Compact (columnar) wire format of the market dataset.
//!
//! Every segmentation stores one value array per category; index `i` of each
//! array belongs to `years[i]`. Category objects keep their document order,
//! which is the order charts and tables present them in.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Raw payload as fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactDataset {
    pub years: Vec<i32>,
    pub total_market: Vec<CompactValue>,
    pub end_user: CategoryColumns,
    pub aircraft_type: CategoryColumns,
    pub region: CategoryColumns,
    pub application: CategoryColumns,
    pub furnished_equipment: CategoryColumns,
    pub country_data_by_region: NestedColumns,
    #[serde(default)]
    pub end_user_by_aircraft_type: NestedColumns,
    #[serde(default)]
    pub end_user_by_region: NestedColumns,
    #[serde(default)]
    pub aircraft_type_by_region: NestedColumns,
    #[serde(default)]
    pub application_by_region: NestedColumns,
    #[serde(default)]
    pub equipment_by_region: NestedColumns,
}

/// Category name → value array.
pub type CategoryColumns = OrderedMap<Vec<CompactValue>>;

/// Outer key → (category name → value array).
pub type NestedColumns = OrderedMap<CategoryColumns>;

/// A JSON object decoded into a list of entries, preserving document order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn from_entries(entries: Vec<(String, V)>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by category name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap { entries })
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// One entry of a value array. `None` means the source cell was missing.
///
/// Numbers are taken as-is (non-finite → missing); strings are parsed when
/// numeric and treated as missing otherwise (`"?"`, `"."`, `""`); `null` is
/// missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompactValue(pub Option<f64>);

impl CompactValue {
    pub fn get(self) -> Option<f64> {
        self.0
    }
}

impl From<f64> for CompactValue {
    fn from(value: f64) -> Self {
        CompactValue(finite(value))
    }
}

impl<'de> Deserialize<'de> for CompactValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CompactValueVisitor;

        impl<'de> Visitor<'de> for CompactValueVisitor {
            type Value = CompactValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, a numeric string, or null")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(CompactValue(finite(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(CompactValue(Some(v as f64)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(CompactValue(Some(v as f64)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(CompactValue(parse_value(v)))
            }

            fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
                Ok(CompactValue(None))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(CompactValue(None))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(CompactValue(None))
            }

            fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
                deserializer.deserialize_any(self)
            }
        }

        deserializer.deserialize_any(CompactValueVisitor)
    }
}

fn finite(v: f64) -> Option<f64> {
    if v.is_finite() { Some(v) } else { None }
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    finite(trimmed.parse::<f64>().ok()?)
}

/// Parse a compact payload from JSON text.
pub fn parse_compact(json: &str) -> Result<CompactDataset, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "years": [2016, 2017, 2018],
        "totalMarket": [1000, 1100.5, null],
        "endUser": {"OE": [600, 650, 700], "Aftermarket": [400, 450.5, 500]},
        "aircraftType": {},
        "region": {"APAC": [100, 150, "?"], "Europe": ["200", ".", 220]},
        "application": {},
        "furnishedEquipment": {},
        "countryDataByRegion": {"APAC": {"China": [50, 60, 70]}}
    }"#;

    #[test]
    fn parses_minimal_payload_in_document_order() {
        let compact = parse_compact(MINIMAL).unwrap();
        assert_eq!(compact.years, vec![2016, 2017, 2018]);

        let names: Vec<&str> = compact.end_user.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["OE", "Aftermarket"]);

        let regions: Vec<&str> = compact.region.iter().map(|(k, _)| k).collect();
        assert_eq!(regions, vec!["APAC", "Europe"]);

        assert!(compact.end_user_by_region.is_empty());
        assert_eq!(compact.country_data_by_region.len(), 1);
    }

    #[test]
    fn lenient_values() {
        let compact = parse_compact(MINIMAL).unwrap();
        assert_eq!(compact.total_market[2], CompactValue(None));
        assert_eq!(compact.total_market[1], CompactValue(Some(1100.5)));

        let (_, apac) = compact.region.iter().next().unwrap();
        assert_eq!(apac[2], CompactValue(None));

        let (_, europe) = compact.region.iter().nth(1).unwrap();
        assert_eq!(europe[0], CompactValue(Some(200.0)));
        assert_eq!(europe[1], CompactValue(None));
    }

    #[test]
    fn missing_required_segmentation_is_an_error() {
        let err = parse_compact(r#"{"years": [2016], "totalMarket": [1]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn parse_value_rejects_placeholders() {
        assert_eq!(parse_value(" 12.5 "), Some(12.5));
        assert_eq!(parse_value("?"), None);
        assert_eq!(parse_value("."), None);
        assert_eq!(parse_value("NaN"), None);
    }
}
