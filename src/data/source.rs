//! Resolve a `DataSource` into a decoded dataset.

use tracing::info;

use crate::data::client::MarketDataClient;
use crate::domain::{DataSource, Dataset, SegmentAxis};
use crate::error::AppError;

/// Load from the configured URL or file.
///
/// A payload without any years is rejected: every view would be empty.
pub fn load_dataset(source: &DataSource) -> Result<Dataset, AppError> {
    let dataset = match source {
        DataSource::Url(url) => MarketDataClient::with_url(url.clone()).fetch_dataset()?,
        DataSource::File(path) => crate::io::load_dataset_file(path)?,
    };
    validate(&dataset)?;

    info!(
        source = %source.describe(),
        years = dataset.years.len(),
        end_user = dataset.segments(SegmentAxis::EndUser).len(),
        aircraft = dataset.segments(SegmentAxis::Aircraft).len(),
        region = dataset.segments(SegmentAxis::Region).len(),
        application = dataset.segments(SegmentAxis::Application).len(),
        equipment = dataset.segments(SegmentAxis::Equipment).len(),
        "dataset ready"
    );
    Ok(dataset)
}

fn validate(dataset: &Dataset) -> Result<(), AppError> {
    if dataset.years.is_empty() {
        return Err(AppError::data("Market data contains no years"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dataset_is_a_data_error() {
        let err = validate(&Dataset::default()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("mkt-source-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"years":[2024],"totalMarket":[5],"endUser":{"OE":[5]},"aircraftType":{},
               "region":{},"application":{},"furnishedEquipment":{},"countryDataByRegion":{}}"#,
        )
        .unwrap();
        let ds = load_dataset(&DataSource::File(path.clone())).unwrap();
        assert_eq!(ds.total_market.value_at(2024), 5.0);
        let _ = std::fs::remove_file(path);
    }
}
