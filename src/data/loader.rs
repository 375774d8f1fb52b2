//! Dataset load lifecycle: pending, ready, failed.
//!
//! A fetch is started with [`DatasetLoader::begin`], which hands out a ticket.
//! Only the outcome carrying the most recent ticket is applied; anything older
//! is stale and dropped, so overlapping refetches resolve to the last request.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::domain::Dataset;
use crate::error::AppError;

/// Observable state of the current load.
#[derive(Debug, Clone)]
pub enum LoadState {
    Pending,
    Ready(Arc<Dataset>),
    Failed(String),
}

/// Identifies one fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub struct DatasetLoader {
    state: LoadState,
    latest: u64,
    loaded_at: Option<DateTime<Local>>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            state: LoadState::Pending,
            latest: 0,
            loaded_at: None,
        }
    }

    /// Start a new request; the previous dataset (if any) is discarded.
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        self.state = LoadState::Pending;
        LoadTicket(self.latest)
    }

    /// Apply a fetch outcome. Returns `false` when the ticket is stale.
    pub fn finish(&mut self, ticket: LoadTicket, outcome: Result<Dataset, AppError>) -> bool {
        if ticket.0 != self.latest {
            warn!(ticket = ticket.0, latest = self.latest, "dropping stale fetch result");
            return false;
        }

        self.state = match outcome {
            Ok(dataset) => {
                info!(ticket = ticket.0, years = dataset.years.len(), "load applied");
                self.loaded_at = Some(Local::now());
                LoadState::Ready(Arc::new(dataset))
            }
            Err(err) => {
                warn!(error = %err, "dataset load failed");
                self.loaded_at = None;
                LoadState::Failed(err.to_string())
            }
        };
        true
    }

    /// Run `fetch` synchronously as a fresh request.
    pub fn load_with<F>(&mut self, fetch: F) -> &LoadState
    where
        F: FnOnce() -> Result<Dataset, AppError>,
    {
        let ticket = self.begin();
        self.finish(ticket, fetch());
        &self.state
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        match &self.state {
            LoadState::Ready(dataset) => Some(Arc::clone(dataset)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LoadState::Pending)
    }

    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_with_years(years: &[i32]) -> Dataset {
        Dataset {
            years: years.to_vec(),
            ..Dataset::default()
        }
    }

    #[test]
    fn starts_pending() {
        let loader = DatasetLoader::new();
        assert!(loader.is_pending());
        assert!(loader.dataset().is_none());
        assert!(loader.error().is_none());
    }

    #[test]
    fn success_then_failure_clears_dataset() {
        let mut loader = DatasetLoader::new();
        loader.load_with(|| Ok(dataset_with_years(&[2016, 2017])));
        assert_eq!(loader.dataset().map(|d| d.years.len()), Some(2));
        assert!(loader.loaded_at().is_some());

        loader.load_with(|| Err(AppError::fetch("Failed to fetch market data: 404 Not Found")));
        assert!(loader.dataset().is_none());
        assert_eq!(loader.error(), Some("Failed to fetch market data: 404 Not Found"));
    }

    #[test]
    fn retry_after_failure_recovers() {
        let mut loader = DatasetLoader::new();
        loader.load_with(|| Err(AppError::fetch("offline")));
        assert!(loader.error().is_some());

        loader.load_with(|| Ok(dataset_with_years(&[2024])));
        assert!(loader.error().is_none());
        assert!(loader.dataset().is_some());
    }

    #[test]
    fn last_request_wins() {
        let mut loader = DatasetLoader::new();
        let first = loader.begin();
        let second = loader.begin();

        assert!(loader.finish(second, Ok(dataset_with_years(&[2030]))));
        assert!(!loader.finish(first, Ok(dataset_with_years(&[2016]))));

        assert_eq!(loader.dataset().map(|d| d.years.clone()), Some(vec![2030]));
    }

    #[test]
    fn stale_failure_does_not_clobber_pending() {
        let mut loader = DatasetLoader::new();
        let first = loader.begin();
        let _second = loader.begin();
        assert!(!loader.finish(first, Err(AppError::fetch("timeout"))));
        assert!(loader.is_pending());
    }
}
