//! HTTP source for the compact market dataset.

use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use tracing::info;

use crate::data::compact::CompactDataset;
use crate::data::decoder::decode;
use crate::domain::Dataset;
use crate::error::AppError;

/// Used when neither `--url` nor `MARKET_DATA_URL` is given.
pub const DEFAULT_DATA_URL: &str = "http://127.0.0.1:8080/data/marketData.json";

const URL_ENV: &str = "MARKET_DATA_URL";

/// `MARKET_DATA_URL` from the environment or `.env`, else the default.
pub fn env_url() -> String {
    dotenvy::dotenv().ok();
    std::env::var(URL_ENV).unwrap_or_else(|_| DEFAULT_DATA_URL.to_string())
}

pub struct MarketDataClient {
    client: Client,
    url: String,
}

impl MarketDataClient {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw payload, bypassing any HTTP caches.
    pub fn fetch_compact(&self) -> Result<CompactDataset, AppError> {
        info!(url = %self.url, "fetching market data");

        let resp = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .map_err(|e| AppError::fetch(format!("Failed to fetch market data: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::fetch(format!("Failed to fetch market data: {}", resp.status())));
        }

        resp.json()
            .map_err(|e| AppError::fetch(format!("Failed to parse market data: {e}")))
    }

    /// Fetch and expand the dataset.
    pub fn fetch_dataset(&self) -> Result<Dataset, AppError> {
        let compact = self.fetch_compact()?;
        let dataset = decode(&compact);
        info!(
            url = %self.url,
            years = dataset.years.len(),
            "market data loaded"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port and return its URL.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/data.json")
    }

    #[test]
    fn bad_status_is_a_fetch_error() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let err = MarketDataClient::with_url(url).fetch_compact().unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.to_string(), "Failed to fetch market data: 404 Not Found");
    }

    #[test]
    fn malformed_body_is_a_fetch_error() {
        let url = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello");
        let err = MarketDataClient::with_url(url).fetch_compact().unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().starts_with("Failed to parse market data"));
    }

    #[test]
    fn refused_connection_is_a_fetch_error() {
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let err = MarketDataClient::with_url(format!("http://127.0.0.1:{port}/data.json"))
            .fetch_compact()
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().starts_with("Failed to fetch market data"));
    }
}
