//! Market data acquisition and decoding.
//!
//! - compact wire format (`compact`)
//! - expansion into the `Dataset` model (`decoder`)
//! - HTTP fetch (`client`) and source resolution (`source`)
//! - load lifecycle with last-request-wins semantics (`loader`)

pub mod client;
pub mod compact;
pub mod decoder;
pub mod loader;
pub mod source;

pub use client::{DEFAULT_DATA_URL, MarketDataClient, env_url};
pub use compact::{CompactDataset, CompactValue, parse_compact};
pub use decoder::{decode, expand_nested, expand_segment_map, expand_series};
pub use loader::{DatasetLoader, LoadState, LoadTicket};
pub use source::load_dataset;
