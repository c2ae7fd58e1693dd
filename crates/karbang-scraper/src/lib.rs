//! Scraper for the karhanbang.com brokerage-office directory.
//!
//! The pipeline resolves a three-level region selection (시도 → 시군구 →
//! 읍면동) against the site's combo-search endpoint, walks every page of the
//! filtered listing table, enriches each row with phone numbers from its
//! detail page, and exports the collected rows to a CSV file.
//!
//! Hosts drive it through [`scrape::search`], observe page-level progress via
//! [`ProgressSink`], and may stop the walk between pages with a
//! [`CancelFlag`].

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod pagination;
pub mod parse;
pub mod progress;
pub mod regions;
pub mod scrape;
pub mod types;

pub use client::DirectoryClient;
pub use config::ClientConfig;
pub use error::ScrapeError;
pub use export::export_csv;
pub use progress::{PageProgress, ProgressSink};
pub use regions::{provinces, RegionResolver};
pub use scrape::{search, CancelFlag};
pub use types::{ListingRecord, SearchFilter};
