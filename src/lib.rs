//! Immoweb listing scraper.
//!
//! Two phases share one pooled HTTP client:
//! 1. **Harvest**: walk the search API (house and apartment, up to 333 pages)
//!    and collect the deduplicated listing ids.
//! 2. **Detail**: fetch every listing page, decode its embedded
//!    `window.classified` object into a flat [`models::PropertyRecord`] and
//!    gather the records into one map keyed by id.
//!
//! Failures on one page or one listing never stop the run; only writing the
//! results to disk can.

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod storage;

#[cfg(test)]
mod testing;

pub use config::ScoutConfig;
pub use error::ScrapeError;
pub use pipeline::{RunReport, Scout};
