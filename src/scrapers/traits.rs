use crate::error::ScrapeError;
use crate::models::{ListingId, PropertyRecord};
use async_trait::async_trait;

/// Produces the record for one listing.
/// The aggregator is written against this so tests can swap in slow or failing sources.
#[async_trait]
pub trait PropertyExtractor: Send + Sync {
    /// Canonical page URL for a listing
    fn listing_url(&self, id: &ListingId) -> String;

    /// Fetch and decode one listing.
    ///
    /// `Err` is reserved for failures where no response was obtained; every
    /// other outcome is expressed in the returned record.
    async fn extract(&self, id: &ListingId) -> Result<PropertyRecord, ScrapeError>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
