use crate::error::ScrapeError;
use crate::http::HttpClient;
use crate::models::{ListingId, PropertyRecord};
use crate::scrapers::classified::extract_classified;
use crate::scrapers::traits::PropertyExtractor;
use crate::scrapers::types::SearchParams;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immoweb listing page scraper
pub struct DetailExtractor<C> {
    client: Arc<C>,
    params: SearchParams,
}

impl<C: HttpClient> DetailExtractor<C> {
    pub fn new(client: Arc<C>, params: SearchParams) -> Self {
        Self { client, params }
    }

    /// Record for a page that came back 200.
    fn parse_page(&self, record: PropertyRecord, html: &str) -> PropertyRecord {
        match extract_classified(html) {
            Ok(Some(classified)) => record.with_details(classified.into_details()),
            Ok(None) => {
                debug!(id = %record.id, "No window.classified block on page");
                record
            }
            Err(e) => {
                warn!(id = %record.id, error = %e, "Embedded listing could not be decoded");
                record.with_error(e)
            }
        }
    }
}

#[async_trait]
impl<C: HttpClient> PropertyExtractor for DetailExtractor<C> {
    fn listing_url(&self, id: &ListingId) -> String {
        self.params.listing_url(id)
    }

    async fn extract(&self, id: &ListingId) -> Result<PropertyRecord, ScrapeError> {
        let url = self.listing_url(id);
        let response = self.client.get(&url).await?;

        let record = PropertyRecord::degenerate(id.clone(), url, response.status);
        if !response.is_ok() {
            debug!(%id, status = response.status, "Listing page not available");
            return Ok(record);
        }

        Ok(self.parse_page(record, &response.body))
    }

    fn source_name(&self) -> &'static str {
        "immoweb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleType;
    use crate::testing::{classified_page, full_classified, MockClient};
    use serde_json::json;

    const URL: &str = "https://www.immoweb.be/en/classified/10512345";

    fn extractor(client: MockClient) -> DetailExtractor<MockClient> {
        DetailExtractor::new(Arc::new(client), SearchParams::default())
    }

    fn id() -> ListingId {
        ListingId::new("10512345")
    }

    #[tokio::test]
    async fn full_page_yields_detailed_record() {
        let mut doc = full_classified();
        doc["flags"]["isNotarySale"] = json!(true);
        let client = MockClient::new().on_get(URL, 200, classified_page(&doc));

        let record = extractor(client).extract(&id()).await.unwrap();

        assert_eq!(record.id, id());
        assert_eq!(record.url, URL);
        assert_eq!(record.http_status, 200);
        assert_eq!(record.error, None);
        let details = record.details.unwrap();
        assert_eq!(details.price, Some(349000.0));
        assert_eq!(details.sale_type, Some(SaleType::NotarySale));
    }

    #[tokio::test]
    async fn not_found_yields_identity_only() {
        let client = MockClient::new().on_get(URL, 404, "<html>gone</html>");

        let record = extractor(client).extract(&id()).await.unwrap();

        assert_eq!(
            record,
            PropertyRecord::degenerate(id(), URL.to_string(), 404)
        );
    }

    #[tokio::test]
    async fn page_without_listing_script_yields_identity_only() {
        let html = r#"<html><body><script type="text/javascript">var x = 1;</script></body></html>"#;
        let client = MockClient::new().on_get(URL, 200, html);

        let record = extractor(client).extract(&id()).await.unwrap();

        assert_eq!(
            record,
            PropertyRecord::degenerate(id(), URL.to_string(), 200)
        );
    }

    #[tokio::test]
    async fn malformed_literal_is_recorded_not_raised() {
        let html = r#"<script type="text/javascript">window.classified = {"property": {"type": "HOUSE"};</script>"#;
        let client = MockClient::new().on_get(URL, 200, html);

        let record = extractor(client).extract(&id()).await.unwrap();

        assert_eq!(record.http_status, 200);
        assert!(record.is_degenerate());
        assert!(record.error.is_some());
    }

    #[tokio::test]
    async fn transport_failure_is_an_error() {
        let result = extractor(MockClient::new()).extract(&id()).await;
        assert!(matches!(result, Err(ScrapeError::Transport { .. })));
    }
}
