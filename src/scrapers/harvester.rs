//! Listing id discovery over the paginated search API.

use crate::error::ScrapeError;
use crate::http::HttpClient;
use crate::models::ListingId;
use crate::scrapers::types::{PropertyCategory, SearchParams};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Results are kept as raw values so one malformed entry cannot sink the page.
#[derive(Deserialize)]
struct SearchPage {
    results: Vec<Value>,
}

fn result_id(result: &Value) -> Option<ListingId> {
    let id = ListingId::deserialize(result.get("id")?).ok()?;
    (!id.as_str().trim().is_empty()).then_some(id)
}

/// A search page that could not be read.
#[derive(Debug)]
pub struct PageFailure {
    pub page: u32,
    pub category: PropertyCategory,
    pub error: ScrapeError,
}

/// Outcome of a harvest: every id found plus the pages that failed.
#[derive(Debug, Default)]
pub struct Harvest {
    pub ids: BTreeSet<ListingId>,
    pub failures: Vec<PageFailure>,
}

pub struct IdHarvester<C> {
    client: Arc<C>,
    params: SearchParams,
    workers: usize,
}

impl<C: HttpClient> IdHarvester<C> {
    pub fn new(client: Arc<C>, params: SearchParams, workers: usize) -> Self {
        Self {
            client,
            params,
            workers: workers.max(1),
        }
    }

    /// Walk every page of every category and collect the deduplicated ids.
    ///
    /// Pages are fetched concurrently; a page that fails is reported in
    /// [`Harvest::failures`] and the rest of the harvest carries on.
    #[instrument(level = "info", skip_all, fields(pages = self.params.effective_pages()))]
    pub async fn harvest(&self) -> Harvest {
        let requests = self.params.page_requests();
        info!(
            requests = requests.len(),
            workers = self.workers,
            "Harvesting listing ids"
        );

        let pages: Vec<_> = stream::iter(requests)
            .map(|(page, category)| async move {
                let result = self.fetch_page(page, category).await;
                (page, category, result)
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut harvest = Harvest::default();
        let mut seen = 0usize;
        for (page, category, result) in pages {
            match result {
                Ok(ids) => {
                    seen += ids.len();
                    harvest.ids.extend(ids);
                }
                Err(error) => {
                    warn!(page, %category, error = %error, "Search page failed; skipping");
                    harvest.failures.push(PageFailure {
                        page,
                        category,
                        error,
                    });
                }
            }
        }

        info!(
            seen,
            unique = harvest.ids.len(),
            failed_pages = harvest.failures.len(),
            "Harvest complete"
        );
        harvest
    }

    async fn fetch_page(
        &self,
        page: u32,
        category: PropertyCategory,
    ) -> Result<Vec<ListingId>, ScrapeError> {
        let url = self.params.search_url(category, page);
        let response = self.client.get(&url).await?;
        if !response.is_ok() {
            return Err(ScrapeError::UnexpectedStatus {
                url,
                status: response.status,
            });
        }

        let search: SearchPage = serde_json::from_str(&response.body)?;
        let ids: Vec<ListingId> = search.results.iter().filter_map(result_id).collect();

        let skipped = search.results.len() - ids.len();
        if skipped > 0 {
            warn!(page, %category, skipped, "Search results without a usable id");
        }
        debug!(page, %category, count = ids.len(), "Parsed search page");
        Ok(ids)
    }
}
