//! Bounded concurrent enrichment of listing ids into records.
//!
//! Workers only produce `(id, record)` pairs; the stream consumer is the
//! single owner of the result map, so no locking is involved.

use crate::models::{ListingId, PropertyRecord};
use crate::scrapers::traits::PropertyExtractor;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// Completed listings between two progress lines.
const PROGRESS_EVERY: usize = 100;

pub struct Aggregator<E> {
    extractor: E,
    workers: usize,
}

impl<E: PropertyExtractor> Aggregator<E> {
    pub fn new(extractor: E, workers: usize) -> Self {
        Self {
            extractor,
            workers: workers.max(1),
        }
    }

    /// Extract every id, `workers` at a time, into one map keyed by id.
    ///
    /// Each input id ends up with exactly one record. An extraction that
    /// fails outright is stored as an unreachable record.
    #[instrument(level = "info", skip_all, fields(source = self.extractor.source_name(), workers = self.workers))]
    pub async fn aggregate<I>(&self, ids: I) -> BTreeMap<ListingId, PropertyRecord>
    where
        I: IntoIterator<Item = ListingId>,
    {
        let ids: Vec<ListingId> = ids.into_iter().collect();
        let total = ids.len();
        info!(total, "Extracting listings");

        let records = stream::iter(ids)
            .map(|id| async move {
                let record = match self.extractor.extract(&id).await {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(%id, error = %e, "Listing extraction failed");
                        PropertyRecord::unreachable(id.clone(), self.extractor.listing_url(&id), &e)
                    }
                };
                (id, record)
            })
            .buffer_unordered(self.workers)
            .fold(BTreeMap::new(), |mut records, (id, record)| async move {
                records.insert(id, record);
                if records.len() % PROGRESS_EVERY == 0 {
                    info!(done = records.len(), total, "Extraction progress");
                }
                records
            })
            .await;

        let degenerate = records.values().filter(|r| r.is_degenerate()).count();
        info!(records = records.len(), degenerate, "Extraction complete");
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::models::{PropertyDetails, NO_RESPONSE_STATUS};
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Finishes listings out of input order and fails every id ending in 7.
    struct ShuffledExtractor {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ShuffledExtractor {
        fn new() -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PropertyExtractor for ShuffledExtractor {
        fn listing_url(&self, id: &ListingId) -> String {
            format!("https://example.test/{id}")
        }

        async fn extract(&self, id: &ListingId) -> Result<PropertyRecord, ScrapeError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let n: u64 = id.as_str().parse().unwrap();
            tokio::time::sleep(Duration::from_millis((n * 37) % 23)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if n % 10 == 7 {
                return Err(ScrapeError::Transport {
                    url: self.listing_url(id),
                    reason: "timed out".to_string(),
                });
            }
            Ok(
                PropertyRecord::degenerate(id.clone(), self.listing_url(id), 200)
                    .with_details(PropertyDetails::default()),
            )
        }

        fn source_name(&self) -> &'static str {
            "shuffled"
        }
    }

    fn ids(count: u64) -> BTreeSet<ListingId> {
        (1..=count).map(|n| ListingId::from(1_000 + n)).collect()
    }

    #[tokio::test]
    async fn every_input_id_gets_exactly_one_record() {
        let input = ids(50);
        let aggregator = Aggregator::new(ShuffledExtractor::new(), 5);

        let records = aggregator.aggregate(input.clone()).await;

        assert_eq!(records.len(), 50);
        assert_eq!(records.keys().cloned().collect::<BTreeSet<_>>(), input);
        assert!(records.iter().all(|(id, record)| &record.id == id));
        assert!(aggregator.extractor.peak.load(Ordering::SeqCst) <= 5);
    }

    #[tokio::test]
    async fn failed_extractions_become_unreachable_records() {
        let records = Aggregator::new(ShuffledExtractor::new(), 5)
            .aggregate(ids(50))
            .await;

        let failed: Vec<_> = records.values().filter(|r| r.error.is_some()).collect();
        assert_eq!(failed.len(), 5);
        for record in failed {
            assert_eq!(record.http_status, NO_RESPONSE_STATUS);
            assert!(record.is_degenerate());
            assert_eq!(record.url, format!("https://example.test/{}", record.id));
        }
    }

    #[tokio::test]
    async fn zero_workers_still_makes_progress() {
        let records = Aggregator::new(ShuffledExtractor::new(), 0)
            .aggregate(ids(3))
            .await;
        assert_eq!(records.len(), 3);
    }
}
