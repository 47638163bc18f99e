use crate::config::ScoutConfig;
use crate::http::{HttpClient, ReqwestClient};
use crate::models::ListingId;
use crate::scrapers::{Aggregator, DetailExtractor, IdHarvester};
use crate::storage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ids: usize,
    pub failed_pages: usize,
    pub records: usize,
    pub degenerate: usize,
}

/// Harvest, enrich and persist, with one client shared by both phases.
pub struct Scout<C> {
    client: Arc<C>,
    config: ScoutConfig,
}

impl Scout<ReqwestClient> {
    pub fn from_config(config: ScoutConfig) -> Result<Self> {
        let client = ReqwestClient::new(config.request_timeout, &config.user_agent)?;
        Ok(Self::new(Arc::new(client), config))
    }
}

impl<C: HttpClient> Scout<C> {
    pub fn new(client: Arc<C>, config: ScoutConfig) -> Self {
        Self { client, config }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();

        let (ids, failed_pages) = if self.config.reuse_ids {
            let path = self.config.ids_path();
            let ids = storage::read_ids(&path).await?;
            info!(path = %path.display(), count = ids.len(), "Reusing listing ids");
            (ids, 0)
        } else {
            self.harvest_ids().await?
        };

        let phase = Instant::now();
        let extractor = DetailExtractor::new(self.client.clone(), self.config.search.clone());
        let records = Aggregator::new(extractor, self.config.detail_workers)
            .aggregate(ids.iter().cloned())
            .await;
        info!(elapsed = ?phase.elapsed(), "Time taken to scrape listings");

        storage::write_records(&self.config.records_path(), &records).await?;

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            ids: ids.len(),
            failed_pages,
            records: records.len(),
            degenerate: records.values().filter(|r| r.is_degenerate()).count(),
        })
    }

    async fn harvest_ids(&self) -> Result<(BTreeSet<ListingId>, usize)> {
        let phase = Instant::now();
        let harvest = IdHarvester::new(
            self.client.clone(),
            self.config.search.clone(),
            self.config.id_workers,
        )
        .harvest()
        .await;

        storage::write_ids(&self.config.ids_path(), &harvest.ids).await?;
        info!(elapsed = ?phase.elapsed(), "Time taken to scrape ids");

        Ok((harvest.ids, harvest.failures.len()))
    }
}
