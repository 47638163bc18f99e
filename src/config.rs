use crate::http::DEFAULT_USER_AGENT;
use crate::scrapers::types::SearchParams;
use crate::storage::{IDS_FILE, RECORDS_FILE};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for one scrape run
#[derive(Debug, Clone)]
pub struct ScoutConfig {
    pub search: SearchParams,
    /// Directory holding the id list and the record document
    pub data_dir: PathBuf,
    /// Concurrent search page requests
    pub id_workers: usize,
    /// Concurrent listing page requests
    pub detail_workers: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Skip the harvest and read ids from a previous run's id file
    pub reuse_ids: bool,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            search: SearchParams::default(),
            data_dir: PathBuf::from("data"),
            id_workers: 10,
            detail_workers: 10,
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            reuse_ids: false,
        }
    }
}

impl ScoutConfig {
    pub fn ids_path(&self) -> PathBuf {
        self.data_dir.join(IDS_FILE)
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join(RECORDS_FILE)
    }
}
