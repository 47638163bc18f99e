use crate::config::ScoutConfig;
use crate::scrapers::types::{SearchParams, MAX_SEARCH_PAGES};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Scrape immoweb.be listings into a JSON document keyed by listing id.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search pages to walk per category (capped at 333)
    #[arg(short, long, default_value_t = MAX_SEARCH_PAGES)]
    pub pages: u32,

    /// Directory for the id list and the record document
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Concurrent search page requests
    #[arg(long, default_value_t = 10)]
    pub id_workers: usize,

    /// Concurrent listing page requests
    #[arg(long, default_value_t = 10)]
    pub detail_workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Read ids from the existing id file instead of searching
    #[arg(long)]
    pub reuse_ids: bool,
}

impl Cli {
    pub fn into_config(self) -> ScoutConfig {
        ScoutConfig {
            search: SearchParams::default().with_pages(self.pages),
            data_dir: self.data_dir,
            id_workers: self.id_workers,
            detail_workers: self.detail_workers,
            request_timeout: Duration::from_secs(self.timeout_secs),
            reuse_ids: self.reuse_ids,
            ..ScoutConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_full_run() {
        let config = Cli::parse_from(["immo-scout"]).into_config();

        assert_eq!(config.search.pages, 333);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.id_workers, 10);
        assert_eq!(config.detail_workers, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.reuse_ids);
    }

    #[test]
    fn oversized_page_count_is_accepted_and_capped() {
        let config = Cli::parse_from(["immo-scout", "--pages", "1000"]).into_config();
        assert_eq!(config.search.effective_pages(), MAX_SEARCH_PAGES);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "immo-scout",
            "-p",
            "5",
            "-d",
            "/tmp/immo",
            "--detail-workers",
            "4",
            "--reuse-ids",
        ]);

        assert_eq!(cli.pages, 5);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/immo"));
        assert_eq!(cli.detail_workers, 4);
        assert!(cli.reuse_ids);
    }
}
