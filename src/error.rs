use thiserror::Error;

/// Failures local to one search page or one listing.
///
/// None of these abort a run: the harvester reports them next to the id set
/// and the aggregator turns them into degenerate records.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`window.classified` marker found but no object literal is assigned to it")]
    MissingLiteral,
}
