//! On-disk artifacts of a run: the id list and the record document.
//!
//! Write failures here are fatal to the run; everything upstream has already
//! been isolated per page or per listing.

use crate::models::{ListingId, PropertyRecord};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tokio::fs;
use tracing::info;

pub const IDS_FILE: &str = "properties_ids.txt";
pub const RECORDS_FILE: &str = "properties_data.json";

async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// One id per line.
pub async fn write_ids<'a, I>(path: &Path, ids: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a ListingId>,
{
    let mut contents = String::new();
    let mut count = 0;
    for id in ids {
        contents.push_str(id.as_str());
        contents.push('\n');
        count += 1;
    }

    ensure_parent(path).await?;
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write ids to {}", path.display()))?;

    info!(path = %path.display(), count, "💾 Saved listing ids");
    Ok(count)
}

/// Distinct ids of the file, lines trimmed, blank lines skipped.
pub async fn read_ids(path: &Path) -> Result<BTreeSet<ListingId>> {
    let contents = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read ids from {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ListingId::new)
        .collect())
}

/// Indented JSON object keyed by listing id.
pub async fn write_records(
    path: &Path,
    records: &BTreeMap<ListingId, PropertyRecord>,
) -> Result<()> {
    let mut json = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut json, PrettyFormatter::with_indent(b"    "));
    records
        .serialize(&mut serializer)
        .context("Failed to serialize property records")?;

    ensure_parent(path).await?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write records to {}", path.display()))?;

    info!(path = %path.display(), count = records.len(), "💾 Saved property records");
    Ok(())
}
