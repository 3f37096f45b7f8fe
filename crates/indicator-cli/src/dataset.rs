//! Dataset file handling

use anyhow::{Context, Result};
use indicator_store::{Dataset, InMemoryStore};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a dataset file into a fresh in-memory store.
///
/// kpictl has no commands that create factors or indicators, so the file
/// must already exist; portfolios are authored as JSON datasets.
pub async fn load(path: &Path) -> Result<InMemoryStore> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let dataset = Dataset::from_json(&json)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;

    debug!(
        indicators = dataset.indicators.len(),
        measurements = dataset.measurements.len(),
        "Dataset loaded"
    );

    InMemoryStore::from_dataset(dataset)
        .await
        .with_context(|| format!("dataset {} violates store rules", path.display()))
}

/// Write the store back to `path`, replacing the file atomically.
pub async fn save(store: &InMemoryStore, path: &Path) -> Result<()> {
    let json = store
        .snapshot()
        .await
        .to_json_pretty()
        .context("failed to serialize dataset")?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace dataset {}", path.display()))?;

    debug!(path = %path.display(), "Dataset saved");
    Ok(())
}
