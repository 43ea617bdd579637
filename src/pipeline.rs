// src/pipeline.rs

use std::fs;
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::fetch::{fetch_crps, fetch_mase, Sleeper, Transport};
use crate::process::{normalize, records::warn_on_header_drift, Dataset};

/// Fetch both metrics, then normalize, window and summarize them.
#[instrument(level = "info", skip_all)]
pub async fn collect_dataset(
    transport: &dyn Transport,
    sleeper: &dyn Sleeper,
    config: &Config,
) -> Result<Dataset> {
    let mase_raw = fetch_mase(transport, config).await?;
    let crps_raw = fetch_crps(transport, sleeper, config).await?;

    let (mase, mase_cols) = normalize(&mase_raw)?;
    let (crps, crps_cols) = normalize(&crps_raw)?;
    warn_on_header_drift("mase", &mase_cols, &config.models);
    warn_on_header_drift("crps", &crps_cols, &config.models);

    Dataset::build(&config.models, mase, crps)
}

/// Write the dataset to `data/leaderboard.json`, creating the directory if
/// needed. Returns the file size.
pub fn write_dataset(config: &Config, dataset: &Dataset) -> Result<u64> {
    let path = config.data_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&path, dataset.to_json()?)?;
    let size = fs::metadata(&path)?.len();

    info!(path = %path.display(), bytes = size, "saved dataset");
    info!(
        models = dataset.models.len(),
        cutoffs = dataset.cutoffs.len(),
        mase_rows = dataset.mase.len(),
        crps_rows = dataset.crps.len(),
        "dataset summary"
    );
    Ok(size)
}
