// src/fetch/mase.rs

use serde_json::Value;
use tracing::{info, instrument};

use super::Transport;
use crate::config::Config;
use crate::error::{LeaderboardError, Result};
use crate::process::RawTable;

/// The per-model MASE table has 3 key columns plus the models; the summary
/// widget in the same payload is much narrower.
pub const MIN_MASE_COLUMNS: usize = 15;

fn component_kind(comp: &Value) -> Option<&str> {
    ["component", "type"]
        .iter()
        .filter_map(|k| comp.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// Pick the first dataframe component wide enough to be the MASE table.
pub fn find_mase_table(config: &Value) -> Option<RawTable> {
    config
        .get("components")?
        .as_array()?
        .iter()
        .filter(|comp| component_kind(comp) == Some("dataframe"))
        .filter_map(|comp| comp.pointer("/props/value").and_then(RawTable::from_value))
        .find(|table| table.headers.len() >= MIN_MASE_COLUMNS)
}

#[instrument(level = "info", skip_all)]
pub async fn fetch_mase(transport: &dyn Transport, config: &Config) -> Result<RawTable> {
    let url = config.config_url()?;
    info!(%url, "fetching MASE data");
    let body = transport.get_text(&url).await?;
    let payload: Value = serde_json::from_str(&body)?;

    let table = find_mase_table(&payload).ok_or(LeaderboardError::DataNotFound)?;
    info!(
        rows = table.data.len(),
        columns = table.headers.len(),
        "found MASE table"
    );
    Ok(table)
}
