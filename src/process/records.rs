// src/process/records.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use super::raw_table::{RawTable, KEY_COLUMNS};
use crate::error::Result;

/// One row of a metric table, keyed by its grouping columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub subdataset: String,
    pub frequency: String,
    /// `YYYY-MM-DD-HH`
    pub cutoff: String,
    /// Per-model cell keyed by table header, in header order. Cells are the
    /// upstream numbers as sent; `null` marks a missing value.
    pub values: Map<String, Value>,
}

impl MetricRecord {
    pub fn new<I, K>(subdataset: &str, frequency: &str, cutoff: &str, values: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<f64>)>,
        K: Into<String>,
    {
        Self {
            subdataset: subdataset.to_string(),
            frequency: frequency.to_string(),
            cutoff: cutoff.to_string(),
            values: values
                .into_iter()
                .map(|(m, v)| (m.into(), v.map_or(Value::Null, Value::from)))
                .collect(),
        }
    }

    pub fn value(&self, model: &str) -> Option<f64> {
        self.values.get(model).and_then(Value::as_f64)
    }
}

/// Convert a validated table into records plus the model names its headers
/// claim. Values follow header order, not the configured model list.
#[instrument(level = "debug", skip(table), fields(rows = table.data.len()))]
pub fn normalize(table: &RawTable) -> Result<(Vec<MetricRecord>, Vec<String>)> {
    table.validate()?;
    let model_cols = table.model_columns().to_vec();

    let records = table
        .data
        .iter()
        .map(|row| {
            let key = |i: usize| row[i].as_str().unwrap_or_default().to_string();
            let values = model_cols
                .iter()
                .zip(&row[KEY_COLUMNS..])
                .map(|(model, cell)| (model.clone(), cell.clone()))
                .collect();
            MetricRecord {
                subdataset: key(0),
                frequency: key(1),
                cutoff: key(2),
                values,
            }
        })
        .collect::<Vec<_>>();

    debug!(records = records.len(), models = model_cols.len(), "normalized table");
    Ok((records, model_cols))
}

/// Log when a table's model columns disagree with the configured list.
pub fn warn_on_header_drift(metric: &str, model_cols: &[String], models: &[String]) {
    if model_cols != models {
        warn!(
            metric,
            header = ?model_cols,
            configured = ?models,
            "model columns differ from configured models"
        );
    }
}
