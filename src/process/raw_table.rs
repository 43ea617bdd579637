// src/process/raw_table.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LeaderboardError, Result};

/// Number of leading grouping columns: subdataset, frequency, cutoff.
pub const KEY_COLUMNS: usize = 3;

/// A dataframe as the dashboard ships it: a header row plus row-major cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// Grouping cells are strings; model cells are numbers or `null`.
    pub data: Vec<Vec<Value>>,
}

impl RawTable {
    /// Accepts any JSON object with `headers` and `data` keys. Returns `None`
    /// when either key is missing or has the wrong shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if !obj.contains_key("headers") || !obj.contains_key("data") {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Header names after the grouping columns.
    pub fn model_columns(&self) -> &[String] {
        self.headers.get(KEY_COLUMNS..).unwrap_or(&[])
    }

    /// Checks every row against the header layout before it is trusted.
    pub fn validate(&self) -> Result<()> {
        if self.headers.len() < KEY_COLUMNS {
            return Err(LeaderboardError::InvalidTable(format!(
                "expected at least {} columns, got {}",
                KEY_COLUMNS,
                self.headers.len()
            )));
        }
        for (i, row) in self.data.iter().enumerate() {
            if row.len() != self.headers.len() {
                return Err(LeaderboardError::InvalidTable(format!(
                    "row {} has {} cells, header has {}",
                    i,
                    row.len(),
                    self.headers.len()
                )));
            }
            if let Some(bad) = row[..KEY_COLUMNS].iter().position(|c| !c.is_string()) {
                return Err(LeaderboardError::InvalidTable(format!(
                    "row {} column '{}' is not a string",
                    i, self.headers[bad]
                )));
            }
            if let Some(bad) = row[KEY_COLUMNS..]
                .iter()
                .position(|c| !(c.is_number() || c.is_null()))
            {
                return Err(LeaderboardError::InvalidTable(format!(
                    "row {} column '{}' is neither a number nor null",
                    i,
                    self.headers[KEY_COLUMNS + bad]
                )));
            }
        }
        Ok(())
    }
}
