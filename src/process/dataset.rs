// src/process/dataset.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::records::MetricRecord;
use super::summary::{compute_summary, SummaryEntry};
use super::window::filter_recent;
use crate::error::Result;

/// The document embedded in the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub models: Vec<String>,
    pub cutoffs: Vec<String>,
    pub subdatasets: Vec<String>,
    pub frequencies: Vec<String>,
    pub mase: Vec<MetricRecord>,
    pub crps: Vec<MetricRecord>,
    pub summary: Vec<SummaryEntry>,
}

fn unique_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Dataset {
    /// Package already-filtered records. The key domains come from these
    /// records only.
    pub fn assemble(
        models: Vec<String>,
        mase: Vec<MetricRecord>,
        crps: Vec<MetricRecord>,
        summary: Vec<SummaryEntry>,
    ) -> Self {
        let all = || mase.iter().chain(crps.iter());
        let cutoffs = unique_sorted(all().map(|r| r.cutoff.as_str()));
        let subdatasets = unique_sorted(all().map(|r| r.subdataset.as_str()));
        let frequencies = unique_sorted(all().map(|r| r.frequency.as_str()));
        Self {
            models,
            cutoffs,
            subdatasets,
            frequencies,
            mase,
            crps,
            summary,
        }
    }

    /// Window, summarize and assemble in one go.
    pub fn build(
        models: &[String],
        mase: Vec<MetricRecord>,
        crps: Vec<MetricRecord>,
    ) -> Result<Self> {
        let (mase, crps) = filter_recent(mase, crps)?;
        let summary = compute_summary(&mase, &crps, models);
        Ok(Self::assemble(models.to_vec(), mase, crps, summary))
    }

    /// Compact JSON with fields in declaration order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
