// src/process/window.rs

use chrono::{Duration, NaiveDate};
use tracing::info;

use super::date_parser::parse_cutoff_date;
use super::records::MetricRecord;
use crate::error::{LeaderboardError, Result};

/// How far back from the latest cutoff records are kept.
pub const WINDOW_DAYS: i64 = 90;

fn cutoff_date(cutoff: &str) -> Result<NaiveDate> {
    parse_cutoff_date(cutoff).ok_or_else(|| LeaderboardError::InvalidCutoff(cutoff.to_string()))
}

/// Oldest date still inside the window, anchored at the latest cutoff across
/// both lists. `None` when there are no records at all.
pub fn window_threshold(mase: &[MetricRecord], crps: &[MetricRecord]) -> Result<Option<NaiveDate>> {
    // cutoff strings sort chronologically
    let latest = mase.iter().chain(crps).map(|r| r.cutoff.as_str()).max();
    match latest {
        Some(c) => Ok(Some(cutoff_date(c)? - Duration::days(WINDOW_DAYS))),
        None => Ok(None),
    }
}

pub fn retain_since(records: Vec<MetricRecord>, threshold: NaiveDate) -> Result<Vec<MetricRecord>> {
    let mut kept = Vec::with_capacity(records.len());
    for r in records {
        if cutoff_date(&r.cutoff)? >= threshold {
            kept.push(r);
        }
    }
    Ok(kept)
}

/// Restrict both metric lists to the trailing window. A no-op when both are empty.
pub fn filter_recent(
    mase: Vec<MetricRecord>,
    crps: Vec<MetricRecord>,
) -> Result<(Vec<MetricRecord>, Vec<MetricRecord>)> {
    let Some(threshold) = window_threshold(&mase, &crps)? else {
        return Ok((mase, crps));
    };

    let (before_mase, before_crps) = (mase.len(), crps.len());
    let mase = retain_since(mase, threshold)?;
    let crps = retain_since(crps, threshold)?;
    info!(
        since = %threshold.format("%Y-%m-%d"),
        mase_before = before_mase,
        mase_after = mase.len(),
        crps_before = before_crps,
        crps_after = crps.len(),
        "filtered to last {} days",
        WINDOW_DAYS
    );
    Ok((mase, crps))
}
