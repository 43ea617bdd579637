// src/process/summary.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::records::MetricRecord;

/// Combined score for a model that was never ranked on either metric.
pub const UNRANKED_SCORE: f64 = 999.0;

/// Prefixes for the first three places: gold, silver, bronze.
pub const MEDALS: [&str; 3] = ["\u{1F947}", "\u{1F948}", "\u{1F949}"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub model: String,
    pub avg_mase: Option<f64>,
    pub avg_crps: Option<f64>,
    pub rank_mase: Option<f64>,
    pub rank_crps: Option<f64>,
}

/// Per-model mean value and mean rank for a single metric.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MetricStats {
    pub avg_metric: HashMap<String, Option<f64>>,
    pub avg_rank: HashMap<String, Option<f64>>,
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Rank the models present in a single record, 1 = lowest value. Equal values
/// keep the order of `models`.
pub fn rank_record<'a>(record: &MetricRecord, models: &'a [String]) -> Vec<(&'a str, usize)> {
    let mut present: Vec<(&str, f64)> = models
        .iter()
        .filter_map(|m| record.value(m).map(|v| (m.as_str(), v)))
        .collect();
    // stable
    present.sort_by(|a, b| a.1.total_cmp(&b.1));
    present
        .into_iter()
        .enumerate()
        .map(|(i, (m, _))| (m, i + 1))
        .collect()
}

pub fn metric_stats(records: &[MetricRecord], models: &[String]) -> MetricStats {
    let mut value_acc: HashMap<&str, (f64, usize)> = HashMap::new();
    let mut rank_acc: HashMap<&str, (f64, usize)> = HashMap::new();

    for r in records {
        for m in models {
            if let Some(v) = r.value(m) {
                let e = value_acc.entry(m.as_str()).or_default();
                e.0 += v;
                e.1 += 1;
            }
        }
        for (m, rank) in rank_record(r, models) {
            let e = rank_acc.entry(m).or_default();
            e.0 += rank as f64;
            e.1 += 1;
        }
    }

    let collect = |acc: &HashMap<&str, (f64, usize)>| {
        models
            .iter()
            .map(|m| {
                let avg = acc.get(m.as_str()).and_then(|&(s, n)| mean(s, n));
                (m.clone(), avg)
            })
            .collect::<HashMap<_, _>>()
    };

    MetricStats {
        avg_metric: collect(&value_acc),
        avg_rank: collect(&rank_acc),
    }
}

/// Mean of whichever rank means exist; `UNRANKED_SCORE` when neither does.
pub fn combined_score(rank_mase: Option<f64>, rank_crps: Option<f64>) -> f64 {
    let ranks: Vec<f64> = [rank_mase, rank_crps].into_iter().flatten().collect();
    mean(ranks.iter().sum::<f64>(), ranks.len()).unwrap_or(UNRANKED_SCORE)
}

/// Round to 3 decimals from the exact binary value, the way the decimal
/// formatter does it. Scaling by 1000 first would drift on values like 81/80.
pub fn round3(v: f64) -> f64 {
    format!("{:.3}", v).parse().unwrap_or(v)
}

/// Build the leaderboard: one entry per model, best combined rank first, with
/// the top three decorated.
pub fn compute_summary(
    mase: &[MetricRecord],
    crps: &[MetricRecord],
    models: &[String],
) -> Vec<SummaryEntry> {
    let mase_stats = metric_stats(mase, models);
    let crps_stats = metric_stats(crps, models);
    let get = |map: &HashMap<String, Option<f64>>, m: &str| map.get(m).copied().flatten();

    let mut scored: Vec<(f64, SummaryEntry)> = models
        .iter()
        .map(|m| {
            let rank_mase = get(&mase_stats.avg_rank, m);
            let rank_crps = get(&crps_stats.avg_rank, m);
            let entry = SummaryEntry {
                model: m.clone(),
                avg_mase: get(&mase_stats.avg_metric, m).map(round3),
                avg_crps: get(&crps_stats.avg_metric, m).map(round3),
                rank_mase: rank_mase.map(round3),
                rank_crps: rank_crps.map(round3),
            };
            (combined_score(rank_mase, rank_crps), entry)
        })
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    debug!(scores = ?scored.iter().map(|(s, e)| (e.model.as_str(), *s)).collect::<Vec<_>>(), "combined ranks");

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (_, mut entry))| {
            if let Some(medal) = MEDALS.get(i) {
                entry.model = format!("{} {}", medal, entry.model);
            }
            entry
        })
        .collect()
}
