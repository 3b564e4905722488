use std::collections::BTreeMap;

use psymap_core::models::clinical::Subscale;
use psymap_core::models::feedback::PredictionFeedbackRecord;
use serde::{Deserialize, Serialize};

/// Offline view of how predictions have fared against later measurements.
/// Read-only: nothing here feeds back into scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationSummary {
    pub count: usize,
    /// Mean of the per-record MAE.
    pub mae: f64,
    pub subscales: BTreeMap<Subscale, SubscaleCalibration>,
    pub segments: BTreeMap<String, SegmentCalibration>,
    pub model_versions: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubscaleCalibration {
    /// Mean signed delta; positive means the model under-predicts.
    pub bias: f64,
    pub mae: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentCalibration {
    pub count: usize,
    pub mae: f64,
}

pub fn summarize(records: &[PredictionFeedbackRecord]) -> CalibrationSummary {
    if records.is_empty() {
        return CalibrationSummary::default();
    }
    let n = records.len() as f64;

    let subscales = Subscale::ALL
        .into_iter()
        .map(|s| {
            let bias = records.iter().map(|r| r.delta.get(s)).sum::<f64>() / n;
            let mae = records.iter().map(|r| r.delta.get(s).abs()).sum::<f64>() / n;
            (s, SubscaleCalibration { bias, mae })
        })
        .collect();

    let mut grouped: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for r in records {
        let entry = grouped.entry(r.segment_tag.clone()).or_default();
        entry.0 += 1;
        entry.1 += r.mae;
    }
    let segments = grouped
        .into_iter()
        .map(|(tag, (count, total))| {
            (
                tag,
                SegmentCalibration {
                    count,
                    mae: total / count as f64,
                },
            )
        })
        .collect();

    let mut model_versions: Vec<u32> = records.iter().map(|r| r.model_version).collect();
    model_versions.sort_unstable();
    model_versions.dedup();

    CalibrationSummary {
        count: records.len(),
        mae: records.iter().map(|r| r.mae).sum::<f64>() / n,
        subscales,
        segments,
        model_versions,
    }
}
