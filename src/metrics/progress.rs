//! Progress deltas
//!
//! Compares the latest progress entry with the one before it.

use serde::{Deserialize, Serialize};

use crate::models::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
    Neutral,
}

/// Absolute change between two readings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub value: f64,
    pub direction: ChangeDirection,
    /// Relative to the previous reading; 0 when the previous reading is 0
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementChange {
    pub part: String,
    pub change: Change,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub entry_count: usize,
    pub latest: Option<Progress>,
    pub previous: Option<Progress>,
    pub weight_change: Option<Change>,
    pub body_fat_change: Option<Change>,
    pub measurement_changes: Vec<MeasurementChange>,
}

pub fn change(current: f64, previous: f64) -> Change {
    let delta = current - previous;
    let direction = if delta > 0.0 {
        ChangeDirection::Up
    } else if delta < 0.0 {
        ChangeDirection::Down
    } else {
        ChangeDirection::Neutral
    };
    let percentage = if previous == 0.0 {
        0.0
    } else {
        (delta / previous * 100.0).abs()
    };

    Change {
        value: delta.abs(),
        direction,
        percentage,
    }
}

/// Summarize entries in any order; they are sorted by date first
pub fn summarize(entries: &[Progress]) -> ProgressSummary {
    let mut ordered: Vec<&Progress> = entries.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    let latest = ordered.last().copied();
    let previous = ordered.len().checked_sub(2).map(|i| ordered[i]);

    let (weight_change, body_fat_change, measurement_changes) = match (latest, previous) {
        (Some(cur), Some(prev)) => {
            let parts = cur
                .measurements
                .parts()
                .iter()
                .zip(prev.measurements.parts().iter())
                .map(|((part, now), (_, before))| MeasurementChange {
                    part: part.to_string(),
                    change: change(*now, *before),
                })
                .collect();
            (
                Some(change(cur.weight, prev.weight)),
                Some(change(cur.body_fat, prev.body_fat)),
                parts,
            )
        }
        _ => (None, None, Vec::new()),
    };

    ProgressSummary {
        entry_count: entries.len(),
        latest: latest.cloned(),
        previous: previous.cloned(),
        weight_change,
        body_fat_change,
        measurement_changes,
    }
}
