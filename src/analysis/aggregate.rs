use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter::FilteredView;
use crate::data::model::{GroupBy, GroupKey, Measure, RentalDataset};

// ---------------------------------------------------------------------------
// Grouped means – one bar pair per group
// ---------------------------------------------------------------------------

/// Mean casual / registered rentals for one group present in a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeans {
    pub group: GroupKey,
    pub count: usize,
    pub mean_casual: f64,
    pub mean_registered: f64,
}

impl GroupMeans {
    pub fn mean(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Casual => self.mean_casual,
            Measure::Registered => self.mean_registered,
        }
    }
}

/// Per-group means, sorted by the natural order of the group key.
/// Groups with no records in the view are absent.
pub fn aggregate_means(
    dataset: &RentalDataset,
    view: &FilteredView,
    group_by: GroupBy,
) -> Vec<GroupMeans> {
    // key → (count, casual sum, registered sum)
    let mut acc: BTreeMap<GroupKey, (usize, u64, u64)> = BTreeMap::new();
    for r in view.records(dataset) {
        let e = acc.entry(group_by.key_of(r)).or_default();
        e.0 += 1;
        e.1 += r.casual as u64;
        e.2 += r.registered as u64;
    }
    acc.into_iter()
        .map(|(group, (count, casual, registered))| GroupMeans {
            group,
            count,
            mean_casual: casual as f64 / count as f64,
            mean_registered: registered as f64 / count as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// count / mean / std / min / quartiles / max of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n−1); undefined below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// `None` for an empty column.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        Some(ColumnSummary {
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: percentile_sorted(&sorted, 0.25),
            median: percentile_sorted(&sorted, 0.5),
            q75: percentile_sorted(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }

    /// Rows of the describe table, in display order.
    pub fn rows(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", Some(self.mean)),
            ("std", self.std),
            ("min", Some(self.min)),
            ("25%", Some(self.q25)),
            ("50%", Some(self.median)),
            ("75%", Some(self.q75)),
            ("max", Some(self.max)),
        ]
    }
}

/// Linear interpolation between order statistics at position `p·(n−1)`.
/// `sorted` must be non-empty and ascending.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Descriptive statistics for both measures of a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub casual: ColumnSummary,
    pub registered: ColumnSummary,
}

impl Summary {
    pub fn column(&self, measure: Measure) -> &ColumnSummary {
        match measure {
            Measure::Casual => &self.casual,
            Measure::Registered => &self.registered,
        }
    }
}

/// `None` when the view is empty ("no data").
pub fn describe(dataset: &RentalDataset, view: &FilteredView) -> Option<Summary> {
    let column = |m: Measure| -> Vec<f64> { view.records(dataset).map(|r| m.value(r)).collect() };
    Some(Summary {
        casual: ColumnSummary::compute(&column(Measure::Casual))?,
        registered: ColumnSummary::compute(&column(Measure::Registered))?,
    })
}
