use std::fmt;

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use thiserror::Error;

use crate::data::filter::FilteredView;
use crate::data::model::{GroupBy, Measure, RentalDataset};

/// Why a classical F test cannot be computed on the given groups.
#[derive(Debug, Clone, Error, PartialEq, Serialize)]
pub enum AnovaError {
    #[error("at least 2 groups are required, got {0}")]
    TooFewGroups(usize),
    #[error("group {group} has {size} observation(s), at least 2 are required")]
    GroupTooSmall { group: String, size: usize },
    #[error("all groups have zero within-group variance")]
    ZeroWithinVariance,
}

/// One-way ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub ss_between: f64,
    pub ss_within: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ms_between: f64,
    pub ms_within: f64,
}

impl fmt::Display for AnovaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "F-statistic = {:.5}, p-value = {:.5}",
            self.f_statistic, self.p_value
        )
    }
}

/// Classical one-way ANOVA over `groups`, one slice of observations each.
///
/// The p-value is the upper tail of F(k−1, n−k). Every group needs two or
/// more observations and the pooled within-group variance must be positive,
/// otherwise F is undefined and an error is returned instead of NaN/Inf.
pub fn one_way_anova<T: AsRef<[f64]>>(groups: &[T]) -> Result<AnovaResult, AnovaError> {
    let k = groups.len();
    if k < 2 {
        return Err(AnovaError::TooFewGroups(k));
    }
    for (i, g) in groups.iter().enumerate() {
        let size = g.as_ref().len();
        if size < 2 {
            return Err(AnovaError::GroupTooSmall {
                group: i.to_string(),
                size,
            });
        }
    }

    let n: usize = groups.iter().map(|g| g.as_ref().len()).sum();
    let grand_mean = groups
        .iter()
        .flat_map(|g| g.as_ref().iter())
        .sum::<f64>()
        / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let values = g.as_ref();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        ss_between += values.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = n - k;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    if ms_within <= 0.0 || !ms_within.is_finite() {
        return Err(AnovaError::ZeroWithinVariance);
    }

    let f_statistic = ms_between / ms_within;
    let p_value = match FisherSnedecor::new(df_between as f64, df_within as f64) {
        Ok(dist) => dist.sf(f_statistic).clamp(0.0, 1.0),
        // df are ≥ 1 here, so construction only fails on non-finite input
        Err(_) => return Err(AnovaError::ZeroWithinVariance),
    };

    Ok(AnovaResult {
        f_statistic,
        p_value,
        ss_between,
        ss_within,
        df_between,
        df_within,
        ms_between,
        ms_within,
    })
}

// ---------------------------------------------------------------------------
// Gated significance test: Computed | Uncomputed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UncomputedReason {
    /// Not every level of the dimension is selected.
    IncompleteSelection {
        dimension: GroupBy,
        required: usize,
        selected: usize,
    },
    /// The selection is complete but the filtered groups cannot support F.
    InsufficientData { detail: AnovaError },
}

impl fmt::Display for UncomputedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UncomputedReason::IncompleteSelection {
                dimension,
                required,
                selected,
            } => write!(
                f,
                "ANOVA test for {} requires all {required} categories ({selected} selected). \
                 Please select all {required}.",
                dimension.label()
            ),
            UncomputedReason::InsufficientData { detail } => {
                write!(f, "Insufficient data for test: {detail}")
            }
        }
    }
}

/// Result of a gated test. A skipped test is never a zero effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum TestOutcome {
    Computed(AnovaResult),
    Uncomputed(UncomputedReason),
}

impl TestOutcome {
    pub fn computed(&self) -> Option<&AnovaResult> {
        match self {
            TestOutcome::Computed(r) => Some(r),
            TestOutcome::Uncomputed(_) => None,
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Computed(r) => write!(f, "{r}"),
            TestOutcome::Uncomputed(reason) => write!(f, "{reason}"),
        }
    }
}

/// ANOVA of `measure` across every level of `group_by`, over `view`.
///
/// Runs only when `selected_levels` covers the whole dimension (4 seasons,
/// 3 day types).
pub fn significance_test(
    dataset: &RentalDataset,
    view: &FilteredView,
    group_by: GroupBy,
    selected_levels: usize,
    measure: Measure,
) -> TestOutcome {
    let levels = group_by.levels();
    if selected_levels != levels.len() {
        return TestOutcome::Uncomputed(UncomputedReason::IncompleteSelection {
            dimension: group_by,
            required: levels.len(),
            selected: selected_levels,
        });
    }

    let mut groups: Vec<Vec<f64>> = vec![Vec::new(); levels.len()];
    for r in view.records(dataset) {
        let key = group_by.key_of(r);
        if let Some(slot) = levels.iter().position(|l| *l == key) {
            groups[slot].push(measure.value(r));
        }
    }

    match one_way_anova(&groups) {
        Ok(result) => TestOutcome::Computed(result),
        Err(err) => {
            // Report the level name rather than its position.
            let detail = match err {
                AnovaError::GroupTooSmall { group, size } => AnovaError::GroupTooSmall {
                    group: group
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| levels.get(i))
                        .map(|l| l.to_string())
                        .unwrap_or(group),
                    size,
                },
                other => other,
            };
            log::warn!(
                "Skipping ANOVA of {} by {}: {detail}",
                measure.label(),
                group_by.label()
            );
            TestOutcome::Uncomputed(UncomputedReason::InsufficientData { detail })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RentalRecord;

    #[test]
    fn anova_basic_degrees_of_freedom() {
        let groups = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 3.0, 4.0, 5.0, 6.0],
            vec![3.0, 4.0, 5.0, 6.0, 7.0],
        ];
        let r = one_way_anova(&groups).unwrap();
        assert_eq!(r.df_between, 2);
        assert_eq!(r.df_within, 12);
        // means 3,4,5; ssb = 5*(1+0+1) = 10, ssw = 3*10 = 30
        assert!((r.ss_between - 10.0).abs() < 1e-12);
        assert!((r.ss_within - 30.0).abs() < 1e-12);
        assert!((r.f_statistic - 2.0).abs() < 1e-12);
        // scipy.stats.f_oneway gives p = 0.177979...
        assert!((r.p_value - 0.177_979).abs() < 1e-5, "p = {}", r.p_value);
    }

    #[test]
    fn anova_significant_difference() {
        let groups = [
            [1.0, 2.0, 3.0, 4.0, 5.0],
            [11.0, 12.0, 13.0, 14.0, 15.0],
            [21.0, 22.0, 23.0, 24.0, 25.0],
        ];
        let r = one_way_anova(&groups).unwrap();
        assert!(r.f_statistic > 100.0);
        assert!(r.p_value < 0.05);
        assert!((0.0..=1.0).contains(&r.p_value));
    }

    #[test]
    fn degenerate_inputs_are_errors_not_nan() {
        assert_eq!(
            one_way_anova(&[vec![1.0, 2.0]]),
            Err(AnovaError::TooFewGroups(1))
        );
        assert!(matches!(
            one_way_anova(&[vec![1.0, 2.0], vec![3.0]]),
            Err(AnovaError::GroupTooSmall { size: 1, .. })
        ));
        assert_eq!(
            one_way_anova(&[vec![1.0, 1.0], vec![3.0, 3.0]]),
            Err(AnovaError::ZeroWithinVariance)
        );
    }

    #[test]
    fn display_uses_five_decimals() {
        let r = one_way_anova(&[vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]]).unwrap();
        let s = TestOutcome::Computed(r).to_string();
        assert!(s.starts_with("F-statistic = 1.50000, p-value = 0."), "{s}");
    }

    #[test]
    fn gate_requires_every_level() {
        let ds = RentalDataset::from_records(vec![RentalRecord::from_codes(1, 0, 0, 1, 1, 1).unwrap()]);
        let view = FilteredView::all(&ds);
        let out = significance_test(&ds, &view, GroupBy::Season, 3, Measure::Casual);
        assert_eq!(
            out,
            TestOutcome::Uncomputed(UncomputedReason::IncompleteSelection {
                dimension: GroupBy::Season,
                required: 4,
                selected: 3,
            })
        );
        assert!(out.to_string().contains("requires all 4 categories"));
    }

    #[test]
    fn complete_selection_with_thin_groups_reports_insufficient_data() {
        let ds = RentalDataset::from_records(vec![
            RentalRecord::from_codes(1, 0, 0, 1, 1, 1).unwrap(),
            RentalRecord::from_codes(1, 1, 0, 1, 2, 1).unwrap(),
        ]);
        let view = FilteredView::all(&ds);
        let out = significance_test(&ds, &view, GroupBy::Season, 4, Measure::Casual);
        match out {
            TestOutcome::Uncomputed(UncomputedReason::InsufficientData {
                detail: AnovaError::GroupTooSmall { group, size },
            }) => {
                assert_eq!(group, "2 (Summer)");
                assert_eq!(size, 0);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
