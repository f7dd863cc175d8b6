use std::fmt::Write as _;

use serde::Serialize;

use super::aggregate::{aggregate_means, describe, GroupMeans, Summary};
use super::anova::{significance_test, TestOutcome};
use crate::data::filter::{filter, DayTypeScope, FilteredView, Selection};
use crate::data::model::{GroupBy, Measure, RentalDataset};

/// Everything one analysis tab displays, recomputed from scratch per selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabReport {
    pub group_by: GroupBy,
    #[serde(skip)]
    pub view: FilteredView,
    pub rows: usize,
    /// `None` when the view is empty: skip the chart.
    pub means: Option<Vec<GroupMeans>>,
    /// `None` when the view is empty: skip the table.
    pub summary: Option<Summary>,
    pub tests: Vec<(Measure, TestOutcome)>,
}

impl TabReport {
    pub fn build(
        dataset: &RentalDataset,
        selection: &Selection,
        group_by: GroupBy,
        scope: DayTypeScope,
    ) -> Self {
        let view = filter(dataset, selection, group_by, scope);
        let selected = selection.selected_levels(group_by);

        let means = (!view.is_empty()).then(|| aggregate_means(dataset, &view, group_by));
        let summary = describe(dataset, &view);
        let tests = Measure::ALL
            .into_iter()
            .map(|m| (m, significance_test(dataset, &view, group_by, selected, m)))
            .collect();

        log::debug!(
            "Recomputed {} tab: {} of {} rows",
            group_by.label(),
            view.len(),
            dataset.len()
        );

        TabReport {
            group_by,
            rows: view.len(),
            view,
            means,
            summary,
            tests,
        }
    }

    /// "No data": nothing survived filtering.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn title(&self) -> &'static str {
        match self.group_by {
            GroupBy::Season => "Season Analysis",
            GroupBy::DayType => "Day Type Analysis",
        }
    }

    /// Plain-text rendering for the headless report mode.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "== {} ({} rows) ==", self.title(), self.rows);

        match &self.means {
            None => {
                let _ = writeln!(out, "No data for the current selection.");
            }
            Some(means) => {
                let _ = writeln!(out, "\nAverage rentals by {}:", self.group_by.label());
                let _ = writeln!(out, "{:<16} {:>7} {:>12} {:>12}", "group", "rows", "casual", "registered");
                for g in means {
                    let _ = writeln!(
                        out,
                        "{:<16} {:>7} {:>12.3} {:>12.3}",
                        g.group.to_string(),
                        g.count,
                        g.mean_casual,
                        g.mean_registered
                    );
                }
            }
        }

        if let Some(summary) = &self.summary {
            let _ = writeln!(out, "\nSummary statistics:");
            let _ = writeln!(out, "{:<8} {:>12} {:>12}", "", "casual", "registered");
            for ((label, c), (_, r)) in summary.casual.rows().into_iter().zip(summary.registered.rows()) {
                let _ = writeln!(out, "{label:<8} {:>12} {:>12}", fmt_cell(c), fmt_cell(r));
            }
        }

        let _ = writeln!(out, "\nANOVA by {}:", self.group_by.label());
        for (measure, outcome) in &self.tests {
            let _ = writeln!(out, "  {:<11} {outcome}", measure.label());
        }
        out
    }
}

/// Describe-table cell; an undefined statistic prints as `NaN`.
pub fn fmt_cell(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.3}"),
        None => "NaN".to_string(),
    }
}

/// Both tabs for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub selection: Selection,
    pub scope: DayTypeScope,
    pub season: TabReport,
    pub day_type: TabReport,
}

impl DashboardReport {
    pub fn build(dataset: &RentalDataset, selection: &Selection, scope: DayTypeScope) -> Self {
        DashboardReport {
            selection: selection.clone(),
            scope,
            season: TabReport::build(dataset, selection, GroupBy::Season, scope),
            day_type: TabReport::build(dataset, selection, GroupBy::DayType, scope),
        }
    }

    pub fn to_text(&self) -> String {
        format!("{}\n{}", self.season.to_text(), self.day_type.to_text())
    }
}
