use eframe::egui::{Color32, RichText, ScrollArea, Ui};

use bikeshare_dashboard::analysis::anova::TestOutcome;
use bikeshare_dashboard::{GroupBy, Measure, TabReport};

use crate::color::MeasureColors;
use crate::state::{AppState, Tab};
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Central panel – raw data and the two analysis tabs
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to begin  (File → Open…)");
        });
        return;
    };

    ui.heading("Rent Bike Analysis Dashboard");

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.show_raw {
                ui.strong("Raw data (season and hour filters)");
                tables::raw_table(ui, &dataset, &state.raw_view);
                ui.separator();
            }

            ui.horizontal(|ui: &mut Ui| {
                ui.selectable_value(&mut state.active_tab, Tab::Season, "Season Analysis");
                ui.selectable_value(&mut state.active_tab, Tab::DayType, "Day Type Analysis");
            });
            ui.separator();

            if let Some(report) = state.active_report() {
                report_view(ui, report, &state.colors);
            }
        });
}

fn dimension_title(group_by: GroupBy) -> &'static str {
    match group_by {
        GroupBy::Season => "Season",
        GroupBy::DayType => "Day Type",
    }
}

fn report_view(ui: &mut Ui, report: &TabReport, colors: &MeasureColors) {
    let dimension = dimension_title(report.group_by);

    ui.heading(format!("Average Rentals by {dimension}"));
    plot::group_means_chart(ui, report, colors);
    ui.add_space(8.0);

    ui.heading(format!("Summary Statistics ({dimension})"));
    match &report.summary {
        Some(summary) => tables::summary_table(ui, dimension, summary),
        None => {
            ui.label("No data for the current selection.");
        }
    }
    ui.add_space(8.0);

    ui.heading(format!("ANOVA Test for {dimension}"));
    for (measure, outcome) in &report.tests {
        let who = match measure {
            Measure::Casual => "Casual",
            Measure::Registered => "Registered",
        };
        match outcome {
            TestOutcome::Computed(result) => {
                ui.label(format!("ANOVA for {who} Users by {dimension}: {result}"));
            }
            TestOutcome::Uncomputed(reason) => {
                ui.label(RichText::new(format!("{who} users: {reason}")).color(Color32::YELLOW));
            }
        }
    }
}
