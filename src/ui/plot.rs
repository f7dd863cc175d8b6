use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use bikeshare_dashboard::{GroupBy, Measure, TabReport};

use crate::color::MeasureColors;

const BAR_WIDTH: f64 = 0.35;

// ---------------------------------------------------------------------------
// Grouped-mean bar chart (central panel)
// ---------------------------------------------------------------------------

/// Casual and registered means side by side, one slot per group.
pub fn group_means_chart(ui: &mut Ui, report: &TabReport, colors: &MeasureColors) {
    let Some(means) = &report.means else {
        ui.label("No data for the current selection.");
        return;
    };

    let labels: Vec<String> = means.iter().map(|g| g.group.to_string()).collect();

    let charts: Vec<BarChart> = Measure::ALL
        .into_iter()
        .enumerate()
        .map(|(j, measure)| {
            let offset = (j as f64 - 0.5) * BAR_WIDTH;
            let bars = means
                .iter()
                .zip(&labels)
                .enumerate()
                .map(|(i, (g, label))| {
                    Bar::new(i as f64 + offset, g.mean(measure))
                        .width(BAR_WIDTH)
                        .name(label)
                })
                .collect();
            BarChart::new(bars)
                .name(measure.label())
                .color(colors.color_for(measure))
        })
        .collect();

    let x_label = match report.group_by {
        GroupBy::Season => "Season (1=Spring, 2=Summer, 3=Fall, 4=Winter)",
        GroupBy::DayType => "Day Type",
    };

    Plot::new(format!("group_means_{}", report.group_by.label()))
        .legend(Legend::default())
        .height(320.0)
        .x_axis_label(x_label)
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
