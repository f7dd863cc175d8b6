use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use bikeshare_dashboard::analysis::aggregate::Summary;
use bikeshare_dashboard::analysis::report::fmt_cell;
use bikeshare_dashboard::data::filter::FilteredView;
use bikeshare_dashboard::RentalDataset;

const ROW_HEIGHT: f32 = 18.0;

const RAW_HEADERS: [&str; 7] = [
    "season",
    "hr",
    "holiday",
    "workingday",
    "day type",
    "casual",
    "registered",
];

/// Filtered records, virtualised so large views stay cheap to draw.
pub fn raw_table(ui: &mut Ui, dataset: &RentalDataset, view: &FilteredView) {
    ui.label(format!("{} rows", view.len()));
    let indices = view.indices();

    ui.push_id("raw_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(260.0)
            .columns(Column::auto().at_least(64.0), RAW_HEADERS.len())
            .header(20.0, |mut header| {
                for h in RAW_HEADERS {
                    header.col(|ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, indices.len(), |mut row| {
                    let Some(r) = indices.get(row.index()).and_then(|&i| dataset.get(i)) else {
                        return;
                    };
                    let cells = [
                        r.season.code().to_string(),
                        r.hour.to_string(),
                        u8::from(r.holiday).to_string(),
                        u8::from(r.working_day).to_string(),
                        r.day_type.to_string(),
                        r.casual.to_string(),
                        r.registered.to_string(),
                    ];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

/// pandas-style describe table: one row per statistic, one column per measure.
pub fn summary_table(ui: &mut Ui, id: &str, summary: &Summary) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(60.0))
            .columns(Column::auto().at_least(100.0), 2)
            .header(20.0, |mut header| {
                for h in ["", "casual", "registered"] {
                    header.col(|ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|mut body| {
                for ((label, casual), (_, registered)) in
                    summary.casual.rows().into_iter().zip(summary.registered.rows())
                {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(label);
                        });
                        row.col(|ui| {
                            ui.monospace(fmt_cell(casual));
                        });
                        row.col(|ui| {
                            ui.monospace(fmt_cell(registered));
                        });
                    });
                }
            });
    });
}
