use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use bikeshare_dashboard::{DayType, DayTypeScope, Season};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Seasons ----
            let header_text = format!("Season(s)  ({}/{})", state.selection.seasons.len(), Season::ALL.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("seasons")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_seasons();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_seasons();
                        }
                    });

                    for season in Season::ALL {
                        let mut label = RichText::new(season.to_string());
                        if !dataset.seasons().contains(&season) {
                            label = label.color(Color32::GRAY);
                        }
                        let mut checked = state.selection.seasons.contains(&season);
                        if ui.checkbox(&mut checked, label).changed() {
                            state.toggle_season(season);
                        }
                    }
                });
            ui.separator();

            // ---- Hour of day ----
            ui.strong("Hour of the day");
            let mut lo = state.selection.hours.lo();
            let mut hi = state.selection.hours.hi();
            let from = ui.add(egui::Slider::new(&mut lo, 0..=23).text("from"));
            let to = ui.add(egui::Slider::new(&mut hi, 0..=23).text("to"));
            if from.changed() || to.changed() {
                state.set_hours(lo, hi);
            }
            ui.separator();

            ui.checkbox(&mut state.show_raw, "Show raw data");
            ui.separator();

            // ---- Day types ----
            let header_text = format!("Day type(s)  ({}/{})", state.selection.day_types.len(), DayType::ALL.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("day_types")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for day_type in DayType::ALL {
                        let mut checked = state.selection.day_types.contains(&day_type);
                        if ui.checkbox(&mut checked, day_type.label()).changed() {
                            state.toggle_day_type(day_type);
                        }
                    }
                });

            let mut chained = state.scope == DayTypeScope::SeasonAndHour;
            if ui
                .checkbox(&mut chained, "Apply season/hour to day types")
                .on_hover_text("Off: the day-type tab filters the full dataset by day type only.")
                .changed()
            {
                state.set_scope(if chained {
                    DayTypeScope::SeasonAndHour
                } else {
                    DayTypeScope::FullDataset
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let source = state
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} records loaded, {} in season/hour view",
                ds.len(),
                state.raw_view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bike rental data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
