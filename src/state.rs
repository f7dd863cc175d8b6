use std::path::{Path, PathBuf};
use std::sync::Arc;

use bikeshare_dashboard::analysis::report::TabReport;
use bikeshare_dashboard::data::filter::{filter_season_hour, FilteredView};
use bikeshare_dashboard::data::loader::load_file;
use bikeshare_dashboard::{DayType, DayTypeScope, GroupBy, HourRange, RentalDataset, Season, Selection};

use crate::color::MeasureColors;

/// Analysis tab shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Season,
    DayType,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Never mutated.
    pub dataset: Option<Arc<RentalDataset>>,

    /// Path the dataset came from.
    pub source: Option<PathBuf>,

    /// Sidebar selection for this session.
    pub selection: Selection,

    /// Whether the day-type tab also honours the season / hour selection.
    pub scope: DayTypeScope,

    /// Season + hour view, shown as the raw data table.
    pub raw_view: FilteredView,

    /// Per-tab outputs for the current selection.
    pub season_report: Option<TabReport>,
    pub day_type_report: Option<TabReport>,

    pub show_raw: bool,
    pub active_tab: Tab,
    pub colors: MeasureColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(selection: Selection, scope: DayTypeScope) -> Self {
        Self {
            dataset: None,
            source: None,
            selection,
            scope,
            raw_view: FilteredView::default(),
            season_report: None,
            day_type_report: None,
            show_raw: false,
            active_tab: Tab::Season,
            colors: MeasureColors::default(),
            status_message: None,
        }
    }

    /// Load a file; on failure keep the current dataset and show the error.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and recompute every view.
    pub fn set_dataset(&mut self, dataset: RentalDataset) {
        self.dataset = Some(Arc::new(dataset));
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild the raw view and both reports from the current selection.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.raw_view = filter_season_hour(ds, &self.selection.seasons, self.selection.hours);
        self.season_report = Some(TabReport::build(ds, &self.selection, GroupBy::Season, self.scope));
        self.day_type_report = Some(TabReport::build(ds, &self.selection, GroupBy::DayType, self.scope));
    }

    pub fn active_report(&self) -> Option<&TabReport> {
        match self.active_tab {
            Tab::Season => self.season_report.as_ref(),
            Tab::DayType => self.day_type_report.as_ref(),
        }
    }

    pub fn toggle_season(&mut self, season: Season) {
        self.selection.toggle_season(season);
        self.recompute();
    }

    pub fn toggle_day_type(&mut self, day_type: DayType) {
        self.selection.toggle_day_type(day_type);
        self.recompute();
    }

    /// Set the hour window; an inverted pair is reordered.
    pub fn set_hours(&mut self, lo: u8, hi: u8) {
        match HourRange::new(lo.min(hi), lo.max(hi)) {
            Ok(range) if range != self.selection.hours => {
                self.selection.hours = range;
                self.recompute();
            }
            Ok(_) => {}
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    pub fn set_scope(&mut self, scope: DayTypeScope) {
        if scope != self.scope {
            self.scope = scope;
            self.recompute();
        }
    }

    /// Select every season.
    pub fn select_all_seasons(&mut self) {
        self.selection.seasons = Season::ALL.into_iter().collect();
        self.recompute();
    }

    /// Deselect every season.
    pub fn select_no_seasons(&mut self) {
        self.selection.seasons.clear();
        self.recompute();
    }
}
