use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use super::model::{DayType, GroupBy, RentalDataset, RentalRecord, Season};

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("hour range {lo}-{hi} is invalid (need 0 <= lo <= hi <= 23)")]
    InvalidHourRange { lo: u8, hi: u8 },
}

// ---------------------------------------------------------------------------
// Selection state: what the user has ticked in the sidebar
// ---------------------------------------------------------------------------

/// Inclusive hour-of-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    lo: u8,
    hi: u8,
}

impl HourRange {
    pub const FULL_DAY: HourRange = HourRange { lo: 0, hi: 23 };

    pub fn new(lo: u8, hi: u8) -> Result<Self, SelectionError> {
        if lo > hi || hi > 23 {
            return Err(SelectionError::InvalidHourRange { lo, hi });
        }
        Ok(HourRange { lo, hi })
    }

    pub fn lo(&self) -> u8 {
        self.lo
    }

    pub fn hi(&self) -> u8 {
        self.hi
    }

    pub fn contains(&self, hour: u8) -> bool {
        (self.lo..=self.hi).contains(&hour)
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

/// Which predicates the day-type tab applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DayTypeScope {
    /// Day-type selection only, over the whole dataset.
    #[default]
    FullDataset,
    /// Season and hour selections first, then day type.
    SeasonAndHour,
}

/// Per-session selection. Never stored in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub seasons: BTreeSet<Season>,
    pub hours: HourRange,
    pub day_types: BTreeSet<DayType>,
}

impl Selection {
    /// Everything selected: the dashboard's initial state.
    pub fn all() -> Self {
        Selection {
            seasons: Season::ALL.into_iter().collect(),
            hours: HourRange::FULL_DAY,
            day_types: DayType::ALL.into_iter().collect(),
        }
    }

    /// Number of selected levels of the given dimension.
    pub fn selected_levels(&self, group_by: GroupBy) -> usize {
        match group_by {
            GroupBy::Season => self.seasons.len(),
            GroupBy::DayType => self.day_types.len(),
        }
    }

    pub fn toggle_season(&mut self, season: Season) {
        if !self.seasons.remove(&season) {
            self.seasons.insert(season);
        }
    }

    pub fn toggle_day_type(&mut self, day_type: DayType) {
        if !self.day_types.remove(&day_type) {
            self.day_types.insert(day_type);
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

// ---------------------------------------------------------------------------
// FilteredView – indices of the records passing a set of predicates
// ---------------------------------------------------------------------------

/// Row indices into a [`RentalDataset`], in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilteredView {
    indices: Vec<usize>,
}

impl FilteredView {
    /// Every record of the dataset.
    pub fn all(dataset: &RentalDataset) -> Self {
        FilteredView {
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the view against the dataset it was built from.
    pub fn records<'a>(
        &'a self,
        dataset: &'a RentalDataset,
    ) -> impl Iterator<Item = &'a RentalRecord> + 'a {
        self.indices.iter().filter_map(move |&i| dataset.get(i))
    }
}

fn scan<I, P>(dataset: &RentalDataset, candidates: I, pred: P) -> FilteredView
where
    I: Iterator<Item = usize>,
    P: Fn(&RentalRecord) -> bool,
{
    let indices = candidates
        .filter(|&i| dataset.get(i).is_some_and(&pred))
        .collect();
    FilteredView { indices }
}

/// Records whose season is selected and whose hour lies in `hours`.
///
/// An empty season set selects nothing.
pub fn filter_season_hour(
    dataset: &RentalDataset,
    seasons: &BTreeSet<Season>,
    hours: HourRange,
) -> FilteredView {
    scan(dataset, 0..dataset.len(), |r| {
        seasons.contains(&r.season) && hours.contains(r.hour)
    })
}

/// Records whose day type is selected, over the whole dataset.
pub fn filter_day_type(dataset: &RentalDataset, day_types: &BTreeSet<DayType>) -> FilteredView {
    scan(dataset, 0..dataset.len(), |r| day_types.contains(&r.day_type))
}

/// Narrow an existing view to the selected day types.
pub fn filter_day_type_within(
    view: &FilteredView,
    dataset: &RentalDataset,
    day_types: &BTreeSet<DayType>,
) -> FilteredView {
    scan(dataset, view.indices.iter().copied(), |r| {
        day_types.contains(&r.day_type)
    })
}

/// The view an analysis tab works on.
///
/// * Season tab: season + hour; the day-type selection is ignored.
/// * Day-type tab: depends on `scope`, see [`DayTypeScope`].
pub fn filter(
    dataset: &RentalDataset,
    selection: &Selection,
    group_by: GroupBy,
    scope: DayTypeScope,
) -> FilteredView {
    match (group_by, scope) {
        (GroupBy::Season, _) => filter_season_hour(dataset, &selection.seasons, selection.hours),
        (GroupBy::DayType, DayTypeScope::FullDataset) => {
            filter_day_type(dataset, &selection.day_types)
        }
        (GroupBy::DayType, DayTypeScope::SeasonAndHour) => {
            let base = filter_season_hour(dataset, &selection.seasons, selection.hours);
            filter_day_type_within(&base, dataset, &selection.day_types)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> RentalDataset {
        RentalDataset::from_records(vec![
            RentalRecord::from_codes(1, 5, 0, 1, 2, 10).unwrap(),
            RentalRecord::from_codes(1, 5, 0, 0, 5, 1).unwrap(),
            RentalRecord::from_codes(2, 10, 1, 0, 0, 0).unwrap(),
            RentalRecord::from_codes(4, 23, 0, 1, 7, 3).unwrap(),
        ])
    }

    #[test]
    fn hour_range_rejects_inverted_or_out_of_day() {
        assert!(HourRange::new(5, 4).is_err());
        assert!(HourRange::new(0, 24).is_err());
        let r = HourRange::new(5, 5).unwrap();
        assert!(r.contains(5));
        assert!(!r.contains(6));
    }

    #[test]
    fn season_hour_filter_applies_both_predicates() {
        let ds = dataset();
        let seasons = BTreeSet::from([Season::Spring, Season::Winter]);
        let view = filter_season_hour(&ds, &seasons, HourRange::new(0, 22).unwrap());
        assert_eq!(view.indices(), &[0, 1]);
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let ds = dataset();
        assert!(filter_season_hour(&ds, &BTreeSet::new(), HourRange::FULL_DAY).is_empty());
        assert!(filter_day_type(&ds, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn day_type_tab_ignores_season_selection_by_default() {
        let ds = dataset();
        let mut sel = Selection::all();
        sel.seasons = BTreeSet::from([Season::Spring]);
        sel.day_types = BTreeSet::from([DayType::WorkDay]);

        let full = filter(&ds, &sel, GroupBy::DayType, DayTypeScope::FullDataset);
        assert_eq!(full.indices(), &[0, 3]);

        let chained = filter(&ds, &sel, GroupBy::DayType, DayTypeScope::SeasonAndHour);
        assert_eq!(chained.indices(), &[0]);
    }

    #[test]
    fn season_tab_ignores_day_type_selection() {
        let ds = dataset();
        let mut sel = Selection::all();
        sel.day_types.clear();
        let view = filter(&ds, &sel, GroupBy::Season, DayTypeScope::SeasonAndHour);
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn toggles_flip_membership() {
        let mut sel = Selection::all();
        sel.toggle_season(Season::Fall);
        assert_eq!(sel.selected_levels(GroupBy::Season), 3);
        sel.toggle_season(Season::Fall);
        assert_eq!(sel.selected_levels(GroupBy::Season), 4);
        sel.toggle_day_type(DayType::Weekend);
        assert_eq!(sel.selected_levels(GroupBy::DayType), 2);
    }
}
