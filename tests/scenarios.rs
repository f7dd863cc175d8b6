//! End-to-end scenarios over small hand-written datasets.

use std::collections::BTreeSet;

use bikeshare_dashboard::analysis::aggregate::{aggregate_means, describe};
use bikeshare_dashboard::analysis::anova::{significance_test, TestOutcome, UncomputedReason};
use bikeshare_dashboard::data::filter::{filter, filter_day_type, filter_season_hour};
use bikeshare_dashboard::data::model::GroupKey;
use bikeshare_dashboard::{
    DayType, DayTypeScope, GroupBy, HourRange, Measure, RentalDataset, RentalRecord, Season,
    Selection, TabReport,
};

fn three_records() -> RentalDataset {
    RentalDataset::from_records(vec![
        RentalRecord::from_codes(1, 5, 0, 1, 2, 10).unwrap(),
        RentalRecord::from_codes(1, 5, 0, 0, 5, 1).unwrap(),
        RentalRecord::from_codes(2, 10, 1, 0, 0, 0).unwrap(),
    ])
}

#[test]
fn three_record_classification() {
    let ds = three_records();
    let types: Vec<DayType> = ds.records().iter().map(|r| r.day_type()).collect();
    assert_eq!(types, vec![DayType::WorkDay, DayType::Weekend, DayType::Holiday]);
}

#[test]
fn three_record_season_filter_and_means() {
    let ds = three_records();
    let view = filter_season_hour(&ds, &BTreeSet::from([Season::Spring]), HourRange::FULL_DAY);
    assert_eq!(view.indices(), &[0, 1]);

    let means = aggregate_means(&ds, &view, GroupBy::Season);
    assert_eq!(means.len(), 1);
    assert_eq!(means[0].group, GroupKey::Season(Season::Spring));
    assert_eq!(means[0].count, 2);
    assert!((means[0].mean_casual - 3.5).abs() < 1e-12);
    assert!((means[0].mean_registered - 5.5).abs() < 1e-12);

    let summary = describe(&ds, &view).unwrap();
    assert_eq!(summary.casual.count, 2);
    assert!((summary.casual.min - 2.0).abs() < 1e-12);
    assert!((summary.registered.max - 10.0).abs() < 1e-12);
}

#[test]
fn empty_day_type_selection() {
    let ds = three_records();
    let view = filter_day_type(&ds, &BTreeSet::new());
    assert!(view.is_empty());
    assert!(aggregate_means(&ds, &view, GroupBy::DayType).is_empty());

    for measure in Measure::ALL {
        let outcome = significance_test(&ds, &view, GroupBy::DayType, 0, measure);
        assert_eq!(
            outcome,
            TestOutcome::Uncomputed(UncomputedReason::IncompleteSelection {
                dimension: GroupBy::DayType,
                required: 3,
                selected: 0,
            })
        );
    }
}

#[test]
fn three_seasons_selected_is_an_advisory_not_a_statistic() {
    let ds = three_records();
    let mut sel = Selection::all();
    sel.seasons = BTreeSet::from([Season::Spring, Season::Summer, Season::Fall]);
    let tab = TabReport::build(&ds, &sel, GroupBy::Season, DayTypeScope::FullDataset);
    for (_, outcome) in &tab.tests {
        assert!(outcome.computed().is_none());
        assert!(outcome.to_string().contains("requires all 4 categories"));
    }
}

/// Two observations with spread in every season, so the season test can run.
fn balanced() -> RentalDataset {
    let mut records = Vec::new();
    for season in 1..=4i64 {
        for k in 0..3i64 {
            records.push(
                RentalRecord::from_codes(season, 6 + k, 0, k % 2, season * 4 + k, 100 - season * 7 + k * 2)
                    .unwrap(),
            );
        }
    }
    RentalDataset::from_records(records)
}

#[test]
fn all_four_seasons_yield_f_and_p() {
    let ds = balanced();
    let sel = Selection::all();
    let view = filter(&ds, &sel, GroupBy::Season, DayTypeScope::FullDataset);
    for measure in Measure::ALL {
        match significance_test(&ds, &view, GroupBy::Season, 4, measure) {
            TestOutcome::Computed(r) => {
                assert!(r.f_statistic.is_finite() && r.f_statistic >= 0.0);
                assert!((0.0..=1.0).contains(&r.p_value));
                assert_eq!(r.df_between, 3);
                assert_eq!(r.df_within, ds.len() - 4);
            }
            other => panic!("expected a statistic, got {other:?}"),
        }
    }
}

#[test]
fn hour_restriction_still_applies_to_the_season_test() {
    let ds = balanced();
    let mut sel = Selection::all();
    // hours 6..=7 keep two rows per season
    sel.hours = HourRange::new(6, 7).unwrap();
    let tab = TabReport::build(&ds, &sel, GroupBy::Season, DayTypeScope::FullDataset);
    assert_eq!(tab.rows, 8);
    let r = tab.tests[0].1.computed().expect("season test should run");
    assert_eq!(r.df_within, 4);

    // a single hour leaves one row per season: reported, not NaN
    sel.hours = HourRange::new(6, 6).unwrap();
    let tab = TabReport::build(&ds, &sel, GroupBy::Season, DayTypeScope::FullDataset);
    assert!(matches!(
        tab.tests[0].1,
        TestOutcome::Uncomputed(UncomputedReason::InsufficientData { .. })
    ));
    assert!(tab.tests[0].1.to_string().starts_with("Insufficient data for test"));
}
