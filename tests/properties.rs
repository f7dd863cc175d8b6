//! Property-based tests for classification, filtering, aggregation and the ANOVA gate.

use std::collections::BTreeSet;

use proptest::prelude::*;

use bikeshare_dashboard::analysis::aggregate::aggregate_means;
use bikeshare_dashboard::analysis::anova::{one_way_anova, significance_test, TestOutcome, UncomputedReason};
use bikeshare_dashboard::data::filter::{filter, filter_day_type, filter_season_hour, FilteredView};
use bikeshare_dashboard::{
    DayType, DayTypeScope, GroupBy, HourRange, Measure, RentalDataset, RentalRecord, Season,
    Selection,
};

fn record() -> impl Strategy<Value = RentalRecord> {
    (1i64..=4, 0i64..=23, 0i64..=1, 0i64..=1, 0i64..500, 0i64..900).prop_map(
        |(season, hr, holiday, working, casual, registered)| {
            RentalRecord::from_codes(season, hr, holiday, working, casual, registered).unwrap()
        },
    )
}

fn dataset() -> impl Strategy<Value = RentalDataset> {
    prop::collection::vec(record(), 0..120).prop_map(RentalDataset::from_records)
}

fn selection() -> impl Strategy<Value = Selection> {
    (
        prop::sample::subsequence(Season::ALL.to_vec(), 0..=4),
        (0u8..=23, 0u8..=23),
        prop::sample::subsequence(DayType::ALL.to_vec(), 0..=3),
    )
        .prop_map(|(seasons, (a, b), day_types)| Selection {
            seasons: seasons.into_iter().collect(),
            hours: HourRange::new(a.min(b), a.max(b)).unwrap(),
            day_types: day_types.into_iter().collect(),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_classification_total_and_holiday_wins(holiday: bool, working: bool) {
        let t = DayType::classify(holiday, working);
        prop_assert!(DayType::ALL.contains(&t));
        if holiday {
            prop_assert_eq!(t, DayType::Holiday);
        }
    }

    #[test]
    fn prop_filtered_rows_satisfy_predicates(ds in dataset(), sel in selection()) {
        let view = filter_season_hour(&ds, &sel.seasons, sel.hours);
        for r in view.records(&ds) {
            prop_assert!(sel.seasons.contains(&r.season));
            prop_assert!(sel.hours.contains(r.hour));
        }
        // and nothing that satisfies them is dropped
        let expected = ds
            .records()
            .iter()
            .filter(|r| sel.seasons.contains(&r.season) && sel.hours.contains(r.hour))
            .count();
        prop_assert_eq!(view.len(), expected);

        let by_type = filter_day_type(&ds, &sel.day_types);
        for r in by_type.records(&ds) {
            prop_assert!(sel.day_types.contains(&r.day_type()));
        }
    }

    #[test]
    fn prop_filter_is_idempotent(ds in dataset(), sel in selection()) {
        let view = filter(&ds, &sel, GroupBy::DayType, DayTypeScope::SeasonAndHour);
        let subset: Vec<RentalRecord> = view.records(&ds).cloned().collect();
        let sub_ds = RentalDataset::from_records(subset);
        let again = filter(&sub_ds, &sel, GroupBy::DayType, DayTypeScope::SeasonAndHour);
        prop_assert_eq!(again, FilteredView::all(&sub_ds));
    }

    #[test]
    fn prop_aggregate_counts_are_conserved(ds in dataset(), sel in selection()) {
        for group_by in [GroupBy::Season, GroupBy::DayType] {
            let view = filter(&ds, &sel, group_by, DayTypeScope::FullDataset);
            let means = aggregate_means(&ds, &view, group_by);
            let total: usize = means.iter().map(|g| g.count).sum();
            prop_assert_eq!(total, view.len());
            for g in &means {
                prop_assert!(g.count > 0);
                prop_assert!(view.records(&ds).any(|r| group_by.key_of(r) == g.group));
            }
        }
    }

    #[test]
    fn prop_gate_and_p_value_range(ds in dataset(), sel in selection()) {
        let view = filter(&ds, &sel, GroupBy::Season, DayTypeScope::FullDataset);
        let selected: BTreeSet<Season> = sel.seasons.clone();
        for measure in Measure::ALL {
            match significance_test(&ds, &view, GroupBy::Season, selected.len(), measure) {
                TestOutcome::Computed(r) => {
                    prop_assert_eq!(selected.len(), 4);
                    prop_assert!(r.f_statistic.is_finite());
                    prop_assert!((0.0..=1.0).contains(&r.p_value));
                }
                TestOutcome::Uncomputed(UncomputedReason::IncompleteSelection { required, selected: n, .. }) => {
                    prop_assert_eq!(required, 4);
                    prop_assert!(n != 4);
                }
                TestOutcome::Uncomputed(UncomputedReason::InsufficientData { .. }) => {
                    prop_assert_eq!(selected.len(), 4);
                }
            }
        }
    }

    #[test]
    fn prop_anova_never_returns_nan(
        groups in prop::collection::vec(prop::collection::vec(0u32..50, 0..8), 0..5)
    ) {
        let groups: Vec<Vec<f64>> = groups
            .into_iter()
            .map(|g| g.into_iter().map(f64::from).collect())
            .collect();
        if let Ok(r) = one_way_anova(&groups) {
            prop_assert!(r.f_statistic.is_finite());
            prop_assert!(r.p_value.is_finite());
            prop_assert!((0.0..=1.0).contains(&r.p_value));
        }
    }
}
