//! FILENAME: tests/aggregate_properties.rs
//! Generated record sets and filters checked against the grouping laws:
//! every group is backed by matching records, narrowing a filter never adds
//! a group, and aggregation is repeatable.

use proptest::prelude::*;

use aggregate_engine::{
    aggregate, compile, Dimension, FilterClause, FilterState, GroupSpec, Measure, Metric,
};
use dataset::{AgeBands, Dataset, Record, RegionTable, Season};

const GENDERS: [&str; 2] = ["Male", "Female"];
const LOCATIONS: [&str; 4] = ["Texas", "Ohio", "California", "Atlantis"];
const CODES: [&str; 3] = ["TX", "OH", "CA"];
const ITEMS: [(&str, &str); 4] = [
    ("Hat", "Accessories"),
    ("Hat", "Clothing"),
    ("Coat", "Outerwear"),
    ("Boots", "Footwear"),
];
const CLAUSES: [FilterClause; 3] = [FilterClause::Season, FilterClause::Region, FilterClause::Gender];

// ============================================================================
// STRATEGIES
// ============================================================================

fn arb_record() -> impl Strategy<Value = Record> {
    (
        prop::sample::select(GENDERS.to_vec()),
        prop::sample::select(LOCATIONS.to_vec()),
        prop::sample::select(Season::ALL.to_vec()),
        prop::sample::select(ITEMS.to_vec()),
        10u32..85,
        10u32..=50,
        0u32..50,
    )
        .prop_map(|(gender, location, season, (item, category), age, rating, previous)| {
            Record::new(gender, location, season, item, category)
                .with_age(age)
                .with_rating(f64::from(rating) / 10.0)
                .with_previous_purchases(previous)
        })
}

fn arb_dataset() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(arb_record(), 0..40)
}

fn arb_spec() -> impl Strategy<Value = GroupSpec> {
    prop::sample::select(vec![
        vec![Dimension::Region, Dimension::Season],
        vec![Dimension::Gender, Dimension::AgeBand],
        vec![Dimension::Item, Dimension::Category],
        vec![Dimension::Region, Dimension::RegionCode],
        vec![Dimension::Season, Dimension::Item],
    ])
    .prop_map(|dimensions| {
        GroupSpec::new(
            dimensions,
            vec![
                Measure::mean(Metric::ReviewRating),
                Measure::sum(Metric::PreviousPurchases),
            ],
        )
        .unwrap()
    })
}

fn apply_region(state: FilterState, region: Option<&str>) -> FilterState {
    match region {
        Some(code) => state.with_region(code),
        None => state,
    }
}

/// A wide filter and a narrow one whose seasons and genders are subsets of
/// the wide ones and whose region is the same or newly pinned.
fn arb_nested_filters() -> impl Strategy<Value = (FilterState, FilterState)> {
    (
        prop::collection::vec(any::<(bool, bool)>(), Season::ALL.len()),
        prop::collection::vec(any::<(bool, bool)>(), GENDERS.len()),
        prop::option::of(prop::sample::select(CODES.to_vec())),
        any::<bool>(),
    )
        .prop_map(|(season_mask, gender_mask, region, pin_only_narrow)| {
            let pick_seasons = |narrow: bool| {
                Season::ALL
                    .iter()
                    .zip(&season_mask)
                    .filter(|(_, mask)| mask.0 && (!narrow || mask.1))
                    .map(|(&s, _)| s)
                    .collect::<Vec<_>>()
            };
            let pick_genders = |narrow: bool| {
                GENDERS
                    .iter()
                    .zip(&gender_mask)
                    .filter(|(_, mask)| mask.0 && (!narrow || mask.1))
                    .map(|(&g, _)| g)
                    .collect::<Vec<_>>()
            };

            let wide_region = if pin_only_narrow { None } else { region };
            let wide = apply_region(FilterState::new(pick_seasons(false), pick_genders(false)), wide_region);
            let narrow = apply_region(FilterState::new(pick_seasons(true), pick_genders(true)), region);
            (wide, narrow)
        })
}

fn load(records: Vec<Record>) -> Dataset {
    Dataset::load(records, &RegionTable::us_states(), &AgeBands::standard())
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn groups_are_backed_by_matching_records(
        records in arb_dataset(),
        (filter, _) in arb_nested_filters(),
        spec in arb_spec()
    ) {
        let dataset = load(records);
        let predicate = compile(&filter, &CLAUSES);
        let table = aggregate(dataset.records(), &predicate, &spec);

        let mut covered = 0;
        for row in &table.rows {
            let members = dataset
                .records()
                .iter()
                .filter(|r| predicate.matches(r))
                .filter(|r| spec.dimensions().iter().zip(&row.keys).all(|(d, key)| d.value_of(r) == *key))
                .count();
            prop_assert!(members > 0, "group {:?} has no source record", row.keys);
            prop_assert_eq!(members, row.count);
            covered += members;
        }

        let matching = dataset.records().iter().filter(|r| predicate.matches(r)).count();
        prop_assert_eq!(covered, matching);
    }

    #[test]
    fn narrowing_never_adds_groups(
        records in arb_dataset(),
        (wide, narrow) in arb_nested_filters(),
        spec in arb_spec()
    ) {
        let dataset = load(records);
        let wide_table = aggregate(dataset.records(), &compile(&wide, &CLAUSES), &spec);
        let narrow_table = aggregate(dataset.records(), &compile(&narrow, &CLAUSES), &spec);

        prop_assert!(narrow_table.len() <= wide_table.len());
        for row in &narrow_table.rows {
            let wide_row = wide_table.find(&row.keys);
            prop_assert!(wide_row.is_some(), "group {:?} only under the narrow filter", row.keys);
            prop_assert!(row.count <= wide_row.map_or(0, |w| w.count));
        }
    }

    #[test]
    fn aggregation_is_repeatable(
        records in arb_dataset(),
        (filter, _) in arb_nested_filters(),
        spec in arb_spec()
    ) {
        let dataset = load(records);
        let predicate = compile(&filter, &CLAUSES);

        let first = aggregate(dataset.records(), &predicate, &spec);
        let second = aggregate(dataset.records(), &predicate, &spec);
        prop_assert_eq!(first, second);
    }
}
