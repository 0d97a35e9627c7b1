//! Criterion benchmarks for aggregate-engine: grouping with and without filters.

use criterion::{criterion_group, criterion_main, Criterion};

use aggregate_engine::{
    aggregate, compile, Dimension, FilterClause, FilterState, GroupSpec, Measure, Metric, Predicate,
};
use dataset::{AgeBands, Dataset, Record, RegionTable, Season};

const ITEMS: [(&str, &str); 6] = [
    ("Blouse", "Clothing"),
    ("Sandals", "Footwear"),
    ("Belt", "Accessories"),
    ("Coat", "Outerwear"),
    ("Jeans", "Clothing"),
    ("Hat", "Accessories"),
];

const GENDERS: [&str; 2] = ["Male", "Female"];

fn make_dataset(rows: usize) -> Dataset {
    let regions = RegionTable::us_states();
    let names: Vec<String> = regions.entries().map(|(name, _)| name.to_string()).collect();
    let records = (0..rows)
        .map(|i| {
            let (item, category) = ITEMS[i % ITEMS.len()];
            Record::new(
                GENDERS[i % 2],
                names[i % names.len()].as_str(),
                Season::ALL[i % 4],
                item,
                category,
            )
            .with_age(18 + (i % 53) as u32)
            .with_rating(2.5 + (i % 26) as f64 / 10.0)
            .with_amount(20.0 + (i % 80) as f64)
            .with_previous_purchases((i % 50) as u32)
        })
        .collect();
    Dataset::load(records, &regions, &AgeBands::standard())
}

fn bench_region_season(c: &mut Criterion) {
    let dataset = make_dataset(100_000);
    let spec = GroupSpec::new(
        vec![Dimension::Region, Dimension::Season],
        vec![Measure::mean(Metric::ReviewRating)],
    )
    .unwrap();

    c.bench_function("aggregate_region_season_100k", |b| {
        b.iter(|| aggregate(dataset.records(), &Predicate::all(), &spec));
    });
}

fn bench_filtered_bubble(c: &mut Criterion) {
    let dataset = make_dataset(100_000);
    let spec = GroupSpec::new(
        vec![Dimension::Item, Dimension::Category],
        vec![
            Measure::mean(Metric::ReviewRating),
            Measure::mean(Metric::PurchaseAmount),
            Measure::sum(Metric::PreviousPurchases),
        ],
    )
    .unwrap();
    let state = FilterState::new([Season::Summer, Season::Fall], GENDERS).with_region("CA");
    let predicate = compile(&state, &[FilterClause::Season, FilterClause::Region]);

    c.bench_function("aggregate_item_category_filtered_100k", |b| {
        b.iter(|| aggregate(dataset.records(), &predicate, &spec));
    });
}

criterion_group!(benches, bench_region_season, bench_filtered_bubble);
criterion_main!(benches);
