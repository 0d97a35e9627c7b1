//! FILENAME: core/view-adapters/src/item_ranking.rs
//! Horizontal bars ranking items by average review rating, colored by the
//! item's category.
//!
//! Items are aggregated on their own so that an item sold under several
//! categories still gets one bar. The category comes from a second
//! [Item, Category] aggregation; the first category seen for an item wins.

use rustc_hash::FxHashMap;

use aggregate_engine::{
    AggregateRow, AggregateTable, Dimension, DimensionValue, FilterClause, FilterState, GroupSpec,
    Measure, Metric, SpecError,
};

use crate::adapter::{take_table, ViewAdapter};
use crate::ordering::{sort_rows, value_range, SortBy, SortKey};
use crate::palette::{category_color, colors_for};
use crate::view::{RenderHints, ViewKind, ViewOutput};

/// Space left below the lowest bar so it stays visible.
const AXIS_PADDING: f64 = 0.1;

pub struct ItemRatingBars {
    /// [0]: rating per item, [1]: item to category pairs.
    specs: [GroupSpec; 2],
}

impl ItemRatingBars {
    pub fn new() -> Result<Self, SpecError> {
        let ratings = GroupSpec::new(vec![Dimension::Item], vec![Measure::mean(Metric::ReviewRating)])?;
        let categories = GroupSpec::new(
            vec![Dimension::Item, Dimension::Category],
            vec![Measure::count(Metric::ReviewRating)],
        )?;
        Ok(ItemRatingBars {
            specs: [ratings, categories],
        })
    }
}

/// First category seen for each item.
fn first_categories(table: &AggregateTable) -> FxHashMap<DimensionValue, DimensionValue> {
    let mut out = FxHashMap::default();
    if let (Some(item), Some(category)) = (
        table.dimension_index(Dimension::Item),
        table.dimension_index(Dimension::Category),
    ) {
        for row in &table.rows {
            out.entry(row.keys[item].clone())
                .or_insert_with(|| row.keys[category].clone());
        }
    }
    out
}

impl ViewAdapter for ItemRatingBars {
    fn kind(&self) -> ViewKind {
        ViewKind::ItemRatingBars
    }

    fn clauses(&self) -> &[FilterClause] {
        &[FilterClause::Season, FilterClause::Region]
    }

    fn specs(&self) -> &[GroupSpec] {
        &self.specs
    }

    fn render(&self, state: &FilterState, mut tables: Vec<AggregateTable>) -> ViewOutput {
        let ratings = take_table(&mut tables, &self.specs, 0);
        let categories = first_categories(&take_table(&mut tables, &self.specs, 1));

        let rows = ratings
            .rows
            .into_iter()
            .map(|row| {
                let category = categories
                    .get(&row.keys[0])
                    .cloned()
                    .unwrap_or_else(|| DimensionValue::text(""));
                AggregateRow {
                    keys: vec![row.keys[0].clone(), category],
                    values: row.values,
                    count: row.count,
                }
            })
            .collect();

        let mut table = AggregateTable {
            dimensions: vec![Dimension::Item, Dimension::Category],
            measures: ratings.measures,
            rows,
        };
        let rating = Measure::mean(Metric::ReviewRating);
        sort_rows(&mut table, SortKey::descending(SortBy::Measure(rating)));

        let value_range = value_range(&table, rating).map(|(lo, hi)| (lo - AXIS_PADDING, hi));
        let colors = colors_for(
            table.rows.iter().filter_map(|r| r.keys[1].as_text()),
            category_color,
        );

        ViewOutput::new(
            self.kind(),
            format!("Average Review Ratings by Item Purchased for {}", state.season_list()),
            table,
            RenderHints {
                colors,
                value_range,
                ..RenderHints::default()
            },
        )
    }
}
