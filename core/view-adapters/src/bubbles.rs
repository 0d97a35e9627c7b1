//! FILENAME: core/view-adapters/src/bubbles.rs
//! Bubble plot per item: mean rating against mean purchase amount, bubble
//! size from the total of previous purchases, colored by category.

use aggregate_engine::{
    AggregateTable, Dimension, FilterClause, FilterState, GroupSpec, Measure, Metric, SpecError,
};

use crate::adapter::{take_table, ViewAdapter};
use crate::palette::{category_color, colors_for};
use crate::view::{RenderHints, ViewKind, ViewOutput};

pub struct PurchaseBubbles {
    specs: [GroupSpec; 1],
}

impl PurchaseBubbles {
    pub fn new() -> Result<Self, SpecError> {
        let spec = GroupSpec::new(
            vec![Dimension::Item, Dimension::Category],
            vec![
                Measure::mean(Metric::ReviewRating),
                Measure::mean(Metric::PurchaseAmount),
                Measure::sum(Metric::PreviousPurchases),
            ],
        )?;
        Ok(PurchaseBubbles { specs: [spec] })
    }
}

impl ViewAdapter for PurchaseBubbles {
    fn kind(&self) -> ViewKind {
        ViewKind::PurchaseBubbles
    }

    fn clauses(&self) -> &[FilterClause] {
        &[FilterClause::Season, FilterClause::Region]
    }

    fn specs(&self) -> &[GroupSpec] {
        &self.specs
    }

    fn render(&self, state: &FilterState, mut tables: Vec<AggregateTable>) -> ViewOutput {
        let table = take_table(&mut tables, &self.specs, 0);

        let colors = match table.dimension_index(Dimension::Category) {
            Some(i) => colors_for(
                table.rows.iter().filter_map(|r| r.keys[i].as_text()),
                category_color,
            ),
            None => Vec::new(),
        };

        ViewOutput::new(
            self.kind(),
            format!("Aggregated Bubble Plot of Shopping Trends for {}", state.season_list()),
            table,
            RenderHints {
                colors,
                ..RenderHints::default()
            },
        )
    }
}
