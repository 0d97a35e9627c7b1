//! FILENAME: core/view-adapters/src/choropleth.rs
//! US map colored by average review rating per state.

use aggregate_engine::{
    AggregateTable, Dimension, FilterClause, FilterState, GroupSpec, Measure, Metric, SpecError,
};

use crate::adapter::{take_table, ViewAdapter};
use crate::ordering::value_range;
use crate::view::{RenderHints, ViewKind, ViewOutput};

pub struct StateChoropleth {
    specs: [GroupSpec; 1],
}

impl StateChoropleth {
    pub fn new() -> Result<Self, SpecError> {
        let spec = GroupSpec::new(
            vec![Dimension::Region, Dimension::RegionCode],
            vec![Measure::mean(Metric::ReviewRating)],
        )?;
        Ok(StateChoropleth { specs: [spec] })
    }
}

impl ViewAdapter for StateChoropleth {
    fn kind(&self) -> ViewKind {
        ViewKind::StateChoropleth
    }

    fn clauses(&self) -> &[FilterClause] {
        &[FilterClause::Season, FilterClause::Region]
    }

    fn specs(&self) -> &[GroupSpec] {
        &self.specs
    }

    fn render(&self, state: &FilterState, mut tables: Vec<AggregateTable>) -> ViewOutput {
        let mut table = take_table(&mut tables, &self.specs, 0);

        // A region without a code cannot be placed on the map. Its name is
        // reported instead of silently dropped.
        let mut unplaced = Vec::new();
        if let (Some(name), Some(code)) = (
            table.dimension_index(Dimension::Region),
            table.dimension_index(Dimension::RegionCode),
        ) {
            table.rows.retain(|row| {
                let missing = row.keys[code].as_region_code().map_or(true, |c| c.is_missing());
                if missing {
                    unplaced.push(row.keys[name].to_string());
                }
                !missing
            });
        }

        let value_range = value_range(&table, Measure::mean(Metric::ReviewRating));
        ViewOutput::new(
            self.kind(),
            format!("Average Review Ratings by State for {}", state.season_list()),
            table,
            RenderHints {
                value_range,
                unplaced,
                ..RenderHints::default()
            },
        )
    }
}
