//! FILENAME: core/view-adapters/src/state_season.rs
//! Grouped bar chart: average review rating per state and season.

use aggregate_engine::{
    AggregateTable, Dimension, FilterClause, FilterState, GroupSpec, Measure, Metric, SpecError,
};

use crate::adapter::{take_table, ViewAdapter};
use crate::view::{RenderHints, ViewKind, ViewOutput};

pub struct StateSeasonBars {
    specs: [GroupSpec; 1],
}

impl StateSeasonBars {
    pub fn new() -> Result<Self, SpecError> {
        let spec = GroupSpec::new(
            vec![Dimension::Region, Dimension::Season],
            vec![Measure::mean(Metric::ReviewRating)],
        )?;
        Ok(StateSeasonBars { specs: [spec] })
    }
}

impl ViewAdapter for StateSeasonBars {
    fn kind(&self) -> ViewKind {
        ViewKind::StateSeasonBars
    }

    fn clauses(&self) -> &[FilterClause] {
        &[FilterClause::Season, FilterClause::Region]
    }

    fn specs(&self) -> &[GroupSpec] {
        &self.specs
    }

    fn render(&self, _state: &FilterState, mut tables: Vec<AggregateTable>) -> ViewOutput {
        let table = take_table(&mut tables, &self.specs, 0);
        ViewOutput::new(
            self.kind(),
            "Average Review Ratings by State and Season",
            table,
            RenderHints::default(),
        )
    }
}
