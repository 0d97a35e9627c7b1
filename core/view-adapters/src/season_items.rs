//! FILENAME: core/view-adapters/src/season_items.rs
//! One pie per season: average review rating per item purchased.

use aggregate_engine::{
    AggregateTable, Dimension, FilterClause, FilterState, GroupSpec, Measure, Metric, SpecError,
};

use crate::adapter::{take_table, ViewAdapter};
use crate::ordering::group_contiguous;
use crate::view::{Panel, RenderHints, ViewKind, ViewOutput};

pub struct SeasonItemPies {
    specs: [GroupSpec; 1],
}

impl SeasonItemPies {
    pub fn new() -> Result<Self, SpecError> {
        let spec = GroupSpec::new(
            vec![Dimension::Season, Dimension::Item],
            vec![Measure::mean(Metric::ReviewRating)],
        )?;
        Ok(SeasonItemPies { specs: [spec] })
    }
}

impl ViewAdapter for SeasonItemPies {
    fn kind(&self) -> ViewKind {
        ViewKind::SeasonItemPies
    }

    fn clauses(&self) -> &[FilterClause] {
        &[FilterClause::Season, FilterClause::Region]
    }

    fn specs(&self) -> &[GroupSpec] {
        &self.specs
    }

    fn render(&self, _state: &FilterState, mut tables: Vec<AggregateTable>) -> ViewOutput {
        let mut table = take_table(&mut tables, &self.specs, 0);

        // one panel per season, seasons in first-seen order
        let panels = group_contiguous(&mut table, Dimension::Season)
            .into_iter()
            .map(|(season, start, len)| Panel {
                title: format!("Average Review Ratings for Items in {}", season),
                start,
                len,
            })
            .collect();

        ViewOutput::new(
            self.kind(),
            "Average Review Ratings for Items in Each Season",
            table,
            RenderHints {
                panels,
                ..RenderHints::default()
            },
        )
    }
}
