//! FILENAME: core/view-adapters/src/adapter.rs
//! The contract every chart implements, and the registry that builds them.

use serde::{Deserialize, Serialize};
use aggregate_engine::{
    AggregateTable, FilterClause, FilterInputs, FilterState, GroupSpec, SpecError,
};

use crate::bubbles::PurchaseBubbles;
use crate::choropleth::StateChoropleth;
use crate::demographics::{DemographicLines, GenderAgeBars};
use crate::item_ranking::ItemRatingBars;
use crate::season_items::SeasonItemPies;
use crate::state_season::StateSeasonBars;
use crate::view::{ViewKind, ViewOutput};

/// Options shared by all adapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterOptions {
    /// Drop the `unbanded` age group from age-grouped views instead of
    /// showing it as its own category.
    #[serde(default)]
    pub exclude_unbanded: bool,
}

/// One chart: the specs it aggregates, the filter clauses it honours and
/// a pure transform from aggregate tables to chart-ready output.
pub trait ViewAdapter: Send + Sync {
    fn kind(&self) -> ViewKind;

    /// Filter clauses applied before aggregation.
    fn clauses(&self) -> &[FilterClause];

    /// Specs to aggregate, in the order `render` expects the tables.
    fn specs(&self) -> &[GroupSpec];

    /// FilterState inputs whose change makes this view stale.
    fn inputs(&self) -> FilterInputs {
        FilterInputs::from_clauses(self.clauses())
    }

    /// Turns engine output into the view. `tables[i]` is the result for
    /// `specs()[i]`; missing tables are treated as empty.
    fn render(&self, state: &FilterState, tables: Vec<AggregateTable>) -> ViewOutput;
}

/// Builds the adapter for `kind`. Fails only if the adapter's group spec
/// is malformed.
pub fn build_adapter(kind: ViewKind, options: AdapterOptions) -> Result<Box<dyn ViewAdapter>, SpecError> {
    let adapter: Box<dyn ViewAdapter> = match kind {
        ViewKind::StateSeasonBars => Box::new(StateSeasonBars::new()?),
        ViewKind::SeasonItemPies => Box::new(SeasonItemPies::new()?),
        ViewKind::PurchaseBubbles => Box::new(PurchaseBubbles::new()?),
        ViewKind::GenderAgeBars => Box::new(GenderAgeBars::new(options)?),
        ViewKind::StateChoropleth => Box::new(StateChoropleth::new()?),
        ViewKind::ItemRatingBars => Box::new(ItemRatingBars::new()?),
        ViewKind::DemographicLines => Box::new(DemographicLines::new(options)?),
    };
    Ok(adapter)
}

/// Takes table `index`, or an empty table shaped like `specs[index]`.
pub(crate) fn take_table(tables: &mut Vec<AggregateTable>, specs: &[GroupSpec], index: usize) -> AggregateTable {
    if index < tables.len() {
        std::mem::replace(&mut tables[index], AggregateTable::empty(&specs[index]))
    } else {
        AggregateTable::empty(&specs[index])
    }
}
