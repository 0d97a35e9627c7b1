//! FILENAME: core/view-adapters/src/pipeline.rs
//! Runs a view end to end: compile its filter clauses, aggregate each of
//! its specs, render. The only place in this crate that reads records.

use aggregate_engine::{aggregate, compile, FilterState};
use dataset::EnrichedRecord;

use crate::adapter::ViewAdapter;
use crate::view::ViewOutput;

/// Computes one view from the records and the current filter state.
pub fn compute_view(adapter: &dyn ViewAdapter, records: &[EnrichedRecord], state: &FilterState) -> ViewOutput {
    let predicate = compile(state, adapter.clauses());
    let tables = adapter
        .specs()
        .iter()
        .map(|spec| aggregate(records, &predicate, spec))
        .collect();
    adapter.render(state, tables)
}

/// Computes every view in order.
pub fn compute_all(
    adapters: &[Box<dyn ViewAdapter>],
    records: &[EnrichedRecord],
    state: &FilterState,
) -> Vec<ViewOutput> {
    adapters
        .iter()
        .map(|adapter| compute_view(adapter.as_ref(), records, state))
        .collect()
}
