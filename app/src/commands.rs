//! FILENAME: app/src/commands.rs
// PURPOSE: Command surface of the dashboard (what a UI shell calls).
// CONTEXT: Requests arrive as plain strings from widgets and are validated
// here before they reach the filter state.

use serde::{Deserialize, Serialize};

use aggregate_engine::{compile, drill_down, Dimension, DrillDownResult, FilterState};
use dataset::{Season, EnrichedRecord};
use view_adapters::palette::OVERALL_LABEL;
use view_adapters::{ViewKind, ViewOutput};

use crate::{
    apply_filter, log_debug, log_enter, log_exit, log_info, DashboardError, DashboardState, Published, ViewSlot,
};

// ============================================================================
// TYPES
// ============================================================================

/// Filter widgets' values as sent by the UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Season names; case-insensitive.
    pub seasons: Vec<String>,
    /// Region code ("CA") or full state name. `None` or empty means all.
    #[serde(default)]
    pub region: Option<String>,
    pub genders: Vec<String>,
    /// Keeps the current setting when absent.
    #[serde(default)]
    pub show_overall: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOption {
    pub code: String,
    pub name: String,
}

/// Option lists for the filter widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub seasons: Vec<Season>,
    pub regions: Vec<RegionOption>,
    pub genders: Vec<String>,
    pub series: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewStatus {
    Ready { kind: ViewKind },
    Failed { kind: ViewKind, reason: String },
}

// ============================================================================
// COMMANDS
// ============================================================================

fn resolve_region(state: &DashboardState, raw: &str) -> Result<String, DashboardError> {
    if state.regions.name_for(raw).is_some() {
        return Ok(raw.to_string());
    }
    match state.regions.lookup(raw).as_known() {
        Some(code) => Ok(code.to_string()),
        None => Err(DashboardError::UnknownRegion(raw.to_string())),
    }
}

/// Validates a request into a FilterState, keeping the current Overall
/// toggle when the request leaves it out.
pub fn build_filter(state: &DashboardState, request: &FilterRequest) -> Result<FilterState, DashboardError> {
    let seasons = request
        .seasons
        .iter()
        .map(|s| s.parse::<Season>().map_err(|_| DashboardError::UnknownSeason(s.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    let show_overall = match request.show_overall {
        Some(flag) => flag,
        None => state.current_filter()?.show_overall(),
    };

    let mut filter = FilterState::new(seasons, request.genders.iter().cloned()).with_overall(show_overall);
    if let Some(raw) = request.region.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        filter = filter.with_region(resolve_region(state, raw)?);
    }
    Ok(filter)
}

/// Applies new filter values and returns the outputs that changed.
pub fn apply_filter_change(state: &DashboardState, request: FilterRequest) -> Result<Vec<ViewOutput>, DashboardError> {
    log_enter!("CMD", "apply_filter_change", "seasons={:?} region={:?} genders={:?}", request.seasons, request.region, request.genders);

    let filter = build_filter(state, &request)?;
    let changed = apply_filter(state, filter)?;

    let mut outputs = Vec::with_capacity(changed.len());
    for kind in changed {
        outputs.push(get_view(state, kind)?);
    }

    log_exit!("CMD", "apply_filter_change", "updated={}", outputs.len());
    Ok(outputs)
}

fn published_view(state: &DashboardState, kind: ViewKind) -> Result<(&ViewSlot, Published), DashboardError> {
    if let Some((_, reason)) = state.failed_views.iter().find(|(k, _)| *k == kind) {
        return Err(DashboardError::ViewFailed {
            kind,
            reason: reason.clone(),
        });
    }
    let slot = state.slot(kind).ok_or(DashboardError::ViewNotEnabled(kind))?;
    let published = slot.published()?.ok_or(DashboardError::NotComputed(kind))?;
    Ok((slot, published))
}

/// The last published output of a view.
pub fn get_view(state: &DashboardState, kind: ViewKind) -> Result<ViewOutput, DashboardError> {
    published_view(state, kind).map(|(_, published)| published.output)
}

/// Every configured view with its status, in display order.
pub fn list_views(state: &DashboardState) -> Vec<ViewStatus> {
    let mut out: Vec<ViewStatus> = state
        .views
        .iter()
        .map(|slot| ViewStatus::Ready { kind: slot.kind() })
        .collect();
    out.extend(state.failed_views.iter().map(|(kind, reason)| ViewStatus::Failed {
        kind: *kind,
        reason: reason.clone(),
    }));
    out
}

pub fn filter_options(state: &DashboardState) -> FilterOptions {
    let mut seasons = state.dataset.distinct_seasons();
    seasons.sort();

    let regions = state
        .regions
        .entries()
        .map(|(name, code)| RegionOption {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect();

    let genders = state.dataset.distinct_genders();
    let mut series = genders.clone();
    series.push(OVERALL_LABEL.to_string());

    log_debug!("CMD", "filter_options seasons={} genders={}", seasons.len(), genders.len());
    FilterOptions {
        seasons,
        regions,
        genders,
        series,
    }
}

/// Source records behind row `row` of the output a view currently shows,
/// under the filter that produced that output.
///
/// Grouping keys the view derived after aggregation are left out: the
/// "Overall" series matches every gender, and a ranked item matches all
/// of its categories.
pub fn drill_down_row(
    state: &DashboardState,
    kind: ViewKind,
    row: usize,
    max_records: usize,
) -> Result<(DrillDownResult, Vec<EnrichedRecord>), DashboardError> {
    log_enter!("CMD", "drill_down_row", "kind={} row={}", kind, row);

    let (slot, Published { filter, output, .. }) = published_view(state, kind)?;
    let target = output.table.rows.get(row).ok_or(DashboardError::RowOutOfRange {
        kind,
        row,
        len: output.table.len(),
    })?;

    let grouped_by = slot
        .adapter
        .specs()
        .first()
        .map(|spec| spec.dimensions().to_vec())
        .unwrap_or_default();

    let (dimensions, keys): (Vec<_>, Vec<_>) = output
        .table
        .dimensions
        .iter()
        .zip(&target.keys)
        .filter(|(d, key)| {
            grouped_by.contains(d) && !(**d == Dimension::Gender && key.as_text() == Some(OVERALL_LABEL))
        })
        .map(|(d, key)| (*d, key.clone()))
        .unzip();

    let predicate = compile(&filter, slot.adapter.clauses());
    let records = state.dataset.records();
    let result = drill_down(records, &predicate, &dimensions, &keys, max_records);
    let sample = result.record_indices.iter().map(|&i| records[i].clone()).collect();

    log_info!("CMD", "drill_down_row {} row={} total={} truncated={}", kind, row, result.total_count, result.is_truncated);
    log_exit!("CMD", "drill_down_row");
    Ok((result, sample))
}
