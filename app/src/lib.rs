//! FILENAME: app/src/lib.rs
// PURPOSE: Dashboard host library (state, recomputation, commands).
// CONTEXT: Views are recomputed only when an input they depend on changes.
// Tickets are issued while the filter lock is held, so ticket order is
// event order; only the newest ticket for a view may publish, and a slow
// result of an older event never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use rustc_hash::FxHashMap;
use thiserror::Error;

use aggregate_engine::{FilterInputs, FilterState};
use dataset::{Dataset, RegionTable};
use view_adapters::{build_adapter, compute_view, ViewAdapter, ViewKind, ViewOutput};

pub mod logging;
pub mod config;
pub mod loader;
pub mod commands;

pub use config::{AgeBandConfig, ConfigError, DashboardConfig};
pub use loader::{load_records, read_records, LoadError};
pub use logging::{init_log_file, get_log_path, next_seq, write_log};
pub use commands::{
    apply_filter_change, drill_down_row, filter_options, get_view, list_views, FilterOptions,
    FilterRequest, RegionOption, ViewStatus,
};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("unknown season: {0}")]
    UnknownSeason(String),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("view not enabled: {0}")]
    ViewNotEnabled(ViewKind),

    #[error("view {kind} failed to build: {reason}")]
    ViewFailed { kind: ViewKind, reason: String },

    #[error("view not computed yet: {0}")]
    NotComputed(ViewKind),

    #[error("row {row} out of range for {kind} ({len} rows)")]
    RowOutOfRange { kind: ViewKind, row: usize, len: usize },

    #[error("dashboard state lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

// ============================================================================
// VIEW SLOTS
// ============================================================================

/// Output published for a view with the ticket and filter that produced it.
#[derive(Debug, Clone)]
pub struct Published {
    pub ticket: u64,
    pub filter: FilterState,
    pub output: ViewOutput,
}

/// One enabled view: its adapter, the newest ticket handed out and the
/// last published output.
pub struct ViewSlot {
    pub adapter: Box<dyn ViewAdapter>,
    latest_ticket: AtomicU64,
    published: Mutex<Option<Published>>,
}

impl ViewSlot {
    pub fn new(adapter: Box<dyn ViewAdapter>) -> Self {
        ViewSlot {
            adapter,
            latest_ticket: AtomicU64::new(0),
            published: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> ViewKind {
        self.adapter.kind()
    }

    /// Hands out a new ticket; every older ticket becomes stale.
    pub fn issue_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes `output` if `ticket` is still the newest. Returns whether
    /// it was published.
    pub fn publish(&self, ticket: u64, filter: &FilterState, output: ViewOutput) -> Result<bool, DashboardError> {
        let mut guard = self.published.lock().map_err(|_| DashboardError::LockPoisoned)?;
        let newer_published = guard.as_ref().is_some_and(|p| p.ticket > ticket);
        if ticket != self.latest_ticket.load(Ordering::SeqCst) || newer_published {
            return Ok(false);
        }
        *guard = Some(Published {
            ticket,
            filter: filter.clone(),
            output,
        });
        Ok(true)
    }

    pub fn published(&self) -> Result<Option<Published>, DashboardError> {
        let guard = self.published.lock().map_err(|_| DashboardError::LockPoisoned)?;
        Ok(guard.clone())
    }

    pub fn is_computed(&self) -> Result<bool, DashboardError> {
        let guard = self.published.lock().map_err(|_| DashboardError::LockPoisoned)?;
        Ok(guard.is_some())
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

pub struct DashboardState {
    pub dataset: Dataset,
    pub regions: RegionTable,
    /// Enabled views in display order.
    pub views: Vec<ViewSlot>,
    index: FxHashMap<ViewKind, usize>,
    /// Views whose adapter could not be built, with the reason.
    pub failed_views: Vec<(ViewKind, String)>,
    pub filter: Mutex<FilterState>,
    pub parallel: bool,
}

impl DashboardState {
    pub fn slot(&self, kind: ViewKind) -> Option<&ViewSlot> {
        self.index.get(&kind).map(|&i| &self.views[i])
    }

    pub fn current_filter(&self) -> Result<FilterState, DashboardError> {
        self.filter
            .lock()
            .map(|f| f.clone())
            .map_err(|_| DashboardError::LockPoisoned)
    }
}

/// The filter a fresh dashboard starts with: every season, every region,
/// every gender present in the data, Overall shown.
pub fn initial_filter(dataset: &Dataset) -> FilterState {
    FilterState::all_seasons(dataset.distinct_genders())
}

/// Builds the adapters named in `config` and computes every view once.
/// A view whose adapter fails to build is logged and left out; the others
/// keep working.
pub fn create_dashboard_state(
    dataset: Dataset,
    regions: RegionTable,
    config: &DashboardConfig,
) -> Result<DashboardState, DashboardError> {
    log_enter_info!("SYS", "create_dashboard_state", "records={} views={}", dataset.len(), config.views.len());

    let report = dataset.report();
    if report.has_anomalies() {
        log_warn!(
            "DATA",
            "{} records with unmapped regions {:?}, {} records outside the age bands",
            report.unmapped_record_count,
            report.unmapped_regions,
            report.unbanded_record_count
        );
    }

    let options = config.adapter_options();
    let mut views = Vec::with_capacity(config.views.len());
    let mut index = FxHashMap::default();
    let mut failed_views = Vec::new();

    for &kind in &config.views {
        match build_adapter(kind, options) {
            Ok(adapter) => {
                index.insert(kind, views.len());
                views.push(ViewSlot::new(adapter));
            }
            Err(e) => {
                log_error!("VIEW", "failed to build {}: {}", kind, e);
                failed_views.push((kind, e.to_string()));
            }
        }
    }

    let filter = initial_filter(&dataset);
    let state = DashboardState {
        dataset,
        regions,
        views,
        index,
        failed_views,
        filter: Mutex::new(filter.clone()),
        parallel: config.parallel,
    };

    let pending = {
        let _current = state.filter.lock().map_err(|_| DashboardError::LockPoisoned)?;
        issue_tickets(&state, &FilterInputs::ALL)?
    };
    let computed = run_pending(&state, &filter, pending)?;
    log_exit_info!("SYS", "create_dashboard_state", "computed={}", computed.len());
    Ok(state)
}

/// Replaces the current filter and recomputes the views that depend on an
/// input that changed. Returns the kinds whose output was published.
pub fn apply_filter(state: &DashboardState, next: FilterState) -> Result<Vec<ViewKind>, DashboardError> {
    let pending = begin_filter(state, next.clone())?;
    run_pending(state, &next, pending)
}

/// A stale view with the ticket its recomputation will publish under.
struct PendingView<'a> {
    slot: &'a ViewSlot,
    ticket: u64,
}

/// Stores `next` and tickets every view it makes stale in one critical
/// section. A later event always holds the higher tickets.
fn begin_filter(state: &DashboardState, next: FilterState) -> Result<Vec<PendingView<'_>>, DashboardError> {
    let mut current = state.filter.lock().map_err(|_| DashboardError::LockPoisoned)?;
    let changed = next.changed_inputs(&current);
    log_debug!(
        "FILTER",
        "changed season={} region={} gender={} overall={}",
        changed.season,
        changed.region,
        changed.gender,
        changed.overall
    );
    *current = next;
    issue_tickets(state, &changed)
}

/// Caller holds the filter lock.
fn issue_tickets<'a>(state: &'a DashboardState, changed: &FilterInputs) -> Result<Vec<PendingView<'a>>, DashboardError> {
    let mut pending = Vec::new();
    for slot in &state.views {
        if !slot.is_computed()? || slot.adapter.inputs().intersects(changed) {
            pending.push(PendingView {
                slot,
                ticket: slot.issue_ticket(),
            });
        }
    }
    Ok(pending)
}

/// Computes one pending view and tries to publish it.
fn run_slot(state: &DashboardState, pending: &PendingView<'_>, filter: &FilterState) -> Result<bool, DashboardError> {
    let PendingView { slot, ticket } = *pending;
    let output = compute_view(slot.adapter.as_ref(), state.dataset.records(), filter);
    let rows = output.table.len();
    let published = slot.publish(ticket, filter, output)?;
    if published {
        log_debug!("VIEW", "{} ticket={} rows={}", slot.kind(), ticket, rows);
    } else {
        log_debug!("VIEW", "{} ticket={} superseded, dropped", slot.kind(), ticket);
    }
    Ok(published)
}

fn run_pending(state: &DashboardState, filter: &FilterState, pending: Vec<PendingView<'_>>) -> Result<Vec<ViewKind>, DashboardError> {
    let results: Vec<(ViewKind, Result<bool, DashboardError>)> = if state.parallel && pending.len() > 1 {
        std::thread::scope(|scope| {
            let handles: Vec<_> = pending
                .iter()
                .map(|view| (view.slot.kind(), scope.spawn(move || run_slot(state, view, filter))))
                .collect();
            handles
                .into_iter()
                .map(|(kind, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        log_error!("VIEW", "{} worker panicked", kind);
                        Ok(false)
                    });
                    (kind, result)
                })
                .collect()
        })
    } else {
        pending
            .iter()
            .map(|view| (view.slot.kind(), run_slot(state, view, filter)))
            .collect()
    };

    let mut published = Vec::new();
    for (kind, result) in results {
        if result? {
            published.push(kind);
        }
    }
    Ok(published)
}

#[cfg(test)]
mod tests;
