//! FILENAME: core/view-adapters/src/view.rs
//! View output - chart-ready data for the rendering layer.
//!
//! A view never decides HOW it is drawn. It hands over an ordered table
//! plus labeling hints (title, colors, panels, value range).

use std::fmt;

use serde::{Deserialize, Serialize};
use aggregate_engine::AggregateTable;

/// Message shown by renderers when a view has no rows.
pub const EMPTY_VIEW_MESSAGE: &str = "No data for the selected filters";

// ============================================================================
// VIEW KINDS
// ============================================================================

/// Every chart the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Grouped bars: mean rating per state and season.
    StateSeasonBars,
    /// One pie per season: mean rating per item.
    SeasonItemPies,
    /// Bubbles per item: rating vs amount, sized by previous purchases.
    PurchaseBubbles,
    /// Grouped bars: mean rating per gender and age band.
    GenderAgeBars,
    /// US map: mean rating per state.
    StateChoropleth,
    /// Horizontal bars: items ranked by mean rating.
    ItemRatingBars,
    /// Lines per gender plus the pooled "Overall" series over age bands.
    DemographicLines,
}

impl ViewKind {
    pub const ALL: [ViewKind; 7] = [
        ViewKind::StateSeasonBars,
        ViewKind::SeasonItemPies,
        ViewKind::PurchaseBubbles,
        ViewKind::GenderAgeBars,
        ViewKind::StateChoropleth,
        ViewKind::ItemRatingBars,
        ViewKind::DemographicLines,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ViewKind::StateSeasonBars => "state_season_bars",
            ViewKind::SeasonItemPies => "season_item_pies",
            ViewKind::PurchaseBubbles => "purchase_bubbles",
            ViewKind::GenderAgeBars => "gender_age_bars",
            ViewKind::StateChoropleth => "state_choropleth",
            ViewKind::ItemRatingBars => "item_rating_bars",
            ViewKind::DemographicLines => "demographic_lines",
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// RENDER HINTS
// ============================================================================

/// Display color for one series / category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesColor {
    pub label: String,
    pub color: String,
}

/// A sub-chart covering a contiguous run of table rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    /// First row (inclusive) of the panel.
    pub start: usize,
    /// Number of rows in the panel.
    pub len: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    #[serde(default)]
    pub colors: Vec<SeriesColor>,

    #[serde(default)]
    pub panels: Vec<Panel>,

    /// Axis or color-scale range, when the view fixes one.
    #[serde(default)]
    pub value_range: Option<(f64, f64)>,

    /// Labels of rows that cannot be placed (e.g. regions with no code).
    #[serde(default)]
    pub unplaced: Vec<String>,

    /// Set when the table is empty.
    #[serde(default)]
    pub empty_message: Option<String>,
}

// ============================================================================
// VIEW OUTPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewOutput {
    pub kind: ViewKind,
    pub title: String,
    pub table: AggregateTable,
    pub hints: RenderHints,
}

impl ViewOutput {
    /// Builds an output, filling in the empty-state message when needed.
    pub fn new(kind: ViewKind, title: impl Into<String>, table: AggregateTable, mut hints: RenderHints) -> Self {
        if table.is_empty() {
            hints.empty_message = Some(EMPTY_VIEW_MESSAGE.to_string());
            hints.value_range = None;
        }
        ViewOutput {
            kind,
            title: title.into(),
            table,
            hints,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
