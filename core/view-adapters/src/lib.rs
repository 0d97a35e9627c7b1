//! FILENAME: core/view-adapters/src/lib.rs
//! Chart views for the Shopping Trends dashboard.
//!
//! Each view declares which filter clauses it honours and which group
//! specs it needs, then reshapes the aggregate tables into chart-ready
//! output (ordering, panels, colors, titles). Views never touch records;
//! `pipeline` feeds them.

pub mod adapter;
pub mod view;
pub mod palette;
pub mod ordering;
pub mod pipeline;

mod bubbles;
mod choropleth;
mod demographics;
mod item_ranking;
mod season_items;
mod state_season;

pub use adapter::{build_adapter, AdapterOptions, ViewAdapter};
pub use bubbles::PurchaseBubbles;
pub use choropleth::StateChoropleth;
pub use demographics::{DemographicLines, GenderAgeBars};
pub use item_ranking::ItemRatingBars;
pub use ordering::{sort_rows, SortBy, SortKey, SortOrder};
pub use pipeline::{compute_all, compute_view};
pub use season_items::SeasonItemPies;
pub use state_season::StateSeasonBars;
pub use view::{Panel, RenderHints, SeriesColor, ViewKind, ViewOutput, EMPTY_VIEW_MESSAGE};
