//! FILENAME: tests/test_dashboard.rs
//! Integration tests for the dashboard commands.

mod common;

use aggregate_engine::DimensionValue;
use app_lib::{
    apply_filter_change, drill_down_row, filter_options, get_view, list_views, DashboardConfig,
    DashboardError, FilterRequest, ViewStatus,
};
use common::TestHarness;
use dataset::{AgeBand, Season};
use view_adapters::{ViewKind, EMPTY_VIEW_MESSAGE};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn request(seasons: &[&str], region: Option<&str>, genders: &[&str]) -> FilterRequest {
    FilterRequest {
        seasons: seasons.iter().map(|s| s.to_string()).collect(),
        region: region.map(str::to_string),
        genders: genders.iter().map(|g| g.to_string()).collect(),
        show_overall: None,
    }
}

fn text(s: &str) -> DimensionValue {
    DimensionValue::text(s)
}

// ============================================================================
// FILTER CHANGES
// ============================================================================

#[test]
fn test_winter_california_mean() {
    let harness = TestHarness::new();
    apply_filter_change(&harness.state, request(&["Winter"], None, &["Male", "Female"])).unwrap();

    let view = get_view(&harness.state, ViewKind::StateSeasonBars).unwrap();
    let row = view
        .table
        .find(&[text("California"), DimensionValue::Season(Season::Winter)])
        .unwrap();
    assert_eq!(row.values[0], 3.0);
    assert_eq!(view.table.len(), 1);
}

#[test]
fn test_summer_only_empties_every_view() {
    let harness = TestHarness::new();
    let updated = apply_filter_change(&harness.state, request(&["summer"], None, &["Male", "Female"])).unwrap();

    assert_eq!(updated.len(), ViewKind::ALL.len());
    for view in updated {
        assert!(view.is_empty(), "{} should be empty", view.kind);
        assert_eq!(view.hints.empty_message.as_deref(), Some(EMPTY_VIEW_MESSAGE));
    }
}

#[test]
fn test_region_accepts_code_or_name() {
    let harness = TestHarness::new();

    apply_filter_change(&harness.state, request(&["Fall"], Some("Texas"), &["Male", "Female"])).unwrap();
    assert_eq!(harness.state.current_filter().unwrap().region(), Some("TX"));

    apply_filter_change(&harness.state, request(&["Fall"], Some("CA"), &["Male", "Female"])).unwrap();
    assert_eq!(harness.state.current_filter().unwrap().region(), Some("CA"));

    apply_filter_change(&harness.state, request(&["Fall"], Some(""), &["Male", "Female"])).unwrap();
    assert_eq!(harness.state.current_filter().unwrap().region(), None);
}

#[test]
fn test_invalid_requests_leave_filter_untouched() {
    let harness = TestHarness::new();
    let before = harness.state.current_filter().unwrap();

    let err = apply_filter_change(&harness.state, request(&["Monsoon"], None, &["Male"])).unwrap_err();
    assert!(matches!(err, DashboardError::UnknownSeason(ref s) if s == "Monsoon"));

    let err = apply_filter_change(&harness.state, request(&["Fall"], Some("ZZ"), &["Male"])).unwrap_err();
    assert!(matches!(err, DashboardError::UnknownRegion(_)));

    assert_eq!(harness.state.current_filter().unwrap(), before);
}

#[test]
fn test_item_ranking_merges_first_category() {
    let harness = TestHarness::new();
    apply_filter_change(&harness.state, request(&["Fall"], Some("TX"), &["Male"])).unwrap();

    let view = get_view(&harness.state, ViewKind::ItemRatingBars).unwrap();
    assert_eq!(view.table.len(), 1);
    let row = &view.table.rows[0];
    assert_eq!(row.keys, vec![text("Hat"), text("Accessories")]);
    assert!((row.values[0] - 3.7).abs() < 1e-12);
    assert_eq!(view.title, "Average Review Ratings by Item Purchased for Fall");
}

#[test]
fn test_choropleth_reports_unplaced_regions() {
    let harness = TestHarness::new();
    apply_filter_change(&harness.state, request(&["Fall"], None, &["Female"])).unwrap();

    let view = get_view(&harness.state, ViewKind::StateChoropleth).unwrap();
    assert_eq!(view.hints.unplaced, vec!["Atlantis".to_string()]);
    assert_eq!(view.table.len(), 1);
    assert_eq!(view.title, "Average Review Ratings by State for Fall");
}

#[test]
fn test_overall_toggle() {
    let harness = TestHarness::new();
    let mut hide = request(&["Fall"], None, &["Male", "Female"]);
    hide.show_overall = Some(false);
    apply_filter_change(&harness.state, hide).unwrap();

    let view = get_view(&harness.state, ViewKind::DemographicLines).unwrap();
    assert!(view.table.rows.iter().all(|r| r.keys[1] != text("Overall")));

    // omitted flag keeps the current setting
    apply_filter_change(&harness.state, request(&["Fall", "Winter"], None, &["Male", "Female"])).unwrap();
    assert!(!harness.state.current_filter().unwrap().show_overall());
}

// ============================================================================
// VIEWS AND OPTIONS
// ============================================================================

#[test]
fn test_filter_options() {
    let harness = TestHarness::new();
    let options = filter_options(&harness.state);

    assert_eq!(options.seasons, vec![Season::Spring, Season::Fall, Season::Winter]);
    assert_eq!(options.genders, vec!["Male".to_string(), "Female".to_string()]);
    assert_eq!(options.series.last().map(String::as_str), Some("Overall"));
    assert_eq!(options.regions.len(), 50);
    assert!(options.regions.iter().any(|r| r.code == "TX" && r.name == "Texas"));
}

#[test]
fn test_disabled_view_errors() {
    let config = DashboardConfig {
        views: vec![ViewKind::StateChoropleth, ViewKind::DemographicLines],
        ..DashboardConfig::default()
    };
    let harness = TestHarness::with_config(&config);

    let err = get_view(&harness.state, ViewKind::PurchaseBubbles).unwrap_err();
    assert!(matches!(err, DashboardError::ViewNotEnabled(ViewKind::PurchaseBubbles)));

    let statuses = list_views(&harness.state);
    assert_eq!(
        statuses,
        vec![
            ViewStatus::Ready { kind: ViewKind::StateChoropleth },
            ViewStatus::Ready { kind: ViewKind::DemographicLines },
        ]
    );
}

// ============================================================================
// DRILL DOWN
// ============================================================================

#[test]
fn test_drill_down_ranked_item_covers_all_categories() {
    let harness = TestHarness::new();
    apply_filter_change(&harness.state, request(&["Fall"], Some("TX"), &["Male"])).unwrap();

    let (result, records) = drill_down_row(&harness.state, ViewKind::ItemRatingBars, 0, 10).unwrap();

    assert_eq!(result.total_count, 2);
    assert!(!result.is_truncated);
    assert!(records.iter().all(|r| r.record.item == "Hat"));
}

#[test]
fn test_drill_down_overall_row_pools_genders() {
    let harness = TestHarness::new();
    apply_filter_change(&harness.state, request(&["Fall"], None, &["Male", "Female"])).unwrap();

    let view = get_view(&harness.state, ViewKind::DemographicLines).unwrap();
    let band = DimensionValue::AgeBand(AgeBand::Band { lower: 20, upper: 25 });
    let row = view
        .table
        .rows
        .iter()
        .position(|r| r.keys == vec![band.clone(), text("Overall")])
        .unwrap();

    let (result, _) = drill_down_row(&harness.state, ViewKind::DemographicLines, row, 10).unwrap();
    assert_eq!(result.total_count, 2);

    let (capped, sample) = drill_down_row(&harness.state, ViewKind::DemographicLines, row, 1).unwrap();
    assert!(capped.is_truncated);
    assert_eq!(sample.len(), 1);
}

#[test]
fn test_drill_down_row_out_of_range() {
    let harness = TestHarness::new();
    let err = drill_down_row(&harness.state, ViewKind::StateSeasonBars, 999, 10).unwrap_err();
    assert!(matches!(err, DashboardError::RowOutOfRange { row: 999, .. }));
}
