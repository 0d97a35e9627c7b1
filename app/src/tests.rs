//! FILENAME: app/src/tests.rs
use super::*;
use dataset::{AgeBands, Record, Season};
use view_adapters::AdapterOptions;

fn small_dataset() -> Dataset {
    Dataset::load(
        vec![
            Record::new("Male", "California", Season::Winter, "Coat", "Outerwear").with_age(32).with_rating(4.0),
            Record::new("Female", "California", Season::Winter, "Boots", "Footwear").with_age(47).with_rating(2.0),
            Record::new("Female", "Texas", Season::Fall, "Hat", "Accessories").with_age(21).with_rating(3.5),
        ],
        &RegionTable::us_states(),
        &AgeBands::standard(),
    )
}

fn state_with(parallel: bool) -> DashboardState {
    let config = DashboardConfig {
        parallel,
        ..DashboardConfig::default()
    };
    create_dashboard_state(small_dataset(), RegionTable::us_states(), &config).unwrap()
}

fn empty_filter() -> FilterState {
    FilterState::all_seasons(["Male"])
}

fn empty_output(kind: ViewKind) -> ViewOutput {
    let adapter = build_adapter(kind, AdapterOptions::default()).unwrap();
    adapter.render(&empty_filter(), Vec::new())
}

// ============================================================================
// TICKETS
// ============================================================================

#[test]
fn test_newest_ticket_wins() {
    let slot = ViewSlot::new(build_adapter(ViewKind::StateSeasonBars, AdapterOptions::default()).unwrap());

    let old = slot.issue_ticket();
    let new = slot.issue_ticket();
    assert!(new > old);

    assert!(slot.publish(new, &empty_filter(), empty_output(ViewKind::StateSeasonBars)).unwrap());
    // the older computation finishes late and is dropped
    assert!(!slot.publish(old, &empty_filter(), empty_output(ViewKind::StateSeasonBars)).unwrap());
    assert!(slot.is_computed().unwrap());
}

#[test]
fn test_result_superseded_before_publish_is_dropped() {
    let slot = ViewSlot::new(build_adapter(ViewKind::ItemRatingBars, AdapterOptions::default()).unwrap());

    let first = slot.issue_ticket();
    let _second = slot.issue_ticket();

    assert!(!slot.publish(first, &empty_filter(), empty_output(ViewKind::ItemRatingBars)).unwrap());
    assert!(!slot.is_computed().unwrap());
}

// ============================================================================
// RECOMPUTATION
// ============================================================================

#[test]
fn test_initial_state_computes_every_view() {
    let state = state_with(false);
    assert_eq!(state.views.len(), ViewKind::ALL.len());
    assert!(state.failed_views.is_empty());
    for slot in &state.views {
        assert!(slot.is_computed().unwrap(), "{} not computed", slot.kind());
    }

    let filter = state.current_filter().unwrap();
    assert_eq!(filter.seasons().len(), 4);
    assert_eq!(filter.genders().len(), 2);
    assert!(filter.show_overall());
}

#[test]
fn test_gender_change_skips_views_without_gender_input() {
    let state = state_with(false);
    let next = state.current_filter().unwrap().with_genders(["Female"]);

    let mut updated = apply_filter(&state, next).unwrap();
    updated.sort();

    assert_eq!(updated, vec![ViewKind::GenderAgeBars, ViewKind::DemographicLines]);
}

#[test]
fn test_overall_toggle_only_touches_lines() {
    let state = state_with(false);
    let next = state.current_filter().unwrap().with_overall(false);

    assert_eq!(apply_filter(&state, next).unwrap(), vec![ViewKind::DemographicLines]);
}

#[test]
fn test_unchanged_filter_recomputes_nothing() {
    let state = state_with(false);
    let same = state.current_filter().unwrap();
    assert!(apply_filter(&state, same).unwrap().is_empty());
}

#[test]
fn test_region_change_skips_gender_age_view() {
    let state = state_with(false);
    let next = state.current_filter().unwrap().with_region("CA");

    let updated = apply_filter(&state, next).unwrap();

    assert_eq!(updated.len(), ViewKind::ALL.len() - 1);
    assert!(!updated.contains(&ViewKind::GenderAgeBars));
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = state_with(false);
    let parallel = state_with(true);
    let next = sequential
        .current_filter()
        .unwrap()
        .with_seasons([Season::Winter])
        .with_genders(["Female"]);

    apply_filter(&sequential, next.clone()).unwrap();
    apply_filter(&parallel, next).unwrap();

    for kind in ViewKind::ALL {
        let a = sequential.slot(kind).unwrap().published().unwrap().unwrap().output;
        let b = parallel.slot(kind).unwrap().published().unwrap().unwrap().output;
        assert_eq!(a, b, "{} differs", kind);
    }
}

#[test]
fn test_older_event_finishing_last_is_dropped() {
    let state = state_with(false);
    let winter = state.current_filter().unwrap().with_seasons([Season::Winter]);
    let fall = winter.clone().with_seasons([Season::Fall]);

    // winter arrives first, fall second; fall's recompute finishes first
    let winter_pending = begin_filter(&state, winter.clone()).unwrap();
    let fall_pending = begin_filter(&state, fall.clone()).unwrap();
    let shown = run_pending(&state, &fall, fall_pending).unwrap();
    let late = run_pending(&state, &winter, winter_pending).unwrap();

    assert_eq!(shown.len(), ViewKind::ALL.len());
    assert!(late.is_empty());

    let current = state.current_filter().unwrap();
    assert_eq!(current, fall);
    for slot in &state.views {
        let expected = compute_view(slot.adapter.as_ref(), state.dataset.records(), &current);
        let published = slot.published().unwrap().unwrap();
        assert_eq!(published.output, expected, "{} shows a superseded result", slot.kind());
        assert_eq!(published.filter, fall);
    }
}

#[test]
fn test_parallel_workers_respect_event_order() {
    let state = state_with(true);
    let winter = state.current_filter().unwrap().with_seasons([Season::Winter]);
    let fall = winter.clone().with_seasons([Season::Fall]);

    let winter_pending = begin_filter(&state, winter.clone()).unwrap();
    let fall_pending = begin_filter(&state, fall.clone()).unwrap();
    std::thread::scope(|scope| {
        let late = scope.spawn(|| run_pending(&state, &winter, winter_pending));
        run_pending(&state, &fall, fall_pending).unwrap();
        late.join().unwrap().unwrap();
    });

    for slot in &state.views {
        assert_eq!(slot.published().unwrap().unwrap().filter, fall);
    }
}

#[test]
fn test_drill_down_uses_filter_of_shown_output() {
    let state = state_with(false);
    let winter = state.current_filter().unwrap().with_seasons([Season::Winter]);
    apply_filter(&state, winter).unwrap();

    // a newer event is accepted but its views are not recomputed yet
    let fall = state.current_filter().unwrap().with_seasons([Season::Fall]);
    let _pending = begin_filter(&state, fall).unwrap();

    let shown = state.slot(ViewKind::StateSeasonBars).unwrap().published().unwrap().unwrap().output;
    assert_eq!(shown.table.len(), 1);
    let (result, records) = drill_down_row(&state, ViewKind::StateSeasonBars, 0, 10).unwrap();
    assert_eq!(result.total_count, 2);
    assert!(records.iter().all(|r| r.record.season == Season::Winter));
}

#[test]
fn test_disabled_view_is_absent() {
    let config = DashboardConfig {
        views: vec![ViewKind::StateChoropleth],
        ..DashboardConfig::default()
    };
    let state = create_dashboard_state(small_dataset(), RegionTable::us_states(), &config).unwrap();

    assert!(state.slot(ViewKind::StateChoropleth).is_some());
    assert!(state.slot(ViewKind::ItemRatingBars).is_none());
}
