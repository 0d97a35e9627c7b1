//! FILENAME: core/aggregate-engine/src/filter.rs
//! Filter Evaluator - turns a FilterState into record predicates.
//!
//! Each clause (season, region, gender) compiles on its own so that views
//! can pick the subset they honour. Predicates are plain data and can be
//! shared freely between threads.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use dataset::{EnrichedRecord, Season};

// ============================================================================
// FILTER STATE
// ============================================================================

/// The user's current filter selection.
///
/// A new value is built for every interaction; the `with_*` methods
/// return a fresh state rather than mutating the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected seasons. An empty set selects nothing.
    seasons: BTreeSet<Season>,

    /// Selected region code. `None` means every region.
    #[serde(default)]
    region: Option<String>,

    /// Selected genders. An empty set selects nothing.
    genders: BTreeSet<String>,

    /// Whether the pooled "Overall" series is shown in the demographic view.
    #[serde(default = "default_true")]
    show_overall: bool,
}

fn default_true() -> bool {
    true
}

impl FilterState {
    pub fn new<S>(seasons: impl IntoIterator<Item = Season>, genders: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        FilterState {
            seasons: seasons.into_iter().collect(),
            region: None,
            genders: genders.into_iter().map(Into::into).collect(),
            show_overall: true,
        }
    }

    /// Every season, no region restriction, the given genders.
    pub fn all_seasons<S>(genders: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        FilterState::new(Season::ALL, genders)
    }

    pub fn with_seasons(self, seasons: impl IntoIterator<Item = Season>) -> Self {
        FilterState {
            seasons: seasons.into_iter().collect(),
            ..self
        }
    }

    pub fn with_region(self, code: impl Into<String>) -> Self {
        FilterState {
            region: Some(code.into()),
            ..self
        }
    }

    pub fn without_region(self) -> Self {
        FilterState { region: None, ..self }
    }

    pub fn with_genders<S>(self, genders: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        FilterState {
            genders: genders.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_overall(self, show_overall: bool) -> Self {
        FilterState { show_overall, ..self }
    }

    pub fn seasons(&self) -> &BTreeSet<Season> {
        &self.seasons
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn genders(&self) -> &BTreeSet<String> {
        &self.genders
    }

    pub fn show_overall(&self) -> bool {
        self.show_overall
    }

    /// Selected seasons joined for chart titles ("Spring, Winter").
    pub fn season_list(&self) -> String {
        self.seasons
            .iter()
            .map(Season::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Which inputs differ between `previous` and this state.
    pub fn changed_inputs(&self, previous: &FilterState) -> FilterInputs {
        FilterInputs {
            season: self.seasons != previous.seasons,
            region: self.region != previous.region,
            gender: self.genders != previous.genders,
            overall: self.show_overall != previous.show_overall,
        }
    }
}

// ============================================================================
// FILTER INPUTS
// ============================================================================

/// A set of FilterState inputs: what a view depends on, or what an
/// interaction changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterInputs {
    pub season: bool,
    pub region: bool,
    pub gender: bool,
    pub overall: bool,
}

impl FilterInputs {
    pub const NONE: FilterInputs = FilterInputs {
        season: false,
        region: false,
        gender: false,
        overall: false,
    };

    pub const ALL: FilterInputs = FilterInputs {
        season: true,
        region: true,
        gender: true,
        overall: true,
    };

    /// The inputs read by the given clauses.
    pub fn from_clauses(clauses: &[FilterClause]) -> Self {
        let mut inputs = FilterInputs::NONE;
        for clause in clauses {
            match clause {
                FilterClause::Season => inputs.season = true,
                FilterClause::Region => inputs.region = true,
                FilterClause::Gender => inputs.gender = true,
            }
        }
        inputs
    }

    pub fn union(self, other: FilterInputs) -> Self {
        FilterInputs {
            season: self.season || other.season,
            region: self.region || other.region,
            gender: self.gender || other.gender,
            overall: self.overall || other.overall,
        }
    }

    pub fn intersects(&self, other: &FilterInputs) -> bool {
        (self.season && other.season)
            || (self.region && other.region)
            || (self.gender && other.gender)
            || (self.overall && other.overall)
    }

    pub fn is_empty(&self) -> bool {
        *self == FilterInputs::NONE
    }
}

// ============================================================================
// CLAUSES AND PREDICATES
// ============================================================================

/// One independently selectable part of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterClause {
    Season,
    Region,
    Gender,
}

/// A single compiled condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    SeasonIn(BTreeSet<Season>),
    RegionIs(String),
    GenderIn(BTreeSet<String>),
}

impl Condition {
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        match self {
            Condition::SeasonIn(seasons) => seasons.contains(&record.record.season),
            Condition::RegionIs(code) => record.region_code.as_known() == Some(code.as_str()),
            Condition::GenderIn(genders) => genders.contains(&record.record.gender),
        }
    }
}

/// Conjunction of conditions. An empty predicate accepts every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// Accepts every record.
    pub fn all() -> Self {
        Predicate::default()
    }

    /// Season membership; an empty season set rejects everything.
    pub fn season(state: &FilterState) -> Self {
        Predicate {
            conditions: vec![Condition::SeasonIn(state.seasons.clone())],
        }
    }

    /// Region equality; no selected region accepts everything.
    pub fn region(state: &FilterState) -> Self {
        match &state.region {
            Some(code) => Predicate {
                conditions: vec![Condition::RegionIs(code.clone())],
            },
            None => Predicate::all(),
        }
    }

    /// Gender membership; an empty gender set rejects everything.
    pub fn gender(state: &FilterState) -> Self {
        Predicate {
            conditions: vec![Condition::GenderIn(state.genders.clone())],
        }
    }

    pub fn clause(state: &FilterState, clause: FilterClause) -> Self {
        match clause {
            FilterClause::Season => Predicate::season(state),
            FilterClause::Region => Predicate::region(state),
            FilterClause::Gender => Predicate::gender(state),
        }
    }

    pub fn and(mut self, other: Predicate) -> Self {
        self.conditions.extend(other.conditions);
        self
    }

    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_unrestricted(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Compiles the selected clauses of `state` into one predicate.
pub fn compile(state: &FilterState, clauses: &[FilterClause]) -> Predicate {
    clauses
        .iter()
        .fold(Predicate::all(), |acc, &clause| acc.and(Predicate::clause(state, clause)))
}
