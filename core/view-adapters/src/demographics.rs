//! FILENAME: core/view-adapters/src/demographics.rs
//! Demographic views over age bands.
//!
//! - `GenderAgeBars`: mean rating per gender and age band, gender filtered
//!   in the engine, region ignored.
//! - `DemographicLines`: one series per selected gender plus a pooled
//!   "Overall" series. The pooled series comes from a second aggregation
//!   without the gender dimension, so it is the mean over all records in
//!   the band and not the mean of the per-gender means.

use aggregate_engine::{
    AggregateRow, AggregateTable, Dimension, DimensionValue, FilterClause, FilterInputs,
    FilterState, GroupSpec, Measure, Metric, SpecError,
};

use crate::adapter::{take_table, AdapterOptions, ViewAdapter};
use crate::ordering::{sort_rows, SortBy, SortKey};
use crate::palette::{colors_for, gender_color, OVERALL_LABEL};
use crate::view::{RenderHints, SeriesColor, ViewKind, ViewOutput};

fn drop_unbanded(table: &mut AggregateTable) {
    if let Some(i) = table.dimension_index(Dimension::AgeBand) {
        table
            .rows
            .retain(|row| !row.keys[i].as_age_band().is_some_and(|b| b.is_unbanded()));
    }
}

fn gender_colors(table: &AggregateTable) -> Vec<SeriesColor> {
    match table.dimension_index(Dimension::Gender) {
        Some(i) => colors_for(table.rows.iter().filter_map(|r| r.keys[i].as_text()), gender_color),
        None => Vec::new(),
    }
}

// ============================================================================
// GENDER x AGE BAND BARS
// ============================================================================

pub struct GenderAgeBars {
    specs: [GroupSpec; 1],
    options: AdapterOptions,
}

impl GenderAgeBars {
    pub fn new(options: AdapterOptions) -> Result<Self, SpecError> {
        let spec = GroupSpec::new(
            vec![Dimension::Gender, Dimension::AgeBand],
            vec![Measure::mean(Metric::ReviewRating)],
        )?;
        Ok(GenderAgeBars { specs: [spec], options })
    }
}

impl ViewAdapter for GenderAgeBars {
    fn kind(&self) -> ViewKind {
        ViewKind::GenderAgeBars
    }

    fn clauses(&self) -> &[FilterClause] {
        &[FilterClause::Season, FilterClause::Gender]
    }

    fn specs(&self) -> &[GroupSpec] {
        &self.specs
    }

    fn render(&self, _state: &FilterState, mut tables: Vec<AggregateTable>) -> ViewOutput {
        let mut table = take_table(&mut tables, &self.specs, 0);
        if self.options.exclude_unbanded {
            drop_unbanded(&mut table);
        }
        sort_rows(&mut table, SortKey::ascending(SortBy::Dimension(Dimension::AgeBand)));

        let colors = gender_colors(&table);
        ViewOutput::new(
            self.kind(),
            "Average Review Ratings by Gender and Age Group",
            table,
            RenderHints {
                colors,
                ..RenderHints::default()
            },
        )
    }
}

// ============================================================================
// DEMOGRAPHIC LINES WITH OVERALL SERIES
// ============================================================================

pub struct DemographicLines {
    /// [0]: by age band and gender, [1]: by age band only.
    specs: [GroupSpec; 2],
    options: AdapterOptions,
}

impl DemographicLines {
    pub fn new(options: AdapterOptions) -> Result<Self, SpecError> {
        let by_gender = GroupSpec::new(
            vec![Dimension::AgeBand, Dimension::Gender],
            vec![Measure::mean(Metric::ReviewRating)],
        )?;
        let pooled = by_gender.without(Dimension::Gender)?;
        Ok(DemographicLines {
            specs: [by_gender, pooled],
            options,
        })
    }
}

impl ViewAdapter for DemographicLines {
    fn kind(&self) -> ViewKind {
        ViewKind::DemographicLines
    }

    fn clauses(&self) -> &[FilterClause] {
        &[FilterClause::Season, FilterClause::Region]
    }

    fn specs(&self) -> &[GroupSpec] {
        &self.specs
    }

    /// Genders and the Overall toggle only pick series after aggregation,
    /// but still change what is shown.
    fn inputs(&self) -> FilterInputs {
        FilterInputs::from_clauses(self.clauses()).union(FilterInputs {
            gender: true,
            overall: true,
            ..FilterInputs::NONE
        })
    }

    fn render(&self, state: &FilterState, mut tables: Vec<AggregateTable>) -> ViewOutput {
        let mut table = take_table(&mut tables, &self.specs, 0);
        let pooled = take_table(&mut tables, &self.specs, 1);

        // keep only the selected gender series
        if let Some(g) = table.dimension_index(Dimension::Gender) {
            table.rows.retain(|row| {
                row.keys[g]
                    .as_text()
                    .is_some_and(|gender| state.genders().contains(gender))
            });
        }

        if state.show_overall() {
            if let Some(b) = pooled.dimension_index(Dimension::AgeBand) {
                table.rows.extend(pooled.rows.into_iter().map(|row| AggregateRow {
                    keys: vec![row.keys[b].clone(), DimensionValue::text(OVERALL_LABEL)],
                    values: row.values,
                    count: row.count,
                }));
            }
        }

        if self.options.exclude_unbanded {
            drop_unbanded(&mut table);
        }
        sort_rows(&mut table, SortKey::ascending(SortBy::Dimension(Dimension::AgeBand)));

        let colors = gender_colors(&table);
        ViewOutput::new(
            self.kind(),
            "Average Review Rating by Age Group and Gender",
            table,
            RenderHints {
                colors,
                ..RenderHints::default()
            },
        )
    }
}
