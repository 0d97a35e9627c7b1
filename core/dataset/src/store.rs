//! FILENAME: core/dataset/src/store.rs
//! Dataset Store - the immutable, shared set of enriched records.
//!
//! A `Dataset` is built once at startup and handed to every consumer.
//! Cloning only bumps a reference count; the records themselves can
//! never be mutated after load.

use std::sync::Arc;

use crate::enrich::{enrich_records, EnrichedRecord, EnrichmentReport};
use crate::lookup::{AgeBands, RegionTable};
use crate::record::{Record, Season};

#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[EnrichedRecord]>,
    report: Arc<EnrichmentReport>,
}

impl Dataset {
    /// Enriches `records` and freezes the result.
    pub fn load(records: Vec<Record>, regions: &RegionTable, bands: &AgeBands) -> Self {
        let (enriched, report) = enrich_records(records, regions, bands);
        Dataset {
            records: enriched.into(),
            report: Arc::new(report),
        }
    }

    /// An empty dataset (no records, empty report).
    pub fn empty() -> Self {
        Dataset {
            records: Vec::<EnrichedRecord>::new().into(),
            report: Arc::new(EnrichmentReport::default()),
        }
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn report(&self) -> &EnrichmentReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct seasons in first-seen order.
    pub fn distinct_seasons(&self) -> Vec<Season> {
        let mut seasons = Vec::new();
        for r in self.records.iter() {
            if !seasons.contains(&r.record.season) {
                seasons.push(r.record.season);
            }
        }
        seasons
    }

    /// Distinct genders in first-seen order.
    pub fn distinct_genders(&self) -> Vec<String> {
        let mut genders: Vec<String> = Vec::new();
        for r in self.records.iter() {
            if !genders.iter().any(|g| g == &r.record.gender) {
                genders.push(r.record.gender.clone());
            }
        }
        genders
    }

    /// Whether two handles share the same underlying records.
    pub fn ptr_eq(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}
