//! FILENAME: core/dataset/src/enrich.rs
//! Dimension enrichment: derives region codes and age bands once per load.

use serde::{Deserialize, Serialize};

use crate::lookup::{AgeBand, AgeBands, RegionCode, RegionTable};
use crate::record::Record;

/// A record together with its derived dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub record: Record,
    pub region_code: RegionCode,
    pub age_band: AgeBand,
}

impl EnrichedRecord {
    pub fn enrich(record: Record, regions: &RegionTable, bands: &AgeBands) -> Self {
        let region_code = regions.lookup(&record.region);
        let age_band = bands.band_for(record.age);
        EnrichedRecord { record, region_code, age_band }
    }
}

/// Summary of the data anomalies absorbed during enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentReport {
    pub record_count: usize,

    /// Distinct region names without a code, in first-seen order.
    pub unmapped_regions: Vec<String>,

    /// Number of records whose region has no code.
    pub unmapped_record_count: usize,

    /// Number of records whose age fell outside the banded domain.
    pub unbanded_record_count: usize,
}

impl EnrichmentReport {
    pub fn has_anomalies(&self) -> bool {
        self.unmapped_record_count > 0 || self.unbanded_record_count > 0
    }
}

/// Enriches every record in order.
pub fn enrich_records(
    records: Vec<Record>,
    regions: &RegionTable,
    bands: &AgeBands,
) -> (Vec<EnrichedRecord>, EnrichmentReport) {
    let mut report = EnrichmentReport {
        record_count: records.len(),
        ..EnrichmentReport::default()
    };

    let enriched = records
        .into_iter()
        .map(|record| {
            let enriched = EnrichedRecord::enrich(record, regions, bands);
            if enriched.region_code.is_missing() {
                report.unmapped_record_count += 1;
                if !report.unmapped_regions.contains(&enriched.record.region) {
                    report.unmapped_regions.push(enriched.record.region.clone());
                }
            }
            if enriched.age_band.is_unbanded() {
                report.unbanded_record_count += 1;
            }
            enriched
        })
        .collect();

    (enriched, report)
}
