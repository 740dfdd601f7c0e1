use std::collections::BTreeMap;

use crate::decoder::SourceEncoding;
use crate::enrichment::EnrichmentStats;
use crate::filter::FilterCriteria;
use crate::models::{EnrichedTransaction, Rejection};

/// The cleaned, enriched record set for one input file.
///
/// Built once per run and never mutated; filtering and aggregation borrow from it.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub encoding: SourceEncoding,
    pub records: Vec<EnrichedTransaction>,
    pub rejections: Vec<Rejection>,
    /// Non-blank data lines read from the input.
    pub lines_read: usize,
    pub enrichment: EnrichmentStats
}

impl Dataset {
    pub fn view(&self, criteria: &FilterCriteria) -> Vec<&EnrichedTransaction> {
        criteria.apply(&self.records)
    }

    /// Rejected line counts keyed by reason kind.
    pub fn rejection_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();

        for rejection in &self.rejections {
            *counts.entry(rejection.reason.kind()).or_insert(0) += 1;
        }

        counts
    }

    /// Sorted distinct regions of the valid records.
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self.records.iter()
            .map(|record| record.transaction.region.as_str())
            .collect();

        regions.sort_unstable();
        regions.dedup();
        regions
    }
}
