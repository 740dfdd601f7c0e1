use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Product attributes sourced from the metadata provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default)]
    pub rating: f64
}

fn default_category() -> String {
    "General".to_string()
}

fn default_brand() -> String {
    "Generic".to_string()
}

/// A transaction joined with optional product metadata.
///
/// Enrichment never mutates the underlying transaction; an unmatched product
/// keeps `metadata` as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub metadata: Option<ProductMetadata>
}

impl EnrichedTransaction {
    pub fn new(transaction: Transaction, metadata: Option<ProductMetadata>) -> Self {
        Self { transaction, metadata }
    }

    /// Wraps a transaction without metadata, used when enrichment is skipped.
    pub fn unenriched(transaction: Transaction) -> Self {
        Self { transaction, metadata: None }
    }

    pub fn is_matched(&self) -> bool {
        self.metadata.is_some()
    }
}
