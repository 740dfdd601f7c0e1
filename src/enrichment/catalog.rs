use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::enrichment::{LookupError, MetadataSource};
use crate::models::ProductMetadata;
use crate::types::ProductId;

/// Metadata held in memory, keyed by local product id.
///
/// Backs offline runs (`--catalog`) and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, ProductMetadata>
}

impl InMemoryCatalog {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON object mapping product ids to metadata.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Unable to read catalog at path: {}", path.display()))?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid catalog at path: {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let products: HashMap<ProductId, ProductMetadata> = serde_json::from_str(content)?;
        Ok(Self { products })
    }

    #[cfg(test)]
    pub fn insert(&mut self, product_id: impl Into<ProductId>, metadata: ProductMetadata) {
        self.products.insert(product_id.into(), metadata);
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl MetadataSource for InMemoryCatalog {
    async fn fetch(&self, product_id: &str) -> Result<ProductMetadata, LookupError> {
        self.products.get(product_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found(product_id))
    }
}
