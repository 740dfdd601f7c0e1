use crate::enrichment::{HttpMetadataSource, InMemoryCatalog, LookupError, MetadataSource};
use crate::models::ProductMetadata;

/// The metadata sources the binary can be configured with.
pub enum MetadataProvider {
    Http(HttpMetadataSource),
    Catalog(InMemoryCatalog)
}

impl MetadataSource for MetadataProvider {
    async fn fetch(&self, product_id: &str) -> Result<ProductMetadata, LookupError> {
        match self {
            Self::Http(source) => source.fetch(product_id).await,
            Self::Catalog(catalog) => catalog.fetch(product_id).await
        }
    }
}
