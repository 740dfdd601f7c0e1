mod catalog;
mod enricher;
mod errors;
mod http_source;
mod provider;

use std::future::Future;

use crate::models::ProductMetadata;

pub use catalog::InMemoryCatalog;
pub use enricher::{Enricher, EnrichmentConfig, EnrichmentStats};
pub use errors::LookupError;
pub use http_source::HttpMetadataSource;
pub use provider::MetadataProvider;

/// Capability to look up product metadata by local product id.
///
/// The enricher depends only on this seam, never on a transport.
pub trait MetadataSource: Send + Sync + 'static {
    fn fetch(&self, product_id: &str) -> impl Future<Output = Result<ProductMetadata, LookupError>> + Send;
}
