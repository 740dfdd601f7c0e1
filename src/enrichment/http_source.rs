use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::enrichment::{LookupError, MetadataSource};
use crate::models::ProductMetadata;

/// Looks products up in a DummyJSON-compatible catalogue over HTTP.
///
/// Local ids carry a one-letter prefix ("P101"); the remainder is the remote
/// numeric id, fetched from `{base_url}/products/{id}`.
pub struct HttpMetadataSource {
    client: Client,
    base_url: String
}

impl HttpMetadataSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string()
        })
    }

    /// Remote URL for a local product id, or `None` when the id has no numeric part.
    pub fn product_url(&self, product_id: &str) -> Option<String> {
        let remote_id: u32 = product_id.get(1..)?.parse().ok()?;
        Some(format!("{}/products/{remote_id}", self.base_url))
    }
}

impl MetadataSource for HttpMetadataSource {
    async fn fetch(&self, product_id: &str) -> Result<ProductMetadata, LookupError> {
        let Some(url) = self.product_url(product_id) else {
            return Err(LookupError::not_found(product_id));
        };

        debug!("Requesting metadata for product [{product_id}] from {url}");

        let response = self.client.get(&url).send().await.map_err(|error| {
            if error.is_connect() {
                LookupError::unreachable(error)
            } else {
                LookupError::unavailable(product_id, error)
            }
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(LookupError::not_found(product_id)),
            status if !status.is_success() => {
                Err(LookupError::unavailable(product_id, format!("HTTP status {status}")))
            }
            _ => response.json::<ProductMetadata>().await
                .map_err(|error| LookupError::unavailable(product_id, error))
        }
    }
}
