use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use moka::future::Cache;
use serde::Deserialize;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::enrichment::{LookupError, MetadataSource};
use crate::models::{EnrichedTransaction, ProductMetadata, Transaction};
use crate::types::ProductId;

/// Tunables for the enrichment pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// When false, transactions pass through with metadata absent.
    pub enabled: bool,
    /// Base URL of the HTTP metadata provider.
    pub base_url: String,
    /// Upper bound for a single lookup attempt.
    pub timeout_ms: u64,
    /// Attempts per product id before giving up on it.
    pub max_attempts: u32,
    /// Delay before the second attempt; grows linearly per attempt.
    pub retry_backoff_ms: u64,
    /// Lookups allowed in flight at once.
    pub concurrency: usize
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://dummyjson.com".to_string(),
            timeout_ms: 2_000,
            max_attempts: 3,
            retry_backoff_ms: 100,
            concurrency: 8
        }
    }
}

impl EnrichmentConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pause before retrying after failed attempt number `attempt`; grows linearly.
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
            .checked_mul(attempt)
            .unwrap_or(Duration::MAX)
    }
}

/// Counters describing one enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnrichmentStats {
    pub enabled: bool,
    /// Distinct product ids the source was consulted for.
    pub distinct_lookups: usize,
    /// Calls made to the source, retries included.
    pub attempts: usize,
    /// Set once every attempt for some id found the provider unreachable.
    pub provider_down: bool
}

/// Joins transactions with product metadata from a [`MetadataSource`].
///
/// Each distinct product id is consulted at most once per enricher; concurrent
/// requests for the same id share a single lookup. Create one enricher per run.
pub struct Enricher<S: MetadataSource> {
    source: Arc<S>,
    config: EnrichmentConfig,
    cache: Cache<ProductId, Option<ProductMetadata>>,
    lookups: AtomicUsize,
    attempts: AtomicUsize,
    provider_down: AtomicBool
}

impl<S: MetadataSource> Enricher<S> {
    pub fn new(source: Arc<S>, config: EnrichmentConfig) -> Self {
        //NOTE: no max_capacity, an evicted id would be fetched a second time in the same run
        let cache = Cache::builder().build();

        Self {
            source,
            config,
            cache,
            lookups: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
            provider_down: AtomicBool::new(false)
        }
    }

    /// Produces one enriched record per input transaction, in input order.
    ///
    /// Lookup failures never drop a record; they leave its metadata absent.
    pub async fn enrich(&self, transactions: &[Transaction]) -> Vec<EnrichedTransaction> {
        if !self.config.enabled {
            info!("Enrichment disabled, passing {} transactions through", transactions.len());
            return passthrough(transactions);
        }

        //NOTE: `buffered` yields results in submission order regardless of completion order
        let metadata: Vec<Option<ProductMetadata>> = stream::iter(transactions)
            .map(|transaction| self.lookup(&transaction.product_id))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let enriched: Vec<EnrichedTransaction> = transactions.iter()
            .cloned()
            .zip(metadata)
            .map(|(transaction, metadata)| EnrichedTransaction::new(transaction, metadata))
            .collect();

        let matched = enriched.iter().filter(|record| record.is_matched()).count();
        info!("Enriched {matched}/{} transactions", enriched.len());

        enriched
    }

    pub fn stats(&self) -> EnrichmentStats {
        EnrichmentStats {
            enabled: self.config.enabled,
            distinct_lookups: self.lookups.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            provider_down: self.provider_down.load(Ordering::Relaxed)
        }
    }

    async fn lookup(&self, product_id: &str) -> Option<ProductMetadata> {
        self.cache
            .get_with(product_id.to_string(), self.fetch_with_retry(product_id))
            .await
    }

    async fn fetch_with_retry(&self, product_id: &str) -> Option<ProductMetadata> {
        if self.provider_down.load(Ordering::Relaxed) {
            debug!("Provider is down, skipping lookup for product [{product_id}]");
            return None;
        }

        self.lookups.fetch_add(1, Ordering::Relaxed);

        let attempts = self.config.max_attempts.max(1);
        let mut unreachable = 0;

        for attempt in 1..=attempts {
            self.attempts.fetch_add(1, Ordering::Relaxed);

            match timeout(self.config.timeout(), self.source.fetch(product_id)).await {
                Ok(Ok(metadata)) => {
                    debug!("Fetched metadata for product [{product_id}] on attempt {attempt}");
                    return Some(metadata);
                }
                Ok(Err(LookupError::NotFound { .. })) => {
                    debug!("No metadata for product [{product_id}]");
                    return None;
                }
                Ok(Err(error @ LookupError::Unreachable { .. })) => {
                    unreachable += 1;
                    warn!("Attempt {attempt}/{attempts} for product [{product_id}] failed: {error}");
                }
                Ok(Err(error)) => {
                    warn!("Attempt {attempt}/{attempts} for product [{product_id}] failed: {error}");
                }
                Err(_) => {
                    warn!("Attempt {attempt}/{attempts} for product [{product_id}] timed out after {:?}", self.config.timeout());
                }
            }

            if attempt < attempts {
                sleep(self.config.retry_delay(attempt)).await;
            }
        }

        if unreachable == attempts && !self.provider_down.swap(true, Ordering::Relaxed) {
            warn!("Metadata provider considered down, remaining products will not be enriched");
        }

        None
    }
}

/// Wraps every transaction without metadata.
fn passthrough(transactions: &[Transaction]) -> Vec<EnrichedTransaction> {
    transactions.iter().cloned().map(EnrichedTransaction::unenriched).collect()
}
