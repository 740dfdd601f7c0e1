use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::task::spawn_blocking;
use tracing::info;

use crate::config::PipelineConfig;
use crate::decoder::{decode, DecodeError};
use crate::engine::Dataset;
use crate::enrichment::{Enricher, MetadataSource};
use crate::parser::parse_lines;

/// Runs decode, parse and enrichment once to build a [`Dataset`].
pub struct SalesEngine<S: MetadataSource> {
    config: PipelineConfig,
    enricher: Enricher<S>
}

impl<S: MetadataSource> SalesEngine<S> {
    pub fn new(config: PipelineConfig, source: Arc<S>) -> Self {
        let enricher = Enricher::new(source, config.enrichment.clone());

        Self { config, enricher }
    }

    /// Reads the file at `path` and builds its dataset.
    ///
    /// # Errors
    /// Fails if the file cannot be read or no configured encoding can decode it.
    pub async fn run(&self, path: impl Into<PathBuf>) -> anyhow::Result<Dataset> {
        let path = path.into();
        let shown = path.display().to_string();

        let bytes = spawn_blocking(move || fs::read(path))
            .await
            .context("Input reader task failed")?
            .with_context(|| format!("Error opening input at path: {shown}"))?;

        info!("Read {} bytes from {shown}", bytes.len());

        Ok(self.ingest(&bytes).await?)
    }

    /// Builds a dataset from raw input bytes.
    ///
    /// Only a total decode failure is an error; bad lines are collected as rejections.
    pub async fn ingest(&self, bytes: &[u8]) -> Result<Dataset, DecodeError> {
        let decoded = decode(bytes, &self.config.input.encodings)?;
        info!("Decoded input using {}", decoded.encoding);

        let outcome = parse_lines(&decoded.raw_lines(self.config.input.delimiter));
        info!(
            "Read {} lines: {} valid, {} rejected",
            outcome.lines_read,
            outcome.transactions.len(),
            outcome.rejections.len()
        );

        let records = self.enricher.enrich(&outcome.transactions).await;

        Ok(Dataset {
            encoding: decoded.encoding,
            records,
            rejections: outcome.rejections,
            lines_read: outcome.lines_read,
            enrichment: self.enricher.stats()
        })
    }
}
