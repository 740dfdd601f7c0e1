use super::SalesEngine;

use anyhow::{anyhow, Result};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::NamedTempFile;

use crate::analytics::{Aggregator, AnalyticsConfig};
use crate::config::PipelineConfig;
use crate::decoder::{DecodeError, SourceEncoding};
use crate::enrichment::InMemoryCatalog;
use crate::filter::FilterCriteria;
use crate::models::ProductMetadata;

const SALES: &str = "TransactionID|ProductID|ProductName|Quantity|UnitPrice|Region|CustomerID|Date\n\
                     T001|P101|Laptop|2|45,000.00|North|C001|2024-12-01\n\
                     T002|P102|Mouse,Wireless|10|500.00|South|C002|2024-12-01\n\
                     T003|P101|Laptop|1|45,000.00|south|C003|2024-12-02\n\
                     T004|P103|Keyboard|0|1,500.00|East|C001|2024-12-02\n\
                     |P104|Monitor|1|12,000.00|West|C004|2024-12-03\n\
                     T006|P104|Monitor|1|12,000.00|West|C004|2024-12-31\n";

fn create_temporary_input(content: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content)?;
    Ok(file)
}

fn catalog() -> Arc<InMemoryCatalog> {
    let mut catalog = InMemoryCatalog::new();
    catalog.insert("P101", ProductMetadata {
        category: "laptops".to_string(),
        brand: "Apple".to_string(),
        rating: 4.7
    });
    Arc::new(catalog)
}

#[tokio::test]
async fn test_engine_builds_dataset_from_file() -> Result<()> {
    let file = create_temporary_input(SALES.as_bytes())?;
    let engine = SalesEngine::new(PipelineConfig::default(), catalog());

    let dataset = engine.run(file.path()).await?;

    assert_eq!(dataset.encoding, SourceEncoding::Utf8);
    assert_eq!(dataset.lines_read, 6);
    assert_eq!(dataset.records.len() + dataset.rejections.len(), dataset.lines_read);
    assert_eq!(dataset.records.len(), 4);
    assert_eq!(dataset.rejection_counts().get("InvalidNumeric"), Some(&1));
    assert_eq!(dataset.rejection_counts().get("MissingId"), Some(&1));
    assert_eq!(dataset.records.iter().filter(|record| record.is_matched()).count(), 2);
    assert_eq!(dataset.enrichment.distinct_lookups, 3);
    assert_eq!(dataset.regions(), vec!["North", "South", "West", "south"]);

    Ok(())
}

#[tokio::test]
async fn test_engine_repeated_filtering_reuses_parsed_dataset() -> Result<()> {
    let engine = SalesEngine::new(PipelineConfig::default(), catalog());
    let dataset = engine.ingest(SALES.as_bytes()).await?;
    let aggregator = Aggregator::new(AnalyticsConfig::default());

    let south = FilterCriteria::new().with_region("SOUTH");
    let first = aggregator.produce_report(dataset.view(&south))?;
    let second = aggregator.produce_report(dataset.view(&south))?;

    assert_eq!(first, second);
    assert_eq!(first.record_count, 2);
    assert_eq!(first.total_revenue, Decimal::from_str("50000.00")?);

    let everything = aggregator.produce_report(dataset.view(&FilterCriteria::new()))?;
    assert_eq!(everything.total_revenue, Decimal::from_str("152000.00")?);

    let peak = everything.peak_day.ok_or_else(|| anyhow!("peak day missing"))?;
    assert_eq!(peak.revenue, Decimal::from_str("95000.00")?);

    Ok(())
}

#[tokio::test]
async fn test_engine_decodes_legacy_encoded_input() -> Result<()> {
    let content = b"T001|P101|Caf\xE9 Latte|1|4.50|North|C001|2024-12-01\n";
    let engine = SalesEngine::new(PipelineConfig::default(), catalog());

    let dataset = engine.ingest(content).await?;

    assert_eq!(dataset.encoding, SourceEncoding::Latin1);
    assert_eq!(dataset.records[0].transaction.product_name, "Café Latte");

    Ok(())
}

#[tokio::test]
async fn test_engine_fails_when_no_encoding_fits() -> Result<()> {
    let mut config = PipelineConfig::default();
    config.input.encodings = vec![SourceEncoding::Utf8];

    let engine = SalesEngine::new(config, catalog());
    let result = engine.ingest(b"T001|P101|Caf\xE9|1|4.50|North|C001|2024-12-01").await;

    assert!(matches!(result, Err(DecodeError::Exhausted { .. })));

    Ok(())
}

#[tokio::test]
async fn test_engine_reports_missing_input_file() {
    let engine = SalesEngine::new(PipelineConfig::default(), catalog());

    assert!(engine.run("missing-sales-data.txt").await.is_err());
}

#[tokio::test]
async fn test_engine_skips_enrichment_when_disabled() -> Result<()> {
    let mut config = PipelineConfig::default();
    config.enrichment.enabled = false;

    let engine = SalesEngine::new(config, catalog());
    let dataset = engine.ingest(SALES.as_bytes()).await?;

    assert_eq!(dataset.records.len(), 4);
    assert!(dataset.records.iter().all(|record| !record.is_matched()));
    assert_eq!(dataset.enrichment.distinct_lookups, 0);
    assert!(!dataset.enrichment.enabled);

    Ok(())
}
