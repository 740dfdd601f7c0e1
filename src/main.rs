mod analytics;
mod config;
mod decoder;
mod engine;
mod enrichment;
mod export;
mod filter;
mod models;
mod parser;
mod types;

use std::fs::File;
use std::io::{stderr, stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::analytics::{Aggregator, AggregateReport};
use crate::config::PipelineConfig;
use crate::engine::{Dataset, SalesEngine};
use crate::enrichment::{HttpMetadataSource, InMemoryCatalog, MetadataProvider};
use crate::export::{produce_enriched_export, write_enriched_export};
use crate::filter::FilterCriteria;

/// Cleans, enriches and summarises a delimited sales-transaction file.
#[derive(Debug, Parser)]
#[command(name = "sales-analytics", version)]
struct Cli {
    /// Input sales file.
    input: PathBuf,
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Only report transactions from this region (case-insensitive).
    #[arg(long)]
    region: Option<String>,
    /// Only report transactions whose amount is at least this value.
    #[arg(long)]
    min_amount: Option<Decimal>,
    /// Only report transactions whose amount is at most this value.
    #[arg(long)]
    max_amount: Option<Decimal>,
    /// JSON file mapping product ids to metadata, used instead of the HTTP provider.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Skip enrichment entirely.
    #[arg(long)]
    no_enrich: bool,
    /// Write the enriched records to this file.
    #[arg(long)]
    export: Option<PathBuf>,
    /// error, warn, info, debug or trace.
    #[arg(long, default_value = "error")]
    log_level: String
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default()
    };

    if cli.no_enrich {
        config.enrichment.enabled = false;
    }

    let provider = match &cli.catalog {
        Some(path) => {
            let catalog = InMemoryCatalog::load(path)?;
            if catalog.is_empty() {
                warn!("Catalog at {} has no products, nothing will be enriched", path.display());
            }
            info!("Loaded {} products from catalog", catalog.len());
            MetadataProvider::Catalog(catalog)
        }
        None => MetadataProvider::Http(
            HttpMetadataSource::new(config.enrichment.base_url.clone(), config.enrichment.timeout())
                .context("Unable to build HTTP metadata client")?
        )
    };

    let aggregator = Aggregator::new(config.analytics.clone());
    let engine = SalesEngine::new(config, Arc::new(provider));

    let timer = Instant::now();
    let dataset = engine.run(&cli.input).await?;
    info!("Built dataset in: {:?}", timer.elapsed());

    let criteria = criteria_from(&cli);
    let view = dataset.view(&criteria);
    let report = aggregator.produce_report(view.iter().copied())?;

    if let Some(path) = &cli.export {
        let file = File::create(path)
            .with_context(|| format!("Unable to create export at path: {}", path.display()))?;
        write_enriched_export(BufWriter::new(file), &produce_enriched_export(view.iter().copied()))?;
        info!("Exported {} enriched records to {}", view.len(), path.display());
    }

    write_report_to_stdout(&dataset, &criteria, &report)?;

    Ok(())
}

fn criteria_from(cli: &Cli) -> FilterCriteria {
    let mut criteria = FilterCriteria::new();

    if let Some(region) = &cli.region {
        criteria = criteria.with_region(region);
    }
    if let Some(min_amount) = cli.min_amount {
        criteria = criteria.with_min_amount(min_amount);
    }
    if let Some(max_amount) = cli.max_amount {
        criteria = criteria.with_max_amount(max_amount);
    }

    criteria
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the report, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn write_report_to_stdout(dataset: &Dataset, criteria: &FilterCriteria, report: &AggregateReport) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    writeln!(output, "SALES ANALYTICS REPORT")?;
    writeln!(output, "encoding: {}", dataset.encoding)?;
    writeln!(
        output,
        "lines: {} | valid: {} | rejected: {}",
        dataset.lines_read,
        dataset.records.len(),
        dataset.rejections.len()
    )?;

    for (kind, count) in dataset.rejection_counts() {
        writeln!(output, "rejected {kind}: {count}")?;
    }
    for rejection in &dataset.rejections {
        writeln!(output, "  line {}: {}", rejection.line, rejection.reason)?;
    }

    writeln!(output, "regions: {}", dataset.regions().join(", "))?;

    if !criteria.is_unconstrained() {
        writeln!(output, "filtered records: {}", report.record_count)?;
    }

    writeln!(output)?;
    writeln!(output, "total revenue: {}", money(report.total_revenue))?;
    writeln!(output, "transactions: {}", report.record_count)?;
    writeln!(output, "average order value: {}", money(report.average_order_value))?;
    match report.date_range {
        Some((first, last)) => writeln!(output, "date range: {first} to {last}")?,
        None => writeln!(output, "date range: n/a")?
    }

    writeln!(output)?;
    writeln!(output, "region|transactions|revenue|percentage")?;
    for (region, summary) in report.regions_by_revenue() {
        writeln!(
            output,
            "{region}|{}|{}|{}",
            summary.transaction_count,
            money(summary.revenue),
            money(summary.percentage)
        )?;
    }

    writeln!(output)?;
    writeln!(output, "rank|product|name|quantity|revenue")?;
    for (rank, product) in report.top_products.iter().enumerate() {
        writeln!(
            output,
            "{}|{}|{}|{}|{}",
            rank + 1,
            product.product_id,
            product.product_name,
            product.quantity,
            money(product.revenue)
        )?;
    }

    writeln!(output)?;
    writeln!(output, "rank|customer|purchases|spent|average|products")?;
    for (rank, customer) in report.top_customers.iter().enumerate() {
        writeln!(
            output,
            "{}|{}|{}|{}|{}|{}",
            rank + 1,
            customer.customer_id,
            customer.purchase_count,
            money(customer.total_spent),
            money(customer.average_order_value),
            customer.products.len()
        )?;
    }

    writeln!(output)?;
    writeln!(output, "date|revenue|orders|customers")?;
    for (date, day) in &report.daily_trend {
        writeln!(output, "{date}|{}|{}|{}", money(day.revenue), day.transaction_count, day.unique_customers)?;
    }

    match &report.peak_day {
        Some(peak) => writeln!(output, "peak day: {} ({})", peak.date, money(peak.revenue))?,
        None => writeln!(output, "peak day: n/a")?
    }

    let low: Vec<_> = report.low_performers.iter().map(|product| product.product_name.as_str()).collect();
    writeln!(output, "low performers: {}", if low.is_empty() { "none".to_string() } else { low.join(", ") })?;

    writeln!(output)?;
    if dataset.enrichment.enabled {
        writeln!(
            output,
            "enriched: {}/{} ({:.1}%)",
            report.enrichment.matched,
            report.enrichment.total,
            report.enrichment.success_rate.round_dp(1)
        )?;
        if dataset.enrichment.provider_down {
            writeln!(output, "metadata provider unreachable, remaining records not enriched")?;
        }
        if !report.enrichment.unmatched_products.is_empty() {
            writeln!(output, "unmatched products: {}", report.enrichment.unmatched_products.join(", "))?;
        }
    } else {
        writeln!(output, "enrichment: skipped")?;
    }

    output.flush()?;

    Ok(())
}
