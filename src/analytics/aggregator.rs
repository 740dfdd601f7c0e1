use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::analytics::{
    AggregateError, AggregateReport, CustomerSummary, DailySummary, EnrichmentCoverage, PeakDay, ProductSummary, RegionSummary
};
use crate::models::EnrichedTransaction;

/// Context for report generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Rows kept in the top products and top customers rankings.
    pub top_n: usize,
    /// Products selling fewer units than this are reported as low performers.
    pub low_performer_threshold: u64
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            low_performer_threshold: 10
        }
    }
}

/// Computes [`AggregateReport`]s. Holds no state between calls.
pub struct Aggregator {
    config: AnalyticsConfig
}

#[derive(Default)]
struct ProductTotals<'a> {
    name: Option<&'a str>,
    quantity: u64,
    revenue: Decimal
}

#[derive(Default)]
struct CustomerTotals<'a> {
    spent: Decimal,
    purchases: usize,
    products: BTreeSet<&'a str>
}

#[derive(Default)]
struct DailyTotals<'a> {
    revenue: Decimal,
    transactions: usize,
    customers: HashSet<&'a str>
}

impl Aggregator {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Builds a report from `records`, which may be a filtered view or the full set.
    ///
    /// An empty record set is valid and yields a zero-valued report.
    ///
    /// # Errors
    /// Fails if any revenue sum leaves the range of [`Decimal`]; no partial report is produced.
    pub fn produce_report<'a, I>(&self, records: I) -> Result<AggregateReport, AggregateError>
    where
        I: IntoIterator<Item = &'a EnrichedTransaction>
    {
        let records: Vec<&EnrichedTransaction> = records.into_iter().collect();

        let mut total_revenue = Decimal::ZERO;
        let mut regions = BTreeMap::<&str, (usize, Decimal)>::new();
        let mut products = HashMap::<&str, ProductTotals>::new();
        let mut customers = HashMap::<&str, CustomerTotals>::new();
        let mut days = BTreeMap::<NaiveDate, DailyTotals>::new();

        for record in &records {
            let transaction = &record.transaction;
            let amount = transaction.amount();

            accumulate(&mut total_revenue, amount, "total", "all")?;

            let region = regions.entry(transaction.region.as_str()).or_default();
            region.0 += 1;
            accumulate(&mut region.1, amount, "region", &transaction.region)?;

            let product = products.entry(transaction.product_id.as_str()).or_default();
            let name = transaction.product_name.as_str();
            product.name = Some(product.name.map_or(name, |current| current.min(name)));
            product.quantity += u64::from(transaction.quantity);
            accumulate(&mut product.revenue, amount, "product", &transaction.product_id)?;

            let customer = customers.entry(transaction.customer_id.as_str()).or_default();
            customer.purchases += 1;
            customer.products.insert(name);
            accumulate(&mut customer.spent, amount, "customer", &transaction.customer_id)?;

            let day = days.entry(transaction.date).or_default();
            day.transactions += 1;
            day.customers.insert(transaction.customer_id.as_str());
            accumulate(&mut day.revenue, amount, "day", transaction.date)?;
        }

        let regions = regions.into_iter()
            .map(|(region, (transaction_count, revenue))| {
                let summary = RegionSummary {
                    transaction_count,
                    revenue,
                    percentage: percentage(revenue, total_revenue)
                };
                (region.to_string(), summary)
            })
            .collect();

        let mut product_rows: Vec<ProductSummary> = products.into_iter()
            .map(|(product_id, totals)| ProductSummary {
                product_id: product_id.to_string(),
                product_name: totals.name.unwrap_or_default().to_string(),
                quantity: totals.quantity,
                revenue: totals.revenue
            })
            .collect();

        let low_performers = self.low_performers(&product_rows);

        product_rows.sort_by(|left, right| {
            right.revenue.cmp(&left.revenue)
                .then_with(|| left.product_name.cmp(&right.product_name))
                .then_with(|| left.product_id.cmp(&right.product_id))
        });
        product_rows.truncate(self.config.top_n);

        let mut customer_rows: Vec<CustomerSummary> = customers.into_iter()
            .map(|(customer_id, totals)| CustomerSummary {
                customer_id: customer_id.to_string(),
                total_spent: totals.spent,
                purchase_count: totals.purchases,
                average_order_value: average(totals.spent, totals.purchases),
                products: totals.products.into_iter().map(str::to_string).collect()
            })
            .collect();

        customer_rows.sort_by(|left, right| {
            right.total_spent.cmp(&left.total_spent)
                .then_with(|| left.customer_id.cmp(&right.customer_id))
        });
        customer_rows.truncate(self.config.top_n);

        let daily_trend: BTreeMap<NaiveDate, DailySummary> = days.into_iter()
            .map(|(date, totals)| {
                let summary = DailySummary {
                    revenue: totals.revenue,
                    transaction_count: totals.transactions,
                    unique_customers: totals.customers.len()
                };
                (date, summary)
            })
            .collect();

        let report = AggregateReport {
            record_count: records.len(),
            total_revenue,
            average_order_value: average(total_revenue, records.len()),
            date_range: date_range(&daily_trend),
            regions,
            top_products: product_rows,
            top_customers: customer_rows,
            peak_day: peak_day(&daily_trend),
            daily_trend,
            low_performers,
            enrichment: coverage(&records)
        };

        debug!("Aggregated {} records with total revenue {}", report.record_count, report.total_revenue);

        Ok(report)
    }

    fn low_performers(&self, products: &[ProductSummary]) -> Vec<ProductSummary> {
        let mut low: Vec<ProductSummary> = products.iter()
            .filter(|product| product.quantity < self.config.low_performer_threshold)
            .cloned()
            .collect();

        low.sort_by(|left, right| {
            left.quantity.cmp(&right.quantity)
                .then_with(|| left.product_name.cmp(&right.product_name))
                .then_with(|| left.product_id.cmp(&right.product_id))
        });

        low
    }
}

fn accumulate(total: &mut Decimal, amount: Decimal, scope: &'static str, key: impl ToString) -> Result<(), AggregateError> {
    *total = total.checked_add(amount)
        .ok_or_else(|| AggregateError::revenue_overflow(scope, key))?;

    Ok(())
}

fn average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }

    total.checked_div(Decimal::from(count)).unwrap_or(Decimal::ZERO)
}

fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }

    //NOTE: divide first, part never exceeds whole so scaling the ratio cannot overflow
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

fn date_range(daily_trend: &BTreeMap<NaiveDate, DailySummary>) -> Option<(NaiveDate, NaiveDate)> {
    let first = daily_trend.keys().next()?;
    let last = daily_trend.keys().next_back()?;
    Some((*first, *last))
}

/// Highest-revenue day; iteration is in date order, so only a strictly greater
/// revenue replaces the current peak and ties keep the earliest date.
fn peak_day(daily_trend: &BTreeMap<NaiveDate, DailySummary>) -> Option<PeakDay> {
    let mut peak: Option<PeakDay> = None;

    for (date, summary) in daily_trend {
        if peak.as_ref().is_none_or(|current| summary.revenue > current.revenue) {
            peak = Some(PeakDay {
                date: *date,
                revenue: summary.revenue,
                transaction_count: summary.transaction_count
            });
        }
    }

    peak
}

fn coverage(records: &[&EnrichedTransaction]) -> EnrichmentCoverage {
    let matched = records.iter().filter(|record| record.is_matched()).count();

    let unmatched_products: BTreeSet<&str> = records.iter()
        .filter(|record| !record.is_matched())
        .map(|record| record.transaction.product_name.as_str())
        .collect();

    EnrichmentCoverage {
        matched,
        total: records.len(),
        success_rate: percentage(Decimal::from(matched), Decimal::from(records.len())),
        unmatched_products: unmatched_products.into_iter().map(str::to_string).collect()
    }
}
