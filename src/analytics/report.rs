use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{CustomerId, ProductId};

/// Aggregate statistics over one record set.
///
/// Always rebuilt from scratch; two reports over the same records compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateReport {
    pub record_count: usize,
    pub total_revenue: Decimal,
    /// Zero for an empty record set.
    pub average_order_value: Decimal,
    /// Earliest and latest transaction dates.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub regions: BTreeMap<String, RegionSummary>,
    /// Highest revenue first; at most `top_n` rows.
    pub top_products: Vec<ProductSummary>,
    /// Highest spend first; at most `top_n` rows.
    pub top_customers: Vec<CustomerSummary>,
    pub daily_trend: BTreeMap<NaiveDate, DailySummary>,
    /// `None` for an empty record set.
    pub peak_day: Option<PeakDay>,
    /// Products whose total quantity is below the configured threshold, lowest first.
    pub low_performers: Vec<ProductSummary>,
    pub enrichment: EnrichmentCoverage
}

impl AggregateReport {
    /// Regions ordered by revenue, highest first, ties by name.
    pub fn regions_by_revenue(&self) -> Vec<(&str, &RegionSummary)> {
        let mut regions: Vec<_> = self.regions.iter()
            .map(|(region, summary)| (region.as_str(), summary))
            .collect();

        regions.sort_by(|(left_name, left), (right_name, right)| {
            right.revenue.cmp(&left.revenue).then_with(|| left_name.cmp(right_name))
        });

        regions
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSummary {
    pub transaction_count: usize,
    pub revenue: Decimal,
    /// Share of total revenue in percent; zero when total revenue is zero.
    pub percentage: Decimal
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub product_id: ProductId,
    /// Alphabetically first name seen for the id.
    pub product_name: String,
    pub quantity: u64,
    pub revenue: Decimal
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSummary {
    pub customer_id: CustomerId,
    pub total_spent: Decimal,
    pub purchase_count: usize,
    pub average_order_value: Decimal,
    /// Distinct product names, sorted.
    pub products: Vec<String>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub revenue: Decimal,
    pub transaction_count: usize,
    pub unique_customers: usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakDay {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub transaction_count: usize
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrichmentCoverage {
    pub matched: usize,
    pub total: usize,
    /// Matched records in percent; zero for an empty record set.
    pub success_rate: Decimal,
    /// Distinct names of products without metadata, sorted.
    pub unmatched_products: Vec<String>
}
