mod aggregator;
mod errors;
mod report;

pub use aggregator::{AnalyticsConfig, Aggregator};
pub use errors::AggregateError;
pub use report::{
    AggregateReport, CustomerSummary, DailySummary, EnrichmentCoverage, PeakDay, ProductSummary, RegionSummary
};
