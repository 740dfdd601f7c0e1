use rust_decimal::Decimal;

use crate::models::EnrichedTransaction;

/// Predicates for one query over the cleaned set.
///
/// Every specified predicate must hold; unspecified ones impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Compared case-insensitively against the whole region name.
    pub region: Option<String>,
    /// Inclusive lower bound on the amount.
    pub min_amount: Option<Decimal>,
    /// Inclusive upper bound on the amount.
    pub max_amount: Option<Decimal>
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the region predicate; a blank region means no constraint.
    pub fn with_region(mut self, region: impl AsRef<str>) -> Self {
        let region = region.as_ref().trim();
        self.region = (!region.is_empty()).then(|| region.to_lowercase());
        self
    }

    pub fn with_min_amount(mut self, min_amount: Decimal) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_max_amount(mut self, max_amount: Decimal) -> Self {
        self.max_amount = Some(max_amount);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.region.is_none() && self.min_amount.is_none() && self.max_amount.is_none()
    }

    pub fn matches(&self, record: &EnrichedTransaction) -> bool {
        let transaction = &record.transaction;

        if let Some(region) = &self.region {
            if transaction.region.to_lowercase() != region.to_lowercase() {
                return false;
            }
        }

        if self.min_amount.is_none() && self.max_amount.is_none() {
            return true;
        }

        let amount = transaction.amount();

        self.min_amount.is_none_or(|min_amount| amount >= min_amount)
            && self.max_amount.is_none_or(|max_amount| amount <= max_amount)
    }

    /// Returns the matching records in input order, leaving the input untouched.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a EnrichedTransaction>
    where
        I: IntoIterator<Item = &'a EnrichedTransaction>
    {
        records.into_iter().filter(|record| self.matches(record)).collect()
    }
}
