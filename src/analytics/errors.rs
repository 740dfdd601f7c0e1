use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Revenue for {scope} [{key}] exceeds the representable range")]
    RevenueOverflow {
        scope: &'static str,
        key: String
    }
}

impl AggregateError {
    pub fn revenue_overflow(scope: &'static str, key: impl ToString) -> Self {
        Self::RevenueOverflow {
            scope,
            key: key.to_string()
        }
    }
}
