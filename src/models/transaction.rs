use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{CustomerId, ProductId, TransactionId};

/// Represents a single validated row from the input sales file.
///
/// Values are only ever built by the record parser, which guarantees a
/// non-empty `transaction_id` and a strictly positive `quantity` and `unit_price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Identifier as written in the file. Uniqueness is not enforced.
    pub transaction_id: TransactionId,
    /// Local product identifier used as the enrichment key.
    pub product_id: ProductId,
    /// Display name with commas removed.
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub region: String,
    pub customer_id: CustomerId,
    pub date: NaiveDate
}

impl Transaction {
    /// Quantity multiplied by unit price.
    ///
    /// The parser rejects rows whose amount would overflow, so this never panics
    /// for a parsed transaction.
    pub fn amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}
