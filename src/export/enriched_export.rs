use std::io::Write;

use chrono::NaiveDate;
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::EnrichedTransaction;

const EXPORT_DELIMITER: u8 = b'|';

/// One line of the enriched data file. Absent metadata is written as empty fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "ProductID")]
    pub product_id: String,
    #[serde(rename = "ProductName")]
    pub product_name: String,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "UnitPrice")]
    pub unit_price: Decimal,
    #[serde(rename = "CustomerID")]
    pub customer_id: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "API_Category")]
    pub category: Option<String>,
    #[serde(rename = "API_Brand")]
    pub brand: Option<String>,
    #[serde(rename = "API_Rating")]
    pub rating: Option<f64>,
    #[serde(rename = "API_Match")]
    pub matched: bool
}

impl From<&EnrichedTransaction> for ExportRow {
    fn from(record: &EnrichedTransaction) -> Self {
        let transaction = &record.transaction;
        let metadata = record.metadata.as_ref();

        Self {
            transaction_id: transaction.transaction_id.clone(),
            date: transaction.date,
            product_id: transaction.product_id.clone(),
            product_name: transaction.product_name.clone(),
            quantity: transaction.quantity,
            unit_price: transaction.unit_price,
            customer_id: transaction.customer_id.clone(),
            region: transaction.region.clone(),
            category: metadata.map(|metadata| metadata.category.clone()),
            brand: metadata.map(|metadata| metadata.brand.clone()),
            rating: metadata.map(|metadata| metadata.rating),
            matched: metadata.is_some()
        }
    }
}

/// Flattens enriched records into export rows, one per record, in order.
pub fn produce_enriched_export<'a, I>(records: I) -> Vec<ExportRow>
where
    I: IntoIterator<Item = &'a EnrichedTransaction>
{
    records.into_iter().map(ExportRow::from).collect()
}

/// Writes rows as a `|`-delimited file with a header line.
pub fn write_enriched_export<W: Write>(writer: W, rows: &[ExportRow]) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(EXPORT_DELIMITER)
        .from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;

    Ok(())
}
