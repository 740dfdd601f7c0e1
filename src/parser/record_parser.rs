use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::decoder::RawLine;
use crate::models::{RejectReason, Rejection, Transaction};
use crate::types::{parse_quantity, parse_unit_price, strip_commas};

/// Number of positional fields in a sales line.
pub const FIELD_COUNT: usize = 8;

const HEADER_ID: &str = "TransactionID";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of parsing every line of an input file.
///
/// `transactions.len() + rejections.len() == lines_read` always holds.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub transactions: Vec<Transaction>,
    pub rejections: Vec<Rejection>,
    /// Non-blank, non-header lines seen.
    pub lines_read: usize
}

/// Parses and validates raw lines, keeping input order in both outputs.
///
/// A first line whose id column reads `TransactionID` is treated as a header.
/// Bad lines are recorded and skipped; nothing here aborts the run.
pub fn parse_lines(lines: &[RawLine]) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let data_lines = match lines.first() {
        Some(first) if is_header(first) => {
            debug!("Skipping header on line {}", first.line_number);
            &lines[1..]
        }
        _ => lines
    };

    for line in data_lines {
        outcome.lines_read += 1;

        match parse_line(&line.fields) {
            Ok(transaction) => outcome.transactions.push(transaction),
            Err(reason) => {
                warn!("Rejected line {} (byte {}): {reason}", line.line_number, line.byte_offset);
                outcome.rejections.push(Rejection { line: line.line_number, reason });
            }
        }
    }

    debug!("Parsed {} valid and {} rejected lines", outcome.transactions.len(), outcome.rejections.len());

    outcome
}

/// Maps positional fields onto a validated [`Transaction`].
///
/// Field order: id, product id, product name, quantity, unit price, region,
/// customer id, date. Checks run in a fixed order (field count, id, numerics,
/// date, remaining required fields) and the first failure is reported.
pub fn parse_line<S: AsRef<str>>(fields: &[S]) -> Result<Transaction, RejectReason> {
    let [id, product_id, product_name, quantity, unit_price, region, customer_id, date] = fields else {
        return Err(RejectReason::FieldCount { expected: FIELD_COUNT, found: fields.len() });
    };

    let transaction_id = id.as_ref().trim();

    if transaction_id.is_empty() {
        return Err(RejectReason::MissingId);
    }

    let quantity_text = quantity.as_ref().trim();
    let quantity = parse_quantity(quantity_text)
        .map_err(|error| RejectReason::invalid_numeric("quantity", quantity_text, error))?;

    let unit_price_text = unit_price.as_ref().trim();
    let unit_price = parse_unit_price(unit_price_text)
        .map_err(|error| RejectReason::invalid_numeric("unit_price", unit_price_text, error))?;

    if Decimal::from(quantity).checked_mul(unit_price).is_none() {
        return Err(RejectReason::InvalidNumeric {
            field: "amount",
            value: format!("{quantity} x {unit_price}"),
            detail: "Amount overflows".to_string()
        });
    }

    let date_text = date.as_ref().trim();
    let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT)
        .map_err(|_| RejectReason::invalid_date(date_text))?;

    let product_id = required("product_id", product_id.as_ref())?;
    let region = required("region", region.as_ref())?;
    let customer_id = required("customer_id", customer_id.as_ref())?;

    Ok(Transaction {
        transaction_id: transaction_id.to_string(),
        product_id: product_id.to_string(),
        product_name: strip_commas(product_name.as_ref()).trim().to_string(),
        quantity,
        unit_price,
        region: region.to_string(),
        customer_id: customer_id.to_string(),
        date
    })
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, RejectReason> {
    let value = value.trim();

    if value.is_empty() {
        return Err(RejectReason::MissingField { field });
    }

    Ok(value)
}

fn is_header(line: &RawLine) -> bool {
    line.fields.first().is_some_and(|field| field.eq_ignore_ascii_case(HEADER_ID))
}
