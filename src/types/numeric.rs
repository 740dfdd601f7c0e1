use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::types::errors::NumericError;

/// Removes every comma from `value`, borrowing when there is nothing to remove.
///
/// Commas show up both as thousands separators ("1,200") and as stray
/// formatting in product names; neither is an error.
pub fn strip_commas(value: &str) -> Cow<'_, str> {
    if value.contains(',') {
        Cow::Owned(value.replace(',', ""))
    } else {
        Cow::Borrowed(value)
    }
}

/// Parses a strictly positive whole quantity.
pub fn parse_quantity(value: &str) -> Result<u32, NumericError> {
    let cleaned = strip_commas(value.trim());

    if cleaned.is_empty() {
        return Err(NumericError::InvalidFormat("Quantity is an empty string".to_string()));
    }

    //NOTE: Parsed as signed first so "-1" is reported as non-positive rather than malformed
    let quantity: i64 = cleaned.parse()?;

    if quantity <= 0 {
        return Err(NumericError::NotPositive(format!("Quantity {quantity}")));
    }

    u32::try_from(quantity)
        .map_err(|_| NumericError::InvalidFormat(format!("Quantity {quantity} is too large")))
}

/// Parses a strictly positive decimal price.
pub fn parse_unit_price(value: &str) -> Result<Decimal, NumericError> {
    let cleaned = strip_commas(value.trim());

    if cleaned.is_empty() {
        return Err(NumericError::InvalidFormat("Unit price is an empty string".to_string()));
    }

    let price = Decimal::from_str(&cleaned).map_err(|error| {
        NumericError::InvalidFormat(format!("Unit price has an invalid format: {error}"))
    })?;

    if price <= Decimal::ZERO {
        return Err(NumericError::NotPositive(format!("Unit price {price}")));
    }

    Ok(price)
}
