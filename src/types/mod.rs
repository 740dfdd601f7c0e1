mod errors;
mod numeric;

pub use errors::NumericError;
pub use numeric::{parse_quantity, parse_unit_price, strip_commas};

pub type TransactionId = String;
pub type ProductId = String;
pub type CustomerId = String;
