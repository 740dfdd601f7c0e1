mod enriched;
mod errors;
mod transaction;

pub use enriched::{EnrichedTransaction, ProductMetadata};
pub use errors::{RejectReason, Rejection};
pub use transaction::Transaction;
