use thiserror::Error;

use crate::types::ProductId;

#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("No metadata exists for product [{product_id}]")]
    NotFound {
        product_id: ProductId
    },
    #[error("Metadata for product [{product_id}] is unavailable: {reason}")]
    Unavailable {
        product_id: ProductId,
        reason: String
    },
    #[error("Metadata provider is unreachable: {reason}")]
    Unreachable {
        reason: String
    }
}

impl LookupError {
    pub fn not_found(product_id: &str) -> Self {
        Self::NotFound { product_id: product_id.to_string() }
    }

    pub fn unavailable(product_id: &str, reason: impl ToString) -> Self {
        Self::Unavailable {
            product_id: product_id.to_string(),
            reason: reason.to_string()
        }
    }

    pub fn unreachable(reason: impl ToString) -> Self {
        Self::Unreachable { reason: reason.to_string() }
    }
}
