// allocation-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid sku: {0}")]
    #[diagnostic(
        code(allocation::domain::invalid_sku),
        help("Create a batch for this SKU first (add-batch).")
    )]
    InvalidSku(String),

    #[error("Unknown batch reference: {0}")]
    #[diagnostic(code(allocation::domain::unknown_batch))]
    UnknownBatch(String),
}
