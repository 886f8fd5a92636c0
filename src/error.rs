//! Error types for sitepatch.
//!
//! Most operations in this crate are deliberately fail-soft: extraction
//! degrades to a placeholder model and generation/reconciliation skip
//! unresolvable units. These errors cover the remaining hard failures.

/// Error type for extraction, generation and reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input document was empty or whitespace-only.
    #[error("empty HTML document")]
    EmptyDocument,

    /// A page definition failed validation before any parsing happened.
    #[error("invalid page definition: {0}")]
    InvalidDefinition(String),
}

/// Result type alias for sitepatch operations.
pub type Result<T> = std::result::Result<T, Error>;
