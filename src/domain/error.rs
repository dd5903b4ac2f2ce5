//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated input contracts of tree operations.
///
/// Every failure is local and terminal for the call: no partial results
/// are returned and nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Traversal data or literal structure cannot describe a binary tree.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The caller broke a documented precondition (missing node, empty tree, ...).
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;
