//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree invariants.
/// Every variant carries the offending name so callers can show it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("parent node '{0}' not found")]
    ParentNotFound(String),

    #[error("node '{0}' not found")]
    NodeNotFound(String),

    #[error("a node named '{name}' already exists under '{parent}'")]
    DuplicateName { name: String, parent: String },

    #[error("cannot place '{node}' under '{target}': it would become its own ancestor")]
    CycleDetected { node: String, target: String },

    #[error("cannot delete root node '{0}'")]
    CannotDeleteRoot(String),

    #[error("node '{0}' has children")]
    HasChildren(String),

    #[error("node no longer exists: {0}")]
    StaleNode(String),

    #[error("invalid seed data: {0}")]
    InvalidSeed(String),
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
