use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: Uuid },
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(entity: EntityKind, id: Uuid) -> Self {
        LedgerError::NotFound { entity, id }
    }

    /// True when the failure came from an external collaborator rather than the caller's input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LedgerError::Collaborator(_))
    }
}

/// Failures reported by persistence or search collaborators.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("{collection} document {id} is not stored")]
    MissingDocument {
        collection: &'static str,
        id: Uuid,
    },
    #[error("Collaborator timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    TimedOut { elapsed_ms: u128, limit_ms: u128 },
}

/// Entity families owned by the ledger store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Account,
    Category,
    Budget,
    Transaction,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Account => "Account",
            EntityKind::Category => "Category",
            EntityKind::Budget => "Budget",
            EntityKind::Transaction => "Transaction",
        };
        f.write_str(label)
    }
}
