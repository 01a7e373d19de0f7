pub mod json_backend;
pub mod memory;

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::Identifiable, errors::CollaboratorError};

pub type Result<T> = std::result::Result<T, CollaboratorError>;

/// Opaque owner of a partition of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-user collections mirrored by the ledger store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Accounts,
    Categories,
    Budgets,
    Transactions,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Accounts,
        Collection::Categories,
        Collection::Budgets,
        Collection::Transactions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Accounts => "accounts",
            Collection::Categories => "categories",
            Collection::Budgets => "budgets",
            Collection::Transactions => "transactions",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored record: its id plus the serialized entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub body: serde_json::Value,
}

impl Document {
    pub fn encode<T>(entity: &T) -> Result<Self>
    where
        T: Serialize + Identifiable,
    {
        Ok(Self {
            id: entity.id(),
            body: serde_json::to_value(entity)?,
        })
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

/// Remote per-user document store. Every call either completes or reports an explicit failure.
pub trait StorageBackend: Send + Sync {
    fn create(&self, user: &UserId, collection: Collection, document: Document) -> Result<()>;
    fn read_all(&self, user: &UserId, collection: Collection) -> Result<Vec<Document>>;
    /// Replaces the document with the same id; fails if it is not stored.
    fn update(&self, user: &UserId, collection: Collection, document: Document) -> Result<()>;
    /// Removing an id that is not stored succeeds.
    fn delete(&self, user: &UserId, collection: Collection, id: Uuid) -> Result<()>;
}

pub(crate) fn missing_document(collection: Collection, id: Uuid) -> CollaboratorError {
    CollaboratorError::MissingDocument {
        collection: collection.name(),
        id,
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
