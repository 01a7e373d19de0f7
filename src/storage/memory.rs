use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use uuid::Uuid;

use crate::errors::CollaboratorError;

use super::{missing_document, Collection, Document, Result, StorageBackend, UserId};

type Partition = HashMap<(UserId, Collection), Vec<Document>>;

/// Process-local backend. Documents keep their insertion order.
#[derive(Default)]
pub struct MemoryStorage {
    partitions: Mutex<Partition>,
    offline: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing the connection: every call fails with `Unavailable` until restored.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn document_count(&self, user: &UserId, collection: Collection) -> usize {
        self.partitions
            .lock()
            .map(|guard| {
                guard
                    .get(&(user.clone(), collection))
                    .map_or(0, |docs| docs.len())
            })
            .unwrap_or(0)
    }

    fn guard(&self) -> Result<MutexGuard<'_, Partition>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CollaboratorError::Unavailable("storage is offline".into()));
        }
        self.partitions
            .lock()
            .map_err(|_| CollaboratorError::Unavailable("storage lock poisoned".into()))
    }
}

impl StorageBackend for MemoryStorage {
    fn create(&self, user: &UserId, collection: Collection, document: Document) -> Result<()> {
        let mut guard = self.guard()?;
        let docs = guard.entry((user.clone(), collection)).or_default();
        match docs.iter_mut().find(|doc| doc.id == document.id) {
            Some(existing) => *existing = document,
            None => docs.push(document),
        }
        Ok(())
    }

    fn read_all(&self, user: &UserId, collection: Collection) -> Result<Vec<Document>> {
        let guard = self.guard()?;
        Ok(guard
            .get(&(user.clone(), collection))
            .cloned()
            .unwrap_or_default())
    }

    fn update(&self, user: &UserId, collection: Collection, document: Document) -> Result<()> {
        let mut guard = self.guard()?;
        let slot = guard
            .get_mut(&(user.clone(), collection))
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == document.id))
            .ok_or_else(|| missing_document(collection, document.id))?;
        *slot = document;
        Ok(())
    }

    fn delete(&self, user: &UserId, collection: Collection, id: Uuid) -> Result<()> {
        let mut guard = self.guard()?;
        if let Some(docs) = guard.get_mut(&(user.clone(), collection)) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }
}
