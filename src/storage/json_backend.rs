use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::debug;
use uuid::Uuid;

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::CollaboratorError,
};

use super::{missing_document, Collection, Document, Result, StorageBackend, UserId};

const TMP_SUFFIX: &str = "tmp";

/// File-backed store: one pretty-printed JSON array per user and collection,
/// laid out as `<root>/users/<user>/<collection>.json`.
pub struct JsonStorage {
    root: PathBuf,
    users_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let users_dir = PathResolver::users_dir_in(&app_root);
        ensure_dir(&users_dir)?;
        Ok(Self {
            root: app_root,
            users_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, user: &UserId, collection: Collection) -> PathBuf {
        self.users_dir
            .join(canonical_name(user.as_str()))
            .join(format!("{}.json", collection.name()))
    }

    fn load(&self, user: &UserId, collection: Collection) -> Result<Vec<Document>> {
        let path = self.collection_path(user, collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn store(&self, user: &UserId, collection: Collection, docs: &[Document]) -> Result<()> {
        let path = self.collection_path(user, collection);
        let json = serde_json::to_string_pretty(docs)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        debug!(user = %user, collection = %collection, count = docs.len(), "collection written");
        Ok(())
    }

    /// Read-modify-write under the process-wide lock.
    fn modify<F>(&self, user: &UserId, collection: Collection, change: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Document>) -> Result<bool>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| CollaboratorError::Unavailable("storage lock poisoned".into()))?;
        let mut docs = self.load(user, collection)?;
        if change(&mut docs)? {
            self.store(user, collection, &docs)?;
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn create(&self, user: &UserId, collection: Collection, document: Document) -> Result<()> {
        self.modify(user, collection, |docs| {
            match docs.iter_mut().find(|doc| doc.id == document.id) {
                Some(existing) => *existing = document,
                None => docs.push(document),
            }
            Ok(true)
        })
    }

    fn read_all(&self, user: &UserId, collection: Collection) -> Result<Vec<Document>> {
        self.load(user, collection)
    }

    fn update(&self, user: &UserId, collection: Collection, document: Document) -> Result<()> {
        self.modify(user, collection, |docs| {
            let slot = docs
                .iter_mut()
                .find(|doc| doc.id == document.id)
                .ok_or_else(|| missing_document(collection, document.id))?;
            *slot = document;
            Ok(true)
        })
    }

    fn delete(&self, user: &UserId, collection: Collection, id: Uuid) -> Result<()> {
        self.modify(user, collection, |docs| {
            let before = docs.len();
            docs.retain(|doc| doc.id != id);
            Ok(docs.len() != before)
        })
    }
}

/// Maps a user id onto a safe directory name.
fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "user".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn documents_survive_reopen() {
        let (storage, guard) = storage_with_temp_dir();
        let user = UserId::new("Alice@Example.com");
        let id = Uuid::new_v4();
        storage
            .create(
                &user,
                Collection::Categories,
                Document {
                    id,
                    body: json!({"name": "Food"}),
                },
            )
            .expect("create");

        let reopened = JsonStorage::new(Some(guard.path().to_path_buf())).expect("reopen");
        let docs = reopened
            .read_all(&user, Collection::Categories)
            .expect("read");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert!(reopened
            .collection_path(&user, Collection::Categories)
            .to_string_lossy()
            .contains("alice_example_com"));
    }

    #[test]
    fn update_and_delete() {
        let (storage, _guard) = storage_with_temp_dir();
        let user = UserId::new("bob");
        let id = Uuid::new_v4();
        let doc = Document {
            id,
            body: json!({"limit": "10"}),
        };
        storage
            .create(&user, Collection::Budgets, doc)
            .expect("create");
        storage
            .update(
                &user,
                Collection::Budgets,
                Document {
                    id,
                    body: json!({"limit": "20"}),
                },
            )
            .expect("update");
        let docs = storage.read_all(&user, Collection::Budgets).unwrap();
        assert_eq!(docs[0].body["limit"], "20");

        storage
            .delete(&user, Collection::Budgets, id)
            .expect("delete");
        assert!(storage
            .read_all(&user, Collection::Budgets)
            .unwrap()
            .is_empty());
        let err = storage
            .update(
                &user,
                Collection::Budgets,
                Document {
                    id,
                    body: json!({}),
                },
            )
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::MissingDocument { .. }));
    }

    #[test]
    fn no_tmp_files_left_behind() {
        let (storage, _guard) = storage_with_temp_dir();
        let user = UserId::new("carol");
        storage
            .create(
                &user,
                Collection::Accounts,
                Document {
                    id: Uuid::new_v4(),
                    body: json!({}),
                },
            )
            .unwrap();
        let dir = storage
            .collection_path(&user, Collection::Accounts)
            .parent()
            .unwrap()
            .to_path_buf();
        let leftovers = fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
