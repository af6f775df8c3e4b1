//! Automerge-backed store persisted to a single file in the data directory.

use automerge::{transaction::Transactable, AutoCommit, ObjType, ReadDoc, Value, ROOT};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::StoreError;

/// File name of the document inside the data directory.
pub const DOCUMENT_FILENAME: &str = "caseorder.automerge";

/// Store holding every key as a root-level list in one Automerge document.
///
/// The document is loaded once on [`open`](DocumentStore::open). Every `set`
/// that changes a list rebuilds the document from its current contents, so the
/// saved file carries no edit history.
pub struct DocumentStore {
    data_dir: PathBuf,
    path: PathBuf,
    doc: AutoCommit,
}

impl DocumentStore {
    /// Opens the store in `data_dir`.
    ///
    /// A missing file yields an empty store. The directory is only created on
    /// the first write.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let path = data_dir.join(DOCUMENT_FILENAME);

        let doc = match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!("Loaded {} bytes from {}", bytes.len(), path.display());
                AutoCommit::load(&bytes)
                    .map_err(|e| StoreError::Load(path.clone(), e.to_string()))?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No document at {}, starting empty", path.display());
                AutoCommit::new()
            }
            Err(e) => return Err(StoreError::Io(path, e)),
        };

        Ok(Self {
            data_dir,
            path,
            doc,
        })
    }

    /// Returns the path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn keys(&self) -> Vec<String> {
        self.doc.keys(ROOT).collect()
    }

    /// Reads the list under `key`. `None` if the key is absent or not a list.
    fn list(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        let list_id = match self.doc.get(ROOT, key).map_err(|e| self.load_error(e))? {
            Some((Value::Object(ObjType::List), list_id)) => list_id,
            Some(_) => {
                tracing::warn!("Key '{}' is not a list, treating as empty", key);
                return Ok(None);
            }
            None => return Ok(None),
        };

        let len = self.doc.length(&list_id);
        let mut values = Vec::with_capacity(len);
        for i in 0..len {
            if let Some((value, _)) = self.doc.get(&list_id, i).map_err(|e| self.load_error(e))? {
                if let Ok(s) = value.into_string() {
                    values.push(s);
                }
            }
        }

        Ok(Some(values))
    }

    /// Builds a history-free copy of the document with `key` set to `values`.
    fn rebuild(&self, key: &str, values: &[String]) -> Result<AutoCommit, StoreError> {
        let mut doc = AutoCommit::new();
        for existing in self.keys() {
            if existing == key {
                continue;
            }
            if let Some(current) = self.list(&existing)? {
                put_list(&mut doc, &existing, &current)?;
            }
        }
        put_list(&mut doc, key, values)?;
        Ok(doc)
    }

    fn save(&mut self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        let bytes = self.doc.save();
        fs::write(&self.path, &bytes).map_err(|e| StoreError::Io(self.path.clone(), e))?;
        tracing::debug!("Saved {} bytes to {}", bytes.len(), self.path.display());

        Ok(())
    }

    fn load_error(&self, e: impl ToString) -> StoreError {
        StoreError::Load(self.path.clone(), e.to_string())
    }
}

impl KeyValueStore for DocumentStore {
    fn get(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.list(key)?.unwrap_or_default())
    }

    fn set(&mut self, key: &str, values: &[String]) -> Result<(), StoreError> {
        if self.list(key)?.as_deref() == Some(values) {
            tracing::debug!("Key '{}' unchanged, skipping write", key);
            return Ok(());
        }

        self.doc = self.rebuild(key, values)?;
        self.save()
    }
}

fn put_list(doc: &mut AutoCommit, key: &str, values: &[String]) -> Result<(), StoreError> {
    let write_error = |e: automerge::AutomergeError| StoreError::Write(key.to_string(), e.to_string());

    let list_id = doc.put_object(ROOT, key, ObjType::List).map_err(write_error)?;
    for (i, value) in values.iter().enumerate() {
        doc.insert(&list_id, i, value.as_str()).map_err(write_error)?;
    }
    Ok(())
}
