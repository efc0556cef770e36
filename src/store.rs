//! Durable local snapshot of the application in progress

use crate::error::StoreError;
use crate::state::{FormData, UploadTracker, SCHEMA_VERSION};
use std::fs;
use std::path::{Path, PathBuf};

/// Key holding the form snapshot
pub const FORM_DATA_KEY: &str = "loanApplicationData";
/// Key holding the attached document map
pub const DOCUMENTS_KEY: &str = "uploadedDocuments";

/// Raw key-value storage underneath the snapshot store
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotBackend {
    /// Stored contents for `key`, `None` if never written
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the contents for `key`
    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError>;

    /// Delete `key`; deleting a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SnapshotBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(key);
        // Write-then-rename
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

/// Serialises form data and attached documents through a backend
pub struct PersistenceStore {
    backend: Box<dyn SnapshotBackend>,
}

impl PersistenceStore {
    pub fn new(backend: impl SnapshotBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Overwrite the stored form snapshot
    pub fn save(&self, form: &FormData) -> Result<(), StoreError> {
        let json = serde_json::to_string(form)?;
        self.backend.write(FORM_DATA_KEY, &json)
    }

    /// Stored form snapshot; missing, corrupt or newer-schema data yields `None`
    pub fn load(&self) -> Option<FormData> {
        let raw = match self.backend.read(FORM_DATA_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read saved application: {e}");
                return None;
            }
        };
        match serde_json::from_str::<FormData>(&raw) {
            Ok(form) if form.schema_version > SCHEMA_VERSION => {
                tracing::warn!(
                    "Ignoring saved application with schema version {} (supported: {})",
                    form.schema_version,
                    SCHEMA_VERSION
                );
                None
            }
            Ok(form) => match form.invariant_violation() {
                Some(reason) => {
                    tracing::warn!("Ignoring inconsistent saved application: {reason}");
                    None
                }
                None => Some(form),
            },
            Err(e) => {
                tracing::warn!("Ignoring corrupt saved application: {e}");
                None
            }
        }
    }

    pub fn save_documents(&self, documents: &UploadTracker) -> Result<(), StoreError> {
        let json = serde_json::to_string(documents)?;
        self.backend.write(DOCUMENTS_KEY, &json)
    }

    /// Stored document map; unreadable data yields `None`
    pub fn load_documents(&self) -> Option<UploadTracker> {
        let raw = match self.backend.read(DOCUMENTS_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read saved document list: {e}");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| tracing::warn!("Ignoring corrupt document list: {e}"))
            .ok()
    }

    /// Remove every stored snapshot
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(FORM_DATA_KEY)?;
        self.backend.remove(DOCUMENTS_KEY)
    }
}

/// In-memory backend for tests
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: std::rc::Rc<std::cell::RefCell<std::collections::HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryBackend {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, contents: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), contents.to_string());
    }
}

#[cfg(test)]
impl SnapshotBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, contents: &str) -> Result<(), StoreError> {
        self.put_raw(key, contents);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
