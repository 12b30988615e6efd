//! File-backed content store
//!
//! One JSON file per [`ResourceId`], one Markdown file per blog post and a
//! flat directory of uploaded images, all below a single content root:
//!
//! ```text
//! site-config.json
//! navigation.json
//! pages/<page>.json
//! blog/posts/<slug>.md
//! public/uploads/<type->?<timestamp><ext>
//! ```
//!
//! There is no locking. Concurrent writers to the same resource race and
//! the last write wins; the store only guarantees that a reader never sees
//! a half-written file.

mod blog;
mod uploads;

pub use blog::{BlogPost, PostMeta};
pub use uploads::{public_path, UploadKind, UploadedFile, IMAGE_EXTENSIONS, UPLOADS_ROUTE};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::{parse_resolved, Document, ResourceId, Resolve};

/// Errors raised by the content store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid front matter in {path}: {message}")]
    FrontMatter { path: String, message: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(path.display().to_string())
        } else {
            StoreError::Io {
                path: path.display().to_string(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// File-backed key/document store rooted at a content directory
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a JSON resource
    pub fn path_for(&self, resource: ResourceId) -> PathBuf {
        self.root.join(resource.relative_path())
    }

    pub fn exists(&self, resource: ResourceId) -> bool {
        self.path_for(resource).is_file()
    }

    /// Read a JSON resource as raw JSON
    pub fn read(&self, resource: ResourceId) -> Result<Value> {
        let path = self.path_for(resource);
        let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        tracing::debug!("Read {} from {:?}", resource, path);
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read a JSON resource and resolve its defaults
    pub fn read_document(&self, resource: ResourceId) -> Result<Document> {
        let value = self.read(resource)?;
        Document::from_value(resource, value).map_err(|source| StoreError::Json {
            path: self.path_for(resource).display().to_string(),
            source,
        })
    }

    /// Read a JSON resource as one concrete document type
    pub fn read_typed<T>(&self, resource: ResourceId) -> Result<T>
    where
        T: DeserializeOwned + Resolve,
    {
        let value = self.read(resource)?;
        parse_resolved(value).map_err(|source| StoreError::Json {
            path: self.path_for(resource).display().to_string(),
            source,
        })
    }

    /// Overwrite a JSON resource with `value`
    pub fn write(&self, resource: ResourceId, value: &Value) -> Result<()> {
        let path = self.path_for(resource);
        let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })?;
        write_file(&path, content.as_bytes())?;
        tracing::debug!("Wrote {} to {:?}", resource, path);
        Ok(())
    }

    /// Overwrite the resource a document belongs to
    pub fn write_document(&self, document: &Document) -> Result<()> {
        let resource = document.resource();
        let value = document.to_value().map_err(|source| StoreError::Json {
            path: self.path_for(resource).display().to_string(),
            source,
        })?;
        self.write(resource, &value)
    }
}

/// Write `bytes` to `path`, creating parent directories.
///
/// The data goes to a sibling temp file first and is renamed into place.
fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, bytes).map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        StoreError::io(path, e)
    })
}

/// Remove a file, mapping a missing file to `NotFound`
fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| StoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PageId;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, ContentStore) {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().join("content"));
        (dir, store)
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let (_dir, store) = store();
        let home = ResourceId::Page(PageId::Home);
        store.write(home, &json!({"hero": {"title": "Hi"}})).unwrap();

        assert!(store.root().join("pages/home.json").is_file());
        assert_eq!(store.read(home).unwrap()["hero"]["title"], "Hi");
        assert!(!store.root().join("pages/home.json.tmp").exists());
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (_dir, store) = store();
        let err = store.read(ResourceId::Navigation).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_malformed_json() {
        let (_dir, store) = store();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.path_for(ResourceId::SiteConfig), "{ nope").unwrap();
        let err = store.read(ResourceId::SiteConfig).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn test_empty_file_reads_as_null() {
        let (_dir, store) = store();
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.path_for(ResourceId::Navigation), "  \n").unwrap();
        assert_eq!(store.read(ResourceId::Navigation).unwrap(), Value::Null);
    }

    #[test]
    fn test_last_write_wins() {
        let (_dir, store) = store();
        store.write(ResourceId::Navigation, &json!({"header": []})).unwrap();
        store
            .write(ResourceId::Navigation, &json!({"footer": []}))
            .unwrap();
        assert_eq!(
            store.read(ResourceId::Navigation).unwrap(),
            json!({"footer": []})
        );
    }

    #[test]
    fn test_write_document_round_trip() {
        let (_dir, store) = store();
        let doc = crate::schema::builtin(ResourceId::Page(PageId::Plan));
        store.write_document(&doc).unwrap();
        let read = store
            .read_document(ResourceId::Page(PageId::Plan))
            .unwrap();
        assert_eq!(read, doc);
    }

    #[test]
    fn test_read_typed() {
        let (_dir, store) = store();
        store
            .write(ResourceId::Navigation, &json!({"header": [{"label": "Home", "href": "/"}]}))
            .unwrap();
        let nav: crate::schema::Navigation = store.read_typed(ResourceId::Navigation).unwrap();
        assert_eq!(nav.header.len(), 1);
        assert_eq!(nav.cta.href, "/contact");
    }

    #[test]
    fn test_write_failure_is_surfaced() {
        let (_dir, store) = store();
        // A file where the pages directory should be
        fs::create_dir_all(store.root()).unwrap();
        fs::write(store.root().join("pages"), "not a directory").unwrap();
        let err = store
            .write(ResourceId::Page(PageId::About), &json!({}))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
