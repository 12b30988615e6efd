//! Uploaded images under `public/uploads`

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{remove_file, write_file, ContentStore, Result, StoreError};

/// Uploads directory, relative to the content root
const UPLOADS_DIR: &str = "public/uploads";

/// Public URL prefix of the uploads directory
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Extensions accepted for uploaded images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "avif"];

/// Upload category, encoded as a filename prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UploadKind {
    HeroBackground,
    Blog,
    Service,
    Gallery,
    Logo,
    General,
}

impl UploadKind {
    const PREFIXED: [UploadKind; 5] = [
        UploadKind::HeroBackground,
        UploadKind::Blog,
        UploadKind::Service,
        UploadKind::Gallery,
        UploadKind::Logo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UploadKind::HeroBackground => "hero-background",
            UploadKind::Blog => "blog",
            UploadKind::Service => "service",
            UploadKind::Gallery => "gallery",
            UploadKind::Logo => "logo",
            UploadKind::General => "general",
        }
    }

    /// Kind named by an upload request; unknown names are `General`
    pub fn parse(token: &str) -> Self {
        Self::PREFIXED
            .into_iter()
            .find(|kind| kind.as_str() == token.trim())
            .unwrap_or(UploadKind::General)
    }

    /// Kind encoded in a stored filename
    pub fn from_filename(filename: &str) -> Self {
        Self::PREFIXED
            .into_iter()
            .find(|kind| {
                filename
                    .strip_prefix(kind.as_str())
                    .is_some_and(|rest| rest.starts_with('-'))
            })
            .unwrap_or(UploadKind::General)
    }

    fn prefix(self) -> Option<&'static str> {
        match self {
            UploadKind::General => None,
            other => Some(other.as_str()),
        }
    }
}

/// An image in the uploads directory
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub filename: String,
    /// Public path, `/uploads/<filename>`
    pub path: String,
    #[serde(rename = "type")]
    pub kind: UploadKind,
    pub size: u64,
    pub uploaded_at: Option<DateTime<Local>>,
}

/// Public path of an uploaded file
pub fn public_path(filename: &str) -> String {
    format!("{}/{}", UPLOADS_ROUTE, filename)
}

/// Lower-cased extension when it is an accepted image type
fn image_extension(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reject names that would escape the uploads directory
fn validate_filename(filename: &str) -> Result<()> {
    let bad = filename.is_empty()
        || filename.starts_with('.')
        || filename.contains(['/', '\\'])
        || filename.contains('\0');
    if bad {
        return Err(StoreError::InvalidName(format!(
            "`{}` is not a plain file name",
            filename
        )));
    }
    Ok(())
}

impl ContentStore {
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join(UPLOADS_DIR)
    }

    /// Location of an uploaded file; rejects path-like names
    pub fn upload_path(&self, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;
        Ok(self.uploads_dir().join(filename))
    }

    /// Store an image as `<kind->?<millis>.<ext>` and describe it
    pub fn save_upload(&self, kind: UploadKind, original_name: &str, bytes: &[u8]) -> Result<UploadedFile> {
        let Some(ext) = image_extension(original_name) else {
            return Err(StoreError::InvalidName(format!(
                "`{}` is not an accepted image type ({})",
                original_name,
                IMAGE_EXTENSIONS.join(", ")
            )));
        };

        let dir = self.uploads_dir();
        let mut stamp = Local::now().timestamp_millis();
        let (filename, path) = loop {
            let filename = match kind.prefix() {
                Some(prefix) => format!("{}-{}.{}", prefix, stamp, ext),
                None => format!("{}.{}", stamp, ext),
            };
            let path = dir.join(&filename);
            if !path.exists() {
                break (filename, path);
            }
            stamp += 1;
        };

        write_file(&path, bytes)?;
        tracing::info!("Saved upload {} ({} bytes)", filename, bytes.len());

        Ok(UploadedFile {
            path: public_path(&filename),
            filename,
            kind,
            size: bytes.len() as u64,
            uploaded_at: Some(Local::now()),
        })
    }

    /// Every uploaded image, newest first
    pub fn list_uploads(&self) -> Result<Vec<UploadedFile>> {
        let dir = self.uploads_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
        let mut files = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let Ok(filename) = entry.file_name().into_string() else {
                continue;
            };
            if image_extension(&filename).is_none() {
                continue;
            }
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            files.push(UploadedFile {
                path: public_path(&filename),
                kind: UploadKind::from_filename(&filename),
                size: meta.len(),
                uploaded_at: meta.modified().ok().map(DateTime::<Local>::from),
                filename,
            });
        }

        files.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(files)
    }

    pub fn upload_exists(&self, filename: &str) -> Result<bool> {
        Ok(self.upload_path(filename)?.is_file())
    }

    pub fn delete_upload(&self, filename: &str) -> Result<()> {
        let path = self.upload_path(filename)?;
        remove_file(&path)?;
        tracing::info!("Deleted upload {}", filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(
            UploadKind::from_filename("hero-background-1700000000000.jpg"),
            UploadKind::HeroBackground
        );
        assert_eq!(UploadKind::from_filename("blog-1.png"), UploadKind::Blog);
        assert_eq!(UploadKind::from_filename("logo-1.svg"), UploadKind::Logo);
        assert_eq!(UploadKind::from_filename("blogger.png"), UploadKind::General);
        assert_eq!(UploadKind::from_filename("1700.jpg"), UploadKind::General);
    }

    #[test]
    fn test_save_and_list() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        let saved = store
            .save_upload(UploadKind::parse("gallery"), "Photo.JPG", b"jpeg")
            .unwrap();
        assert!(saved.filename.starts_with("gallery-"));
        assert!(saved.filename.ends_with(".jpg"));
        assert_eq!(saved.path, format!("/uploads/{}", saved.filename));

        let second = store
            .save_upload(UploadKind::parse("nonsense"), "x.png", b"png")
            .unwrap();
        assert_eq!(second.kind, UploadKind::General);

        let listed = store.list_uploads().unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|f| f.filename == saved.filename && f.size == 4));
    }

    #[test]
    fn test_rejects_non_images() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        let err = store
            .save_upload(UploadKind::General, "notes.txt", b"hi")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
    }

    #[test]
    fn test_list_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        fs::create_dir_all(store.uploads_dir()).unwrap();
        fs::write(store.uploads_dir().join("readme.txt"), "x").unwrap();
        assert!(store.list_uploads().unwrap().is_empty());
    }

    #[test]
    fn test_delete_upload() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        let saved = store
            .save_upload(UploadKind::Logo, "logo.png", b"png")
            .unwrap();
        store.delete_upload(&saved.filename).unwrap();
        assert!(!store.upload_exists(&saved.filename).unwrap());
        assert!(store.delete_upload(&saved.filename).unwrap_err().is_not_found());
    }

    #[test]
    fn test_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        assert!(store.delete_upload("../site-config.json").is_err());
        assert!(store.delete_upload(".hidden.png").is_err());
    }
}
