//! Admin mutation layer
//!
//! Every write the admin UI can make goes through [`Admin`]: whole-document
//! edits, blog posts and uploads. Failures are surfaced, never swallowed.

mod path;

pub use path::set_path;

use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::schema::slug::{is_valid_slug, slugify};
use crate::schema::site::{image_key, same_image};
use crate::schema::{builtin, Document, ResourceId, SiteConfig, UnknownResource};
use crate::store::{
    public_path, BlogPost, ContentStore, PostMeta, StoreError, UploadKind, UploadedFile,
};

/// Errors surfaced to the operator
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),

    #[error("A post with slug `{0}` already exists")]
    DuplicateSlug(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    UnknownResource(#[from] UnknownResource),

    #[error("Invalid path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AdminError::NotFound(what),
            StoreError::InvalidName(reason) => AdminError::Validation(reason),
            other => AdminError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;

/// Outcome of deleting an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDeletion {
    pub filename: String,
    /// Site config fields that referenced the image and were cleared
    pub cleared: Vec<String>,
}

/// Remove every reference to `filename` from the site config.
///
/// Returns the cleared field paths; empty when nothing referenced the image.
pub fn scrub_image_references(config: &mut SiteConfig, filename: &str) -> Vec<String> {
    let public = public_path(filename);
    let mut cleared = Vec::new();

    config.hero_backgrounds.retain(|page, path| {
        let referenced = same_image(path, &public);
        if referenced {
            cleared.push(format!("heroBackgrounds.{}", page));
        }
        !referenced
    });

    let key = image_key(filename);
    if config.hero_overlays.shift_remove(&key).is_some() {
        cleared.push(format!("heroOverlays.{}", key));
    }

    if same_image(&config.hero_styling.background_image, &public) {
        config.hero_styling.clear_image();
        cleared.push("heroStyling.backgroundImage".to_string());
    }

    cleared
}

/// The admin mutation layer over a content store
#[derive(Debug, Clone)]
pub struct Admin {
    store: ContentStore,
}

impl Admin {
    pub fn new(store: ContentStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Defaults-merged document for the editor.
    ///
    /// A resource that was never written is presented as its built-in
    /// default, so the first save persists real content.
    pub fn load_for_edit(&self, resource: ResourceId) -> Result<Document> {
        match self.store.read_document(resource) {
            Ok(doc) => Ok(doc),
            Err(err) if err.is_not_found() => {
                tracing::debug!("{} not saved yet, editing built-in default", resource);
                Ok(builtin(resource))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Set one nested field of `doc`, leaving every other field untouched.
    ///
    /// Pure: `doc` is not modified and nothing is written.
    pub fn stage_edit(doc: &Document, path: &str, value: Value) -> Result<Document> {
        let resource = doc.resource();
        let mut tree = doc
            .to_value()
            .map_err(|e| AdminError::Validation(e.to_string()))?;
        set_path(&mut tree, path, value).map_err(|reason| AdminError::InvalidPath {
            path: path.to_string(),
            reason,
        })?;
        Document::from_value(resource, tree).map_err(|e| {
            AdminError::Validation(format!("`{}` does not fit {}: {}", path, resource, e))
        })
    }

    /// Write a document back wholesale
    pub fn commit(&self, doc: &Document) -> Result<()> {
        self.store.write_document(doc).map_err(|e| {
            tracing::error!("Saving {} failed: {}", doc.resource(), e);
            AdminError::from(e)
        })?;
        tracing::info!("Saved {}", doc.resource());
        Ok(())
    }

    /// Overwrite the resource named by `type_token` with raw `data`.
    ///
    /// `data` must be an object that parses as the resource's document type;
    /// it is stored as sent so unmodeled fields survive.
    pub fn commit_value(&self, type_token: &str, data: Value) -> Result<Document> {
        let resource: ResourceId = type_token.parse()?;
        if !data.is_object() {
            return Err(AdminError::Validation(format!(
                "{} data must be a JSON object",
                resource
            )));
        }
        let doc = Document::from_value(resource, data.clone())
            .map_err(|e| AdminError::Validation(format!("Invalid {} document: {}", resource, e)))?;

        self.store.write(resource, &data).map_err(|e| {
            tracing::error!("Saving {} failed: {}", resource, e);
            AdminError::from(e)
        })?;
        tracing::info!("Saved {}", resource);
        Ok(doc)
    }

    pub fn list_posts(&self) -> Result<Vec<BlogPost>> {
        Ok(self.store.list_posts()?)
    }

    /// Create a post from a title, or overwrite it when `is_edit`.
    ///
    /// The slug comes from the title. Creating over an existing slug is
    /// rejected before anything is written.
    pub fn create_or_update_post(
        &self,
        title: &str,
        body: &str,
        mut meta: PostMeta,
        is_edit: bool,
    ) -> Result<BlogPost> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AdminError::Validation("Post title is required".to_string()));
        }
        let slug = slugify(title);
        if slug.is_empty() {
            return Err(AdminError::Validation(format!(
                "`{}` does not produce a usable slug",
                title
            )));
        }
        if !is_edit && self.store.post_exists(&slug)? {
            return Err(AdminError::DuplicateSlug(slug));
        }

        meta.title = title.to_string();
        if meta.date.trim().is_empty() {
            meta.date = Local::now().format("%Y-%m-%d").to_string();
        }

        let post = BlogPost {
            slug,
            meta,
            content: body.to_string(),
        };
        self.store.write_post(&post)?;
        tracing::info!("Saved post {}", post.slug);
        Ok(post)
    }

    /// Write a post's raw Markdown under `slug`
    pub fn save_post_markdown(&self, slug: &str, markdown: &str, is_edit: bool) -> Result<BlogPost> {
        let slug = slug.trim();
        if !is_valid_slug(slug) {
            return Err(AdminError::Validation(format!(
                "`{}` is not a valid slug",
                slug
            )));
        }
        let post = BlogPost::from_markdown(slug, markdown)
            .map_err(|e| AdminError::Validation(format!("Invalid front matter: {}", e)))?;
        if !is_edit && self.store.post_exists(slug)? {
            return Err(AdminError::DuplicateSlug(slug.to_string()));
        }

        self.store.write_post_markdown(slug, markdown)?;
        tracing::info!("Saved post {}", slug);
        Ok(post)
    }

    pub fn delete_post(&self, slug: &str) -> Result<()> {
        self.store.delete_post(slug.trim())?;
        tracing::info!("Deleted post {}", slug);
        Ok(())
    }

    pub fn list_uploads(&self) -> Result<Vec<UploadedFile>> {
        Ok(self.store.list_uploads()?)
    }

    pub fn upload_image(
        &self,
        kind: Option<&str>,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<UploadedFile> {
        if bytes.is_empty() {
            return Err(AdminError::Validation("Uploaded file is empty".to_string()));
        }
        let kind = kind.map(UploadKind::parse).unwrap_or(UploadKind::General);
        Ok(self.store.save_upload(kind, original_name, bytes)?)
    }

    /// Delete an upload after clearing every site config reference to it.
    ///
    /// The scrub is persisted first, then the file is removed. The two steps
    /// are independent: if removing the file fails the error is returned
    /// and the config stays scrubbed.
    pub fn delete_uploaded_image(&self, filename: &str) -> Result<ImageDeletion> {
        let filename = filename.trim();
        if !self.store.upload_exists(filename)? {
            return Err(AdminError::NotFound(public_path(filename)));
        }

        let cleared = match self.store.read_typed::<SiteConfig>(ResourceId::SiteConfig) {
            Ok(mut config) => {
                let cleared = scrub_image_references(&mut config, filename);
                if !cleared.is_empty() {
                    self.commit(&Document::SiteConfig(config))?;
                    tracing::info!("Cleared references to {}: {}", filename, cleared.join(", "));
                }
                cleared
            }
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => {
                tracing::error!("Cannot check references to {}: {}", filename, err);
                return Err(err.into());
            }
        };

        self.store.delete_upload(filename).map_err(|e| {
            tracing::error!("Deleting upload {} failed: {}", filename, e);
            AdminError::from(e)
        })?;

        Ok(ImageDeletion {
            filename: filename.to_string(),
            cleared,
        })
    }
}
