//! Blog posts: Markdown files with a YAML front-matter block

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{remove_file, write_file, ContentStore, Result, StoreError};
use crate::schema::slug::is_valid_slug;

/// Posts directory, relative to the content root
const POSTS_DIR: &str = "blog/posts";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect())
        }

        fn visit_seq<S>(self, mut seq: S) -> std::result::Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front matter of a post
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostMeta {
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub author: String,
    pub image: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl PostMeta {
    /// Split a Markdown document into front matter and body.
    ///
    /// A document without a `---` block has default front matter and is all
    /// body.
    pub fn parse(content: &str) -> std::result::Result<(Self, &str), serde_yaml::Error> {
        let trimmed = content.trim_start();
        let Some(rest) = trimmed.strip_prefix("---") else {
            return Ok((PostMeta::default(), content));
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        // Empty block: the closing --- follows right away
        if let Some(body) = rest.strip_prefix("---") {
            return Ok((PostMeta::default(), body.trim_start_matches(['\n', '\r'])));
        }

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, treat as no front-matter
            return Ok((PostMeta::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((PostMeta::default(), remaining));
        }

        let meta = serde_yaml::from_str::<PostMeta>(yaml_content)?;
        Ok((meta, remaining))
    }

    /// Publication date, if `date` holds one of the accepted formats
    pub fn parsed_date(&self) -> Option<DateTime<Local>> {
        parse_date_string(&self.date)
    }
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.and_local_timezone(Local).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest();
        }
    }

    None
}

/// A blog post as exchanged with the admin API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub slug: String,
    #[serde(flatten)]
    pub meta: PostMeta,
    /// Markdown body
    pub content: String,
}

impl BlogPost {
    /// Parse a stored Markdown file
    pub fn from_markdown(slug: &str, markdown: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let (meta, body) = PostMeta::parse(markdown)?;
        Ok(Self {
            slug: slug.to_string(),
            meta,
            content: body.to_string(),
        })
    }

    /// Front matter block followed by the body
    pub fn to_markdown(&self) -> std::result::Result<String, serde_yaml::Error> {
        let yaml = serde_yaml::to_string(&self.meta)?;
        Ok(format!(
            "---\n{}---\n\n{}",
            yaml,
            self.content.trim_start_matches(['\n', '\r'])
        ))
    }

    /// Excerpt from front matter, or the first paragraph of the body
    pub fn summary(&self) -> String {
        if !self.meta.excerpt.trim().is_empty() {
            return self.meta.excerpt.trim().to_string();
        }
        self.content
            .split("\n\n")
            .map(str::trim)
            .find(|para| !para.is_empty() && !para.starts_with('#'))
            .unwrap_or_default()
            .to_string()
    }
}

/// Newest first; undated posts last, ties broken by slug
fn newest_first(a: &BlogPost, b: &BlogPost) -> Ordering {
    match (a.meta.parsed_date(), b.meta.parsed_date()) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    }
}

impl ContentStore {
    pub fn posts_dir(&self) -> PathBuf {
        self.root.join(POSTS_DIR)
    }

    /// Location of a post; rejects anything that is not a slug
    pub fn post_path(&self, slug: &str) -> Result<PathBuf> {
        if !is_valid_slug(slug) {
            return Err(StoreError::InvalidName(format!("`{}` is not a valid slug", slug)));
        }
        Ok(self.posts_dir().join(format!("{}.md", slug)))
    }

    pub fn post_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.post_path(slug)?.is_file())
    }

    /// Raw Markdown of a post
    pub fn read_post_markdown(&self, slug: &str) -> Result<String> {
        let path = self.post_path(slug)?;
        fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))
    }

    pub fn read_post(&self, slug: &str) -> Result<BlogPost> {
        let path = self.post_path(slug)?;
        let markdown = self.read_post_markdown(slug)?;
        BlogPost::from_markdown(slug, &markdown).map_err(|e| StoreError::FrontMatter {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Overwrite a post with raw Markdown
    pub fn write_post_markdown(&self, slug: &str, markdown: &str) -> Result<()> {
        let path = self.post_path(slug)?;
        write_file(&path, markdown.as_bytes())?;
        tracing::debug!("Wrote post {:?}", path);
        Ok(())
    }

    pub fn write_post(&self, post: &BlogPost) -> Result<()> {
        let markdown = post.to_markdown().map_err(|e| StoreError::FrontMatter {
            path: post.slug.clone(),
            message: e.to_string(),
        })?;
        self.write_post_markdown(&post.slug, &markdown)
    }

    pub fn delete_post(&self, slug: &str) -> Result<()> {
        let path = self.post_path(slug)?;
        remove_file(&path)?;
        tracing::debug!("Deleted post {:?}", path);
        Ok(())
    }

    /// All posts, newest first. Unreadable posts are skipped with a warning.
    pub fn list_posts(&self) -> Result<Vec<BlogPost>> {
        let posts_dir = self.posts_dir();
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for entry in WalkDir::new(&posts_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            let Some(slug) = markdown_slug(path) else {
                continue;
            };
            match self.read_post(&slug) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        posts.sort_by(newest_first);
        Ok(posts)
    }
}

/// Slug of a `<slug>.md` file, `None` for anything else
fn markdown_slug(path: &Path) -> Option<String> {
    if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}
