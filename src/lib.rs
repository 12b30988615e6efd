//! tradesite: a content-managed marketing site for home-services businesses
//!
//! Site content lives in JSON documents and Markdown posts under a content
//! root. The admin API edits them, and the public API assembles them into
//! render models with built-in defaults filling every gap.

pub mod admin;
pub mod assemble;
pub mod commands;
pub mod config;
pub mod schema;
pub mod server;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application
#[derive(Debug, Clone)]
pub struct Site {
    /// Application configuration
    pub config: config::AppConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content root
    pub content_dir: PathBuf,
}

impl Site {
    /// Create a site from a directory, reading `tradesite.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::AppConfig::load_or_default(&base_dir)?;
        let content_dir = base_dir.join(&config.content_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
        })
    }

    pub fn store(&self) -> store::ContentStore {
        store::ContentStore::new(&self.content_dir)
    }

    pub fn admin(&self) -> admin::Admin {
        admin::Admin::new(self.store())
    }

    pub fn assembler(&self) -> assemble::Assembler {
        assemble::Assembler::new(self.store())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_uses_configured_content_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(config::CONFIG_FILE), "content_dir: data\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.content_dir, dir.path().join("data"));
        assert_eq!(site.store().root(), dir.path().join("data"));
    }
}
