//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;
use crate::schema::{builtin_json, ResourceId};
use crate::store::{BlogPost, ContentStore, PostMeta};
use crate::Site;

const CONFIG_TEMPLATE: &str = r#"# tradesite configuration

# Content root, relative to this file
content_dir: content

server:
  ip: localhost
  port: 3000

admin:
  # Sent by the admin UI in the x-admin-password header.
  # Leave unset only for local development.
  password:

uploads:
  max_bytes: 10485760
"#;

/// Initialize a site in `target_dir`. Existing files are left alone.
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE)?;
        println!("Created: {}", config_path.display());
    }

    let site = Site::new(target_dir)?;
    seed_content(&site.store())?;
    Ok(())
}

/// Write every built-in document and a sample post that is not already there
pub fn seed_content(store: &ContentStore) -> Result<usize> {
    let mut created = 0;

    for resource in ResourceId::all() {
        if store.exists(resource) {
            tracing::debug!("Keeping existing {}", resource);
            continue;
        }
        let value: serde_json::Value = serde_json::from_str(builtin_json(resource))?;
        store.write(resource, &value)?;
        println!("Created: {}", store.path_for(resource).display());
        created += 1;
    }

    let sample = sample_post();
    if !store.post_exists(&sample.slug)? && store.list_posts()?.is_empty() {
        store.write_post(&sample)?;
        println!("Created: {}", store.post_path(&sample.slug)?.display());
        created += 1;
    }

    fs::create_dir_all(store.uploads_dir())?;
    Ok(created)
}

fn sample_post() -> BlogPost {
    BlogPost {
        slug: "welcome".to_string(),
        meta: PostMeta {
            title: "Welcome".to_string(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            excerpt: "Our first post.".to_string(),
            tags: vec!["news".to_string()],
            ..Default::default()
        },
        content: "Welcome to our new website! Check back here for seasonal tips \
                  and company news.\n\n## Get in touch\n\nCall us or use the contact \
                  form to book a visit.\n"
            .to_string(),
    }
}
