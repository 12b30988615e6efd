//! List site content

use anyhow::Result;

use crate::schema::ResourceId;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = site.store();

    match content_type {
        "post" | "posts" => {
            let posts = store.list_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = if post.meta.date.is_empty() {
                    "----------"
                } else {
                    post.meta.date.as_str()
                };
                println!("  {} - {} [{}]", date, post.meta.title, post.slug);
            }
        }
        "page" | "pages" | "content" => {
            let resources: Vec<_> = ResourceId::all().collect();
            println!("Documents ({}):", resources.len());
            for resource in resources {
                let state = if store.exists(resource) {
                    "saved"
                } else {
                    "built-in"
                };
                println!("  {} ({}) [{}]", resource, state, resource.relative_path());
            }
        }
        "upload" | "uploads" => {
            let uploads = store.list_uploads()?;
            println!("Uploads ({}):", uploads.len());
            for upload in uploads {
                println!(
                    "  {} - {} ({} bytes)",
                    upload.kind.as_str(),
                    upload.path,
                    upload.size
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, upload",
                content_type
            );
        }
    }

    Ok(())
}
