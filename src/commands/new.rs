//! Create a new blog post

use anyhow::Result;

use crate::store::PostMeta;
use crate::Site;

/// Create a post titled `title` with an empty body
pub fn create_post(site: &Site, title: &str, tags: &[String]) -> Result<()> {
    let meta = PostMeta {
        tags: tags.to_vec(),
        ..Default::default()
    };
    let post = site.admin().create_or_update_post(title, "", meta, false)?;
    let path = site.store().post_path(&post.slug)?;
    println!("Created: {}", path.display());
    Ok(())
}
