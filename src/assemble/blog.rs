//! Blog index and single post pages

use serde::Serialize;

use super::{AssembleError, Assembler, HeroBackground, PageContent, RenderModel, ResolvedHero};
use crate::schema::Hero;
use crate::store::{BlogPost, StoreError};

/// Page key of the blog for per-page settings
const BLOG_KEY: &str = "blog";

/// A post as listed on the blog index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub href: String,
    pub title: String,
    pub date: String,
    pub author: String,
    pub image: String,
    pub tags: Vec<String>,
    pub excerpt: String,
}

impl From<&BlogPost> for PostSummary {
    fn from(post: &BlogPost) -> Self {
        Self {
            slug: post.slug.clone(),
            href: format!("/{}/{}", BLOG_KEY, post.slug),
            title: post.meta.title.clone(),
            date: post.meta.date.clone(),
            author: post.meta.author.clone(),
            image: post.meta.image.clone(),
            tags: post.meta.tags.clone(),
            excerpt: post.summary(),
        }
    }
}

/// A full post with its body rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub html: String,
}

impl Assembler {
    /// All posts, newest first
    pub fn assemble_blog_index(&self) -> RenderModel {
        let site = self.site_config();
        let services = self.services();

        let posts = match self.store.list_posts() {
            Ok(posts) => posts.iter().map(PostSummary::from).collect(),
            Err(err) => {
                tracing::warn!("Failed to list posts: {}", err);
                Vec::new()
            }
        };

        let hero = Hero::new("Blog", &site.site.tagline);
        let hero = ResolvedHero::new(&hero, &site, BLOG_KEY);
        self.frame(BLOG_KEY, hero, site, &services, PageContent::BlogIndex { posts })
    }

    pub fn assemble_post(&self, slug: &str) -> Result<RenderModel, AssembleError> {
        let post = match self.store.read_post(slug) {
            Ok(post) => post,
            Err(err) if err.is_not_found() || matches!(err, StoreError::InvalidName(_)) => {
                return Err(AssembleError::NotFound(format!("Post `{}`", slug)))
            }
            Err(err) => return Err(err.into()),
        };

        let site = self.site_config();
        let services = self.services();

        let summary = PostSummary::from(&post);
        let mut hero = ResolvedHero::new(&Hero::new(&summary.title, &summary.date), &site, BLOG_KEY);
        if !summary.image.trim().is_empty() {
            hero.background = HeroBackground::from_image(&site, summary.image.trim());
        }

        let view = PostView {
            summary,
            html: self.markdown.render(&post.content),
        };
        Ok(self.frame(BLOG_KEY, hero, site, &services, PageContent::BlogPost { post: view }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentStore, PostMeta};
    use tempfile::TempDir;

    fn post(slug: &str, date: &str, body: &str) -> BlogPost {
        BlogPost {
            slug: slug.to_string(),
            meta: PostMeta {
                title: slug.replace('-', " "),
                date: date.to_string(),
                ..Default::default()
            },
            content: body.to_string(),
        }
    }

    #[test]
    fn test_blog_index_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        store.write_post(&post("spring-tune-up", "2024-03-01", "Spring.")).unwrap();
        store.write_post(&post("winter-prep", "2024-11-15", "Winter.")).unwrap();

        let model = Assembler::new(store).assemble_blog_index();
        assert_eq!(model.page, "blog");
        match model.content {
            PageContent::BlogIndex { posts } => {
                let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
                assert_eq!(slugs, vec!["winter-prep", "spring-tune-up"]);
                assert_eq!(posts[0].excerpt, "Winter.");
                assert_eq!(posts[0].href, "/blog/winter-prep");
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_assemble_post_renders_markdown() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        let mut p = post("filters", "2024-01-01", "## Why\n\nChange them *often*.");
        p.meta.image = "/uploads/blog-1.jpg".to_string();
        store.write_post(&p).unwrap();

        let model = Assembler::new(store).assemble_post("filters").unwrap();
        assert!(matches!(model.hero.background, HeroBackground::Image { .. }));
        match model.content {
            PageContent::BlogPost { post } => {
                assert!(post.html.contains("<h2>Why</h2>"));
                assert!(post.html.contains("<em>often</em>"));
                assert_eq!(post.summary.excerpt, "Change them *often*.");
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_missing_post_is_not_found() {
        let dir = TempDir::new().unwrap();
        let assembler = Assembler::new(ContentStore::new(dir.path()));
        assert!(matches!(
            assembler.assemble_post("nope"),
            Err(AssembleError::NotFound(_))
        ));
    }
}
