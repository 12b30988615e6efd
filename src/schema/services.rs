//! Services page document (`pages/services.json`)

use serde::{Deserialize, Serialize};

use super::page::{Extra, Hero};
use super::slug::slugify;
use super::tokens::{self, DisplayType, PageType};
use super::Resolve;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServicesConfig {
    /// `multiple` gives every service its own route and a header dropdown
    #[serde(with = "tokens::page_type_single")]
    pub page_type: PageType,
    #[serde(with = "tokens::display_type_icons")]
    pub display_type: DisplayType,
    pub hero: Hero,
    /// Shown unless explicitly `false`
    #[serde(with = "tokens::unless_false")]
    pub show_all_services_page: bool,
    pub services: Vec<Service>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            page_type: tokens::page_type_single::default(),
            display_type: tokens::display_type_icons::default(),
            hero: Hero::default(),
            show_all_services_page: true,
            services: Vec::new(),
            extra: Extra::new(),
        }
    }
}

impl Resolve for ServicesConfig {
    fn resolve(&mut self) {
        self.hero.normalize_cta();
        for service in &mut self.services {
            service.resolve();
        }
    }
}

impl ServicesConfig {
    /// Services that are switched on, in stored order
    pub fn enabled_services(&self) -> Vec<&Service> {
        self.services.iter().filter(|s| s.enabled).collect()
    }

    /// Home page grid: enabled and not hidden by the home page
    pub fn visible_on_home(&self, hidden: &[String]) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|s| s.enabled && !hidden.iter().any(|h| h == &s.slug))
            .collect()
    }

    pub fn find(&self, slug: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.slug == slug)
    }

    pub fn has_detail_pages(&self) -> bool {
        self.page_type == PageType::Multiple
    }
}

/// One offered service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    pub title: String,
    /// Derived from the title when empty; may be overridden
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Shown unless explicitly `false`
    #[serde(with = "tokens::unless_false")]
    pub enabled: bool,
    pub benefits: Vec<Benefit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_image: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for Service {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            description: String::new(),
            icon: None,
            image: None,
            enabled: true,
            benefits: Vec::new(),
            content_image: None,
            extra: Extra::new(),
        }
    }
}

impl Service {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            slug: slugify(title),
            description: description.to_string(),
            ..Default::default()
        }
    }

    pub fn resolve(&mut self) {
        if self.slug.trim().is_empty() {
            self.slug = slugify(&self.title);
        }
    }

    pub fn href(&self) -> String {
        format!("/services/{}", self.slug)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Benefit {
    pub title: String,
    pub description: String,
}
