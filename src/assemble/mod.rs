//! Page assembly
//!
//! Loads every document a page needs, runs the page-level rules (section
//! order, service visibility, hero visuals, CTA banner) and returns one
//! render model. Read failures never fail a page: site config and navigation
//! fall back to their defaults, a missing or blank page document to its
//! built-in content.

mod blog;
mod hero;
mod markdown;
mod pricing;

pub use blog::{PostSummary, PostView};
pub use hero::{HeroBackground, ResolvedHero};
pub use markdown::MarkdownRenderer;
pub use pricing::{parse_feature_line, FeatureLine, PlanDisplay};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::schema::home::{HomeSections, TrustIndicator};
use crate::schema::page::{FaqItem, FeatureItem, GalleryItem, Testimonial};
use crate::schema::pages::{BusinessHours, ContactForm, TeamMember};
use crate::schema::tokens::{Background, BannerLayout, BannerStyle, DisplayType};
use crate::schema::{
    builtin_as, is_blank, parse_resolved, AboutPage, ButtonRole, ContactPage, Hero, HomePage,
    NavCta, NavLink, Navigation, PageId, PlanPage, ResolvedButton, ResourceId, Resolve,
    ReviewsPage, SectionKey, Service, ServicesConfig, SiteConfig,
};
use crate::store::{ContentStore, StoreError};

/// Errors for routes that address one item
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything one page needs to render
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    /// Key used for per-page settings (`heroBackgrounds`, banner pages)
    pub page: String,
    pub site: SiteConfig,
    pub social_links: Vec<SocialLink>,
    pub navigation: NavModel,
    pub hero: ResolvedHero,
    pub content: PageContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_banner: Option<BannerModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// Navigation with the services dropdown filled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavModel {
    pub header: Vec<NavItem>,
    pub footer: Vec<NavLink>,
    pub cta: NavCta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavLink>,
}

impl NavModel {
    /// With per-service pages, the `/services` header link gets a dropdown
    /// of the enabled services.
    pub fn new(nav: &Navigation, services: &ServicesConfig) -> Self {
        let dropdown: Vec<NavLink> = if services.has_detail_pages() {
            services
                .enabled_services()
                .into_iter()
                .map(|s| NavLink::new(&s.title, &s.href()))
                .collect()
        } else {
            Vec::new()
        };

        let services_route = PageId::Services.route();
        let header = nav
            .header
            .iter()
            .map(|link| NavItem {
                label: link.label.clone(),
                href: link.href.clone(),
                children: if link.href.trim_end_matches('/') == services_route {
                    dropdown.clone()
                } else {
                    Vec::new()
                },
            })
            .collect();

        Self {
            header,
            footer: nav.footer.clone(),
            cta: nav.cta.clone(),
        }
    }
}

/// The call-to-action banner above the footer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BannerModel {
    pub title: String,
    pub subtitle: String,
    pub style: BannerStyle,
    pub layout: BannerLayout,
    pub buttons: Vec<ResolvedButton>,
}

impl BannerModel {
    /// `None` when the banner is switched off for `page_key`
    pub fn for_page(site: &SiteConfig, page_key: &str) -> Option<Self> {
        let banner = &site.cta_banner;
        if !banner.is_enabled_on(page_key) {
            return None;
        }
        let slots = [
            (&banner.primary_button, ButtonRole::BannerPrimary),
            (&banner.secondary_button, ButtonRole::BannerSecondary),
        ];
        Some(Self {
            title: banner.title.clone(),
            subtitle: banner.subtitle.clone(),
            style: banner.style,
            layout: banner.layout,
            buttons: slots
                .into_iter()
                .filter(|(button, _)| button.enabled)
                .map(|(button, role)| button.resolved(role))
                .collect(),
        })
    }
}

/// One rendered home page section
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionModel {
    pub key: SectionKey,
    pub background: Background,
    pub title: String,
    pub subtitle: String,
    /// Link to the full listing, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_all: Option<String>,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "camelCase")]
pub enum SectionBody {
    Services(Vec<Service>),
    WhyChooseUs(Vec<FeatureItem>),
    Testimonials(Vec<Testimonial>),
    Pricing(Vec<PlanDisplay>),
    Gallery(Vec<GalleryItem>),
    Faq(Vec<FaqItem>),
}

/// Long-form text rendered from Markdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryModel {
    pub title: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Page-specific content
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageContent {
    #[serde(rename_all = "camelCase")]
    Home {
        trust_indicators: Vec<TrustIndicator>,
        sections: Vec<SectionModel>,
    },
    About {
        story: StoryModel,
        values: Vec<FeatureItem>,
        team: Vec<TeamMember>,
    },
    #[serde(rename_all = "camelCase")]
    Services {
        display_type: DisplayType,
        services: Vec<Service>,
        detail_pages: bool,
    },
    ServiceDetail {
        service: Service,
        related: Vec<Service>,
    },
    #[serde(rename_all = "camelCase")]
    Contact {
        form: ContactForm,
        hours: Vec<BusinessHours>,
        show_map: bool,
    },
    Plan {
        intro: String,
        plans: Vec<PlanDisplay>,
        benefits: Vec<FeatureItem>,
        faq: Vec<FaqItem>,
    },
    #[serde(rename_all = "camelCase")]
    Reviews {
        reviews: Vec<Testimonial>,
        average_rating: Option<f64>,
    },
    BlogIndex {
        posts: Vec<PostSummary>,
    },
    BlogPost {
        post: PostView,
    },
}

fn section(
    key: SectionKey,
    background: Background,
    title: &str,
    subtitle: &str,
    body: SectionBody,
) -> SectionModel {
    SectionModel {
        key,
        background,
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        view_all: None,
        body,
    }
}

/// Home sections in render order, bodies filled in
pub fn home_sections(sections: &HomeSections, services: &ServicesConfig) -> Vec<SectionModel> {
    sections
        .render_order()
        .into_iter()
        .filter_map(|key| section_model(key, sections, services))
        .collect()
}

fn section_model(
    key: SectionKey,
    sections: &HomeSections,
    services: &ServicesConfig,
) -> Option<SectionModel> {
    let model = match key {
        SectionKey::Services => {
            let s = sections.services.as_ref()?;
            let visible = services
                .visible_on_home(&s.hidden_services)
                .into_iter()
                .cloned()
                .collect();
            let mut model = section(key, s.background, &s.title, &s.subtitle, SectionBody::Services(visible));
            if services.show_all_services_page {
                model.view_all = Some(PageId::Services.route().to_string());
            }
            model
        }
        SectionKey::WhyChooseUs => {
            let s = sections.why_choose_us.as_ref()?;
            section(key, s.background, &s.title, &s.subtitle, SectionBody::WhyChooseUs(s.items.clone()))
        }
        SectionKey::Testimonials => {
            let s = sections.testimonials.as_ref()?;
            section(key, s.background, &s.title, &s.subtitle, SectionBody::Testimonials(s.items.clone()))
        }
        SectionKey::Pricing => {
            let s = sections.pricing.as_ref()?;
            let plans = s.plans.iter().map(PlanDisplay::from).collect();
            let mut model = section(key, s.background, &s.title, &s.subtitle, SectionBody::Pricing(plans));
            model.view_all = Some(PageId::Plan.route().to_string());
            model
        }
        SectionKey::Gallery => {
            let s = sections.gallery.as_ref()?;
            section(key, s.background, &s.title, &s.subtitle, SectionBody::Gallery(s.items.clone()))
        }
        SectionKey::Faq => {
            let s = sections.faq.as_ref()?;
            section(key, s.background, &s.title, &s.subtitle, SectionBody::Faq(s.items.clone()))
        }
    };
    Some(model)
}

/// Builds render models from a content store
#[derive(Debug, Clone)]
pub struct Assembler {
    store: ContentStore,
    markdown: MarkdownRenderer,
}

impl Assembler {
    pub fn new(store: ContentStore) -> Self {
        Self {
            store,
            markdown: MarkdownRenderer::new(),
        }
    }

    /// A singleton document, or its defaults when it cannot be read
    fn load_or_default<T>(&self, resource: ResourceId) -> T
    where
        T: DeserializeOwned + Resolve + Default,
    {
        match self.store.read_typed(resource) {
            Ok(doc) => doc,
            Err(err) => {
                if err.is_not_found() {
                    tracing::debug!("{} not saved yet, using defaults", resource);
                } else {
                    tracing::warn!("Failed to load {}, using defaults: {}", resource, err);
                }
                let mut doc = T::default();
                doc.resolve();
                doc
            }
        }
    }

    /// A page document, or its built-in content when missing, blank or
    /// unreadable
    fn load_page<T>(&self, page: PageId) -> T
    where
        T: DeserializeOwned + Resolve + Default,
    {
        let resource = ResourceId::Page(page);
        match self.store.read(resource) {
            Ok(value) if !is_blank(&value) => match parse_resolved(value) {
                Ok(doc) => return doc,
                Err(err) => tracing::warn!("Invalid {} document, using built-in: {}", resource, err),
            },
            Ok(_) => tracing::debug!("{} is blank, using built-in", resource),
            Err(err) if err.is_not_found() => {
                tracing::debug!("{} not saved yet, using built-in", resource)
            }
            Err(err) => tracing::warn!("Failed to load {}, using built-in: {}", resource, err),
        }
        builtin_as(resource)
    }

    pub fn site_config(&self) -> SiteConfig {
        self.load_or_default(ResourceId::SiteConfig)
    }

    pub fn services(&self) -> ServicesConfig {
        self.load_page(PageId::Services)
    }

    /// Shared frame around the page content
    fn frame(
        &self,
        page_key: &str,
        hero: ResolvedHero,
        site: SiteConfig,
        services: &ServicesConfig,
        content: PageContent,
    ) -> RenderModel {
        let navigation: Navigation = self.load_or_default(ResourceId::Navigation);
        let social_links = site
            .active_social_links()
            .into_iter()
            .map(|(platform, url)| SocialLink {
                platform: platform.to_string(),
                url: url.to_string(),
            })
            .collect();

        RenderModel {
            page: page_key.to_string(),
            social_links,
            navigation: NavModel::new(&navigation, services),
            hero,
            content,
            cta_banner: BannerModel::for_page(&site, page_key),
            site,
        }
    }

    /// Render model of a content page
    pub fn assemble(&self, page: PageId) -> RenderModel {
        let site = self.site_config();
        let services = self.services();
        let key = page.as_str();

        let (hero, content) = match page {
            PageId::Home => {
                let home: HomePage = self.load_page(page);
                let trust_indicators = if home.trust_indicators.enabled {
                    home.trust_indicators.items.clone()
                } else {
                    Vec::new()
                };
                let content = PageContent::Home {
                    trust_indicators,
                    sections: home_sections(&home.sections, &services),
                };
                (home.hero, content)
            }
            PageId::About => {
                let about: AboutPage = self.load_page(page);
                let story = StoryModel {
                    title: about.story.title.clone(),
                    html: self.markdown.render(&about.story.content),
                    image: about.story.image.clone(),
                };
                let content = PageContent::About {
                    story,
                    values: about.values,
                    team: about.team,
                };
                (about.hero, content)
            }
            PageId::Services => {
                let content = PageContent::Services {
                    display_type: services.display_type,
                    services: services.enabled_services().into_iter().cloned().collect(),
                    detail_pages: services.has_detail_pages(),
                };
                (services.hero.clone(), content)
            }
            PageId::Contact => {
                let contact: ContactPage = self.load_page(page);
                let content = PageContent::Contact {
                    form: contact.form,
                    hours: contact.hours,
                    show_map: contact.show_map,
                };
                (contact.hero, content)
            }
            PageId::Plan => {
                let plan: PlanPage = self.load_page(page);
                let content = PageContent::Plan {
                    intro: plan.intro,
                    plans: plan.plans.iter().map(PlanDisplay::from).collect(),
                    benefits: plan.benefits,
                    faq: plan.faq,
                };
                (plan.hero, content)
            }
            PageId::Reviews => {
                let reviews: ReviewsPage = self.load_page(page);
                let average_rating = reviews.average_rating();
                let content = PageContent::Reviews {
                    reviews: reviews.reviews,
                    average_rating,
                };
                (reviews.hero, content)
            }
        };

        let hero = ResolvedHero::new(&hero, &site, key);
        self.frame(key, hero, site, &services, content)
    }

    /// Detail page of one service; only exists with per-service pages
    pub fn assemble_service(&self, slug: &str) -> Result<RenderModel, AssembleError> {
        let services = self.services();
        let not_found = || AssembleError::NotFound(format!("Service `{}`", slug));
        if !services.has_detail_pages() {
            return Err(not_found());
        }
        let service = services
            .find(slug)
            .filter(|s| s.enabled)
            .cloned()
            .ok_or_else(not_found)?;

        let site = self.site_config();
        let key = PageId::Services.as_str();
        let mut hero = ResolvedHero::new(&Hero::new(&service.title, &service.description), &site, key);
        if let Some(image) = service.image.as_deref().filter(|i| !i.trim().is_empty()) {
            hero.background = HeroBackground::from_image(&site, image.trim());
        }

        let related = services
            .enabled_services()
            .into_iter()
            .filter(|s| s.slug != service.slug)
            .cloned()
            .collect();
        let content = PageContent::ServiceDetail { service, related };
        Ok(self.frame(key, hero, site, &services, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn assembler() -> (TempDir, Assembler, ContentStore) {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path());
        (dir, Assembler::new(store.clone()), store)
    }

    #[test]
    fn test_first_run_renders_builtin_content() {
        let (_dir, assembler, _store) = assembler();
        let model = assembler.assemble(PageId::Home);
        let builtin_home: HomePage = builtin_as(ResourceId::Page(PageId::Home));
        assert_eq!(model.hero.title, builtin_home.hero.title);
        assert_eq!(model.page, "home");
        assert!(model.cta_banner.is_some());
        match model.content {
            PageContent::Home { sections, .. } => assert!(!sections.is_empty()),
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_blank_plan_page_uses_builtin() {
        let (_dir, assembler, store) = assembler();
        store.write(ResourceId::Page(PageId::Plan), &json!({})).unwrap();
        match assembler.assemble(PageId::Plan).content {
            PageContent::Plan { plans, .. } => {
                assert!(!plans.is_empty());
                let parsed = plans
                    .iter()
                    .flat_map(|p| p.features.iter())
                    .find(|f| f.price.as_deref() == Some("$25"))
                    .unwrap();
                assert_eq!(parsed.period.as_deref(), Some("per month"));
                assert_eq!(parsed.description, "Monthly filter change");
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_documents_do_not_fail_the_page() {
        let (dir, assembler, store) = assembler();
        fs::write(dir.path().join("site-config.json"), "{ broken").unwrap();
        fs::write(dir.path().join("navigation.json"), "[]").unwrap();
        store
            .write(ResourceId::Page(PageId::About), &json!({"hero": {"title": "Our Story"}}))
            .unwrap();

        let model = assembler.assemble(PageId::About);
        assert_eq!(model.hero.title, "Our Story");
        assert_eq!(model.site, {
            let mut site = SiteConfig::default();
            site.resolve();
            site
        });
        assert!(model.navigation.header.is_empty());
    }

    #[test]
    fn test_null_flags_keep_the_stored_page() {
        let (_dir, assembler, store) = assembler();
        store
            .write(
                ResourceId::Page(PageId::Home),
                &json!({
                    "hero": {"title": "Stored Title"},
                    "sections": {"order": ["services", "faq"], "services": {"enabled": null}, "faq": {"enabled": null}}
                }),
            )
            .unwrap();

        let model = assembler.assemble(PageId::Home);
        assert_eq!(model.hero.title, "Stored Title");
        match model.content {
            PageContent::Home { sections, .. } => {
                let keys: Vec<_> = sections.iter().map(|s| s.key).collect();
                assert_eq!(keys, vec![SectionKey::Services]);
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_section_order_and_service_visibility() {
        let (_dir, assembler, store) = assembler();
        store
            .write(
                ResourceId::Page(PageId::Services),
                &json!({"services": [{"slug": "a", "enabled": true}, {"slug": "b", "enabled": false}, {"slug": "c"}]}),
            )
            .unwrap();
        store
            .write(
                ResourceId::Page(PageId::Home),
                &json!({
                    "hero": {"title": "Home"},
                    "sections": {
                        "order": ["faq", "services"],
                        "faq": {"items": [{"question": "Q", "answer": "A"}]},
                        "services": {"hiddenServices": ["a"]}
                    }
                }),
            )
            .unwrap();

        match assembler.assemble(PageId::Home).content {
            PageContent::Home { sections, .. } => {
                assert_eq!(sections.len(), 1);
                assert_eq!(sections[0].key, SectionKey::Services);
                assert_eq!(sections[0].view_all.as_deref(), Some("/services"));
                match &sections[0].body {
                    SectionBody::Services(list) => {
                        let slugs: Vec<_> = list.iter().map(|s| s.slug.as_str()).collect();
                        assert_eq!(slugs, vec!["c"]);
                    }
                    other => panic!("unexpected body {:?}", other),
                }
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_services_dropdown_only_with_detail_pages() {
        let (_dir, assembler, store) = assembler();
        store
            .write(
                ResourceId::Navigation,
                &json!({"header": [{"label": "Home", "href": "/"}, {"label": "Services", "href": "/services/"}]}),
            )
            .unwrap();
        let model = assembler.assemble(PageId::About);
        assert_eq!(model.navigation.header.len(), 2);
        assert!(model.navigation.header.iter().all(|i| i.children.is_empty()));

        store
            .write(
                ResourceId::Page(PageId::Services),
                &json!({
                    "pageType": "multiple",
                    "services": [{"title": "Duct Cleaning"}, {"title": "Hidden", "enabled": false}]
                }),
            )
            .unwrap();
        let model = assembler.assemble(PageId::About);
        let services = model
            .navigation
            .header
            .iter()
            .find(|i| i.label == "Services")
            .unwrap();
        assert_eq!(
            services.children,
            vec![NavLink::new("Duct Cleaning", "/services/duct-cleaning")]
        );
    }

    #[test]
    fn test_assemble_service() {
        let (_dir, assembler, store) = assembler();
        assert!(matches!(
            assembler.assemble_service("heating-repair"),
            Err(AssembleError::NotFound(_))
        ));

        store
            .write(
                ResourceId::Page(PageId::Services),
                &json!({
                    "pageType": "multiple",
                    "services": [
                        {"title": "Duct Cleaning", "image": "/uploads/service-1.jpg"},
                        {"title": "Old", "enabled": false}
                    ]
                }),
            )
            .unwrap();
        let model = assembler.assemble_service("duct-cleaning").unwrap();
        assert_eq!(model.hero.title, "Duct Cleaning");
        assert!(matches!(model.hero.background, HeroBackground::Image { .. }));
        assert!(matches!(
            assembler.assemble_service("old"),
            Err(AssembleError::NotFound(_))
        ));
        assert!(matches!(
            assembler.assemble_service("missing"),
            Err(AssembleError::NotFound(_))
        ));
    }

    #[test]
    fn test_banner_per_page() {
        let (_dir, assembler, store) = assembler();
        store
            .write(
                ResourceId::SiteConfig,
                &json!({
                    "contact": {"phone": "555-0100"},
                    "ctaBanner": {
                        "enabledPages": {"contact": false},
                        "primaryButton": {"text": "Book"},
                        "secondaryButton": {"enabled": false}
                    }
                }),
            )
            .unwrap();
        assert!(assembler.assemble(PageId::Contact).cta_banner.is_none());

        let banner = assembler.assemble(PageId::Reviews).cta_banner.unwrap();
        assert_eq!(banner.style, BannerStyle::Gradient);
        assert_eq!(banner.layout, BannerLayout::Centered);
        assert_eq!(banner.buttons.len(), 1);
        assert_eq!(banner.buttons[0].text, "Book");
        assert_eq!(banner.buttons[0].link, "/contact");
    }

    #[test]
    fn test_hero_background_per_page() {
        let (_dir, assembler, store) = assembler();
        store
            .write(
                ResourceId::SiteConfig,
                &json!({"heroBackgrounds": {"home": "/uploads/hero-background-9.jpg"}}),
            )
            .unwrap();
        assert!(matches!(
            assembler.assemble(PageId::Home).hero.background,
            HeroBackground::Image { .. }
        ));
        assert!(matches!(
            assembler.assemble(PageId::About).hero.background,
            HeroBackground::Gradient { .. }
        ));
    }

    #[test]
    fn test_about_story_is_rendered() {
        let (_dir, assembler, store) = assembler();
        store
            .write(
                ResourceId::Page(PageId::About),
                &json!({"story": {"title": "Since 1998", "content": "Family **owned**."}}),
            )
            .unwrap();
        match assembler.assemble(PageId::About).content {
            PageContent::About { story, .. } => {
                assert!(story.html.contains("<strong>owned</strong>"))
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_render_model_serializes() {
        let (_dir, assembler, _store) = assembler();
        let value = serde_json::to_value(assembler.assemble(PageId::Home)).unwrap();
        assert_eq!(value["content"]["type"], "home");
        assert!(value["hero"]["background"]["kind"].is_string());
        assert!(value["content"]["sections"][0]["body"]["type"].is_string());
    }
}
