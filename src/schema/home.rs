//! Home page document (`pages/home.json`) and its orderable sections

use serde::{Deserialize, Serialize};
use std::fmt;

use super::page::{
    Extra, FaqItem, FeatureItem, GalleryItem, Hero, PricingPlan, Testimonial,
};
use super::tokens::{self, Background};
use super::Resolve;

/// How a missing `enabled` flag is read.
///
/// The split between the two is historical: the baseline sections predate
/// the opt-in ones. Stored content depends on it, so it stays as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// `enabled !== false`
    EnabledUnlessFalse,
    /// `enabled === true`
    DisabledUnlessTrue,
}

impl Polarity {
    pub fn default_enabled(self) -> bool {
        matches!(self, Polarity::EnabledUnlessFalse)
    }
}

/// Keys of the home page sections the renderer knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    Services,
    WhyChooseUs,
    Testimonials,
    Pricing,
    Gallery,
    Faq,
}

impl SectionKey {
    /// Canonical display order, used when a document has no `order`
    pub const ALL: [SectionKey; 6] = [
        SectionKey::Services,
        SectionKey::WhyChooseUs,
        SectionKey::Testimonials,
        SectionKey::Pricing,
        SectionKey::Gallery,
        SectionKey::Faq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Services => "services",
            SectionKey::WhyChooseUs => "whyChooseUs",
            SectionKey::Testimonials => "testimonials",
            SectionKey::Pricing => "pricing",
            SectionKey::Gallery => "gallery",
            SectionKey::Faq => "faq",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn polarity(self) -> Polarity {
        match self {
            SectionKey::Services | SectionKey::WhyChooseUs | SectionKey::Testimonials => {
                Polarity::EnabledUnlessFalse
            }
            SectionKey::Pricing | SectionKey::Gallery | SectionKey::Faq => {
                Polarity::DisabledUnlessTrue
            }
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Home page content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomePage {
    pub hero: Hero,
    pub trust_indicators: TrustIndicators,
    pub sections: HomeSections,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resolve for HomePage {
    fn resolve(&mut self) {
        self.hero.normalize_cta();
    }
}

/// Small badges under the hero ("Licensed & Insured", ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustIndicators {
    /// Shown unless explicitly `false`
    #[serde(with = "tokens::unless_false")]
    pub enabled: bool,
    pub items: Vec<TrustIndicator>,
}

impl Default for TrustIndicators {
    fn default() -> Self {
        Self {
            enabled: true,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustIndicator {
    pub icon: String,
    pub text: String,
}

/// The orderable home page sections.
///
/// Only keys listed in `order` are rendered, in that order. A section absent
/// from this object is never rendered, whatever `order` says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeSections {
    pub order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<ServicesSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_choose_us: Option<WhyChooseUsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<TestimonialsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<GallerySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faq: Option<FaqSection>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for HomeSections {
    fn default() -> Self {
        Self {
            order: SectionKey::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            services: None,
            why_choose_us: None,
            testimonials: None,
            pricing: None,
            gallery: None,
            faq: None,
            extra: Extra::new(),
        }
    }
}

impl HomeSections {
    /// `Some(enabled)` when the section is present, `None` when absent
    pub fn enabled(&self, key: SectionKey) -> Option<bool> {
        match key {
            SectionKey::Services => self.services.as_ref().map(|s| s.enabled),
            SectionKey::WhyChooseUs => self.why_choose_us.as_ref().map(|s| s.enabled),
            SectionKey::Testimonials => self.testimonials.as_ref().map(|s| s.enabled),
            SectionKey::Pricing => self.pricing.as_ref().map(|s| s.enabled),
            SectionKey::Gallery => self.gallery.as_ref().map(|s| s.enabled),
            SectionKey::Faq => self.faq.as_ref().map(|s| s.enabled),
        }
    }

    /// Keys to render, in display order.
    ///
    /// A key is kept when it is recognized, present in the sections object,
    /// and enabled under its polarity. Repeated keys render once.
    pub fn render_order(&self) -> Vec<SectionKey> {
        let mut keys: Vec<SectionKey> = Vec::new();
        for raw in &self.order {
            let Some(key) = SectionKey::parse(raw) else {
                tracing::warn!("Ignoring unknown home section `{}` in order", raw);
                continue;
            };
            if keys.contains(&key) {
                continue;
            }
            if self.enabled(key) == Some(true) {
                keys.push(key);
            }
        }
        keys
    }

    /// Slugs hidden from the home page services grid
    pub fn hidden_services(&self) -> &[String] {
        self.services
            .as_ref()
            .map(|s| s.hidden_services.as_slice())
            .unwrap_or(&[])
    }
}

/// Fields every section carries
macro_rules! section_default {
    ($ty:ident, $key:expr, $background:path, { $($field:ident : $value:expr),* $(,)? }) => {
        impl Default for $ty {
            fn default() -> Self {
                Self {
                    enabled: $key.polarity().default_enabled(),
                    background: $background(),
                    title: String::new(),
                    subtitle: String::new(),
                    $($field: $value,)*
                    extra: Extra::new(),
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServicesSection {
    #[serde(with = "tokens::unless_false")]
    pub enabled: bool,
    #[serde(with = "tokens::background_white")]
    pub background: Background,
    pub title: String,
    pub subtitle: String,
    /// Service slugs left off the home page grid
    pub hidden_services: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

section_default!(ServicesSection, SectionKey::Services, tokens::background_white::default, {
    hidden_services: Vec::new(),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhyChooseUsSection {
    #[serde(with = "tokens::unless_false")]
    pub enabled: bool,
    #[serde(with = "tokens::background_gray")]
    pub background: Background,
    pub title: String,
    pub subtitle: String,
    pub items: Vec<FeatureItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

section_default!(WhyChooseUsSection, SectionKey::WhyChooseUs, tokens::background_gray::default, {
    items: Vec::new(),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialsSection {
    #[serde(with = "tokens::unless_false")]
    pub enabled: bool,
    #[serde(with = "tokens::background_white")]
    pub background: Background,
    pub title: String,
    pub subtitle: String,
    pub items: Vec<Testimonial>,
    #[serde(flatten)]
    pub extra: Extra,
}

section_default!(TestimonialsSection, SectionKey::Testimonials, tokens::background_white::default, {
    items: Vec::new(),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSection {
    #[serde(with = "tokens::only_if_true")]
    pub enabled: bool,
    #[serde(with = "tokens::background_gray")]
    pub background: Background,
    pub title: String,
    pub subtitle: String,
    pub plans: Vec<PricingPlan>,
    #[serde(flatten)]
    pub extra: Extra,
}

section_default!(PricingSection, SectionKey::Pricing, tokens::background_gray::default, {
    plans: Vec::new(),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySection {
    #[serde(with = "tokens::only_if_true")]
    pub enabled: bool,
    #[serde(with = "tokens::background_white")]
    pub background: Background,
    pub title: String,
    pub subtitle: String,
    pub items: Vec<GalleryItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

section_default!(GallerySection, SectionKey::Gallery, tokens::background_white::default, {
    items: Vec::new(),
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqSection {
    #[serde(with = "tokens::only_if_true")]
    pub enabled: bool,
    #[serde(with = "tokens::background_gray")]
    pub background: Background,
    pub title: String,
    pub subtitle: String,
    pub items: Vec<FaqItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

section_default!(FaqSection, SectionKey::Faq, tokens::background_gray::default, {
    items: Vec::new(),
});
