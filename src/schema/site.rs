//! Site-wide configuration document (`site-config.json`)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::page::{ButtonRole, CtaButton, Extra};
use super::tokens::{
    self, Background, BannerLayout, BannerStyle, ButtonStyle, HeroBackgroundType, LogoSize,
    OverlayType, TextStyle,
};
use super::Resolve;

/// Singleton site configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub site: SiteIdentity,
    pub contact: ContactInfo,
    /// Display order matters
    pub service_areas: Vec<String>,
    pub colors: BrandColors,
    /// Platform -> URL; an empty URL disables the platform
    pub social_media: IndexMap<String, String>,
    pub header: HeaderStyle,
    pub footer: FooterStyle,
    /// Page key -> background image path
    pub hero_backgrounds: IndexMap<String, String>,
    /// Image key (`image-<filename>`) -> overlay settings
    pub hero_overlays: IndexMap<String, HeroOverlay>,
    pub hero_styling: HeroStyling,
    pub cta_banner: CtaBanner,
    #[serde(flatten)]
    pub extra: Extra,
}

impl SiteConfig {
    /// Social links that are switched on (non-empty URL), in stored order
    pub fn active_social_links(&self) -> Vec<(&str, &str)> {
        self.social_media
            .iter()
            .filter(|(_, url)| !url.trim().is_empty())
            .map(|(platform, url)| (platform.as_str(), url.as_str()))
            .collect()
    }

    /// Whether any field references the upload at `public_path`
    pub fn references_image(&self, public_path: &str) -> bool {
        self.hero_backgrounds
            .values()
            .any(|path| same_image(path, public_path))
            || same_image(&self.hero_styling.background_image, public_path)
    }
}

impl Resolve for SiteConfig {
    fn resolve(&mut self) {
        self.hero_backgrounds.retain(|_, path| !path.trim().is_empty());

        let banner = &mut self.cta_banner;
        banner.primary_button.apply_defaults(ButtonRole::BannerPrimary);
        if banner.secondary_button.link.is_empty() && !self.contact.phone.trim().is_empty() {
            banner.secondary_button.link = format!("tel:{}", phone_digits(&self.contact.phone));
        }
        banner
            .secondary_button
            .apply_defaults(ButtonRole::BannerSecondary);
    }
}

/// Compare two image references, tolerating a missing leading slash
pub fn same_image(reference: &str, public_path: &str) -> bool {
    let reference = reference.trim();
    !reference.is_empty() && reference.trim_start_matches('/') == public_path.trim_start_matches('/')
}

/// Key of the per-image overlay settings in `heroOverlays`
pub fn image_key(filename: &str) -> String {
    format!("image-{}", filename)
}

/// Keep digits and a leading `+` for `tel:` links
fn phone_digits(phone: &str) -> String {
    phone
        .trim()
        .chars()
        .enumerate()
        .filter(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '+'))
        .map(|(_, c)| c)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteIdentity {
    pub name: String,
    pub tagline: String,
    pub logo: String,
    #[serde(with = "tokens::logo_size_medium")]
    pub logo_size: LogoSize,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            name: String::new(),
            tagline: String::new(),
            logo: String::new(),
            logo_size: tokens::logo_size_medium::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Brand colors as hex strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self {
            primary: "#1d4ed8".to_string(),
            secondary: "#1e293b".to_string(),
            accent: "#f59e0b".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderStyle {
    #[serde(with = "tokens::background_white")]
    pub background: Background,
    #[serde(with = "tokens::text_style_dark")]
    pub text_style: TextStyle,
    #[serde(with = "tokens::button_style_solid")]
    pub cta_style: ButtonStyle,
    /// Shown unless explicitly `false`
    #[serde(with = "tokens::unless_false")]
    pub show_logo: bool,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            background: tokens::background_white::default(),
            text_style: tokens::text_style_dark::default(),
            cta_style: tokens::button_style_solid::default(),
            show_logo: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterStyle {
    #[serde(with = "tokens::background_dark")]
    pub background: Background,
    #[serde(with = "tokens::text_style_light")]
    pub text_style: TextStyle,
    /// Shown unless explicitly `false`
    #[serde(with = "tokens::unless_false")]
    pub show_logo: bool,
}

impl Default for FooterStyle {
    fn default() -> Self {
        Self {
            background: tokens::background_dark::default(),
            text_style: tokens::text_style_light::default(),
            show_logo: true,
        }
    }
}

/// Overlay drawn over a hero background image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroOverlay {
    #[serde(rename = "type", with = "tokens::overlay_dark")]
    pub overlay_type: OverlayType,
    /// 0.0 ..= 1.0
    pub opacity: f64,
    /// Only used by the `custom` overlay type
    pub color: String,
}

impl Default for HeroOverlay {
    fn default() -> Self {
        Self {
            overlay_type: tokens::overlay_dark::default(),
            opacity: 0.5,
            color: String::new(),
        }
    }
}

/// Styled hero background used when a page has no background image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroStyling {
    #[serde(with = "tokens::hero_background_gradient")]
    pub background_type: HeroBackgroundType,
    pub background_color: String,
    pub gradient_from: String,
    pub gradient_to: String,
    /// Site-wide image, used when `backgroundType` is `image`
    pub background_image: String,
}

impl Default for HeroStyling {
    fn default() -> Self {
        Self {
            background_type: tokens::hero_background_gradient::default(),
            background_color: "#1e3a8a".to_string(),
            gradient_from: "#1e3a8a".to_string(),
            gradient_to: "#2563eb".to_string(),
            background_image: String::new(),
        }
    }
}

impl HeroStyling {
    /// Back to the default gradient after the background image went away
    pub fn clear_image(&mut self) {
        self.background_image.clear();
        if self.background_type == HeroBackgroundType::Image {
            self.background_type = tokens::hero_background_gradient::default();
        }
    }
}

/// Call-to-action banner shown above the footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaBanner {
    pub title: String,
    pub subtitle: String,
    /// Page key -> shown. Only an explicit `false` hides the banner.
    pub enabled_pages: IndexMap<String, Value>,
    #[serde(with = "tokens::banner_style_gradient")]
    pub style: BannerStyle,
    #[serde(with = "tokens::banner_layout_centered")]
    pub layout: BannerLayout,
    pub primary_button: CtaButton,
    pub secondary_button: CtaButton,
}

impl Default for CtaBanner {
    fn default() -> Self {
        Self {
            title: "Ready to get started?".to_string(),
            subtitle: "Contact us today for fast, friendly service.".to_string(),
            enabled_pages: IndexMap::new(),
            style: tokens::banner_style_gradient::default(),
            layout: tokens::banner_layout_centered::default(),
            primary_button: CtaButton::default(),
            secondary_button: CtaButton::default(),
        }
    }
}

impl CtaBanner {
    pub fn is_enabled_on(&self, page_key: &str) -> bool {
        self.enabled_pages.get(page_key) != Some(&Value::Bool(false))
    }
}
