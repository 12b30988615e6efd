//! Building blocks shared by page documents: hero, CTA buttons and list items

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tokens::{self, ButtonColor, TextColor};

/// Extra, unmodeled fields carried through load/save untouched
pub type Extra = Map<String, Value>;

/// Which slot a call-to-action button occupies; decides its defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    HeroPrimary,
    HeroSecondary,
    BannerPrimary,
    BannerSecondary,
}

impl ButtonRole {
    pub fn color(self) -> ButtonColor {
        match self {
            ButtonRole::HeroPrimary => ButtonColor::Primary,
            ButtonRole::HeroSecondary | ButtonRole::BannerSecondary => ButtonColor::Outline,
            ButtonRole::BannerPrimary => ButtonColor::White,
        }
    }

    pub fn text_color(self) -> TextColor {
        match self {
            ButtonRole::HeroPrimary | ButtonRole::BannerSecondary => TextColor::White,
            ButtonRole::HeroSecondary | ButtonRole::BannerPrimary => TextColor::Primary,
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            ButtonRole::HeroPrimary => "Get a Free Estimate",
            ButtonRole::HeroSecondary => "Contact Us",
            ButtonRole::BannerPrimary => "Schedule Service",
            ButtonRole::BannerSecondary => "Call Now",
        }
    }

    pub fn link(self) -> &'static str {
        "/contact"
    }
}

/// A call-to-action button as stored in a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaButton {
    /// Shown unless explicitly `false`
    #[serde(with = "tokens::unless_false")]
    pub enabled: bool,
    pub text: String,
    pub link: String,
    #[serde(with = "tokens::optional", skip_serializing_if = "Option::is_none")]
    pub color: Option<ButtonColor>,
    #[serde(with = "tokens::optional", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<TextColor>,
}

impl Default for CtaButton {
    fn default() -> Self {
        Self {
            enabled: true,
            text: String::new(),
            link: String::new(),
            color: None,
            text_color: None,
        }
    }
}

impl CtaButton {
    /// Fill every empty field from the defaults of `role`
    pub fn apply_defaults(&mut self, role: ButtonRole) {
        if self.text.is_empty() {
            self.text = role.text().to_string();
        }
        if self.link.is_empty() {
            self.link = role.link().to_string();
        }
        self.color.get_or_insert(role.color());
        self.text_color.get_or_insert(role.text_color());
    }

    /// Render-ready view of the button
    pub fn resolved(&self, role: ButtonRole) -> ResolvedButton {
        let mut button = self.clone();
        button.apply_defaults(role);
        ResolvedButton {
            text: button.text,
            link: button.link,
            color: button.color.unwrap_or(role.color()),
            text_color: button.text_color.unwrap_or(role.text_color()),
        }
    }
}

/// A button with every style decided
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedButton {
    pub text: String,
    pub link: String,
    pub color: ButtonColor,
    pub text_color: TextColor,
}

/// Primary and secondary hero buttons
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroCta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<CtaButton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<CtaButton>,
}

/// Hero block at the top of every page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<HeroCta>,
    /// Legacy flat CTA label, superseded by `cta.primary`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    /// Legacy flat CTA target, superseded by `cta.primary`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Hero {
    pub fn new(title: &str, subtitle: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            ..Default::default()
        }
    }

    /// Make `cta` authoritative.
    ///
    /// When `cta` is absent it is synthesized from the legacy `ctaText` /
    /// `ctaLink` fields; a partially filled `cta` gets its missing buttons
    /// from the role defaults.
    pub fn normalize_cta(&mut self) {
        let cta = match self.cta.take() {
            Some(cta) => cta,
            None => {
                let mut primary = CtaButton::default();
                if let Some(text) = &self.cta_text {
                    primary.text = text.clone();
                }
                if let Some(link) = &self.cta_link {
                    primary.link = link.clone();
                }
                HeroCta {
                    primary: Some(primary),
                    secondary: None,
                }
            }
        };

        let mut primary = cta.primary.unwrap_or_default();
        primary.apply_defaults(ButtonRole::HeroPrimary);
        let mut secondary = cta.secondary.unwrap_or_default();
        secondary.apply_defaults(ButtonRole::HeroSecondary);

        self.cta = Some(HeroCta {
            primary: Some(primary),
            secondary: Some(secondary),
        });
    }

    /// Enabled hero buttons, primary first
    pub fn buttons(&self) -> Vec<ResolvedButton> {
        let mut hero = self.clone();
        hero.normalize_cta();
        let cta = hero.cta.unwrap_or_default();

        let slots = [
            (cta.primary, ButtonRole::HeroPrimary),
            (cta.secondary, ButtonRole::HeroSecondary),
        ];
        slots
            .into_iter()
            .filter_map(|(button, role)| button.map(|b| (b, role)))
            .filter(|(button, _)| button.enabled)
            .map(|(button, role)| button.resolved(role))
            .collect()
    }
}

/// Icon + title + description, used by feature grids and value lists
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureItem {
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl FeatureItem {
    pub fn new(icon: &str, title: &str, description: &str) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Customer review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub location: String,
    pub text: String,
    pub rating: u8,
}

impl Default for Testimonial {
    fn default() -> Self {
        Self {
            name: String::new(),
            location: String::new(),
            text: String::new(),
            rating: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryItem {
    pub image: String,
    pub title: String,
    pub description: String,
}

/// A maintenance or service plan with its feature lines
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingPlan {
    pub name: String,
    pub price: String,
    pub period: String,
    pub description: String,
    /// Free text; may embed `$amount` and `per <unit>` tokens
    pub features: Vec<String>,
    #[serde(with = "tokens::only_if_true")]
    pub highlighted: bool,
    pub cta_text: String,
    pub cta_link: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cta_preferred_over_legacy_fields() {
        let mut hero: Hero = serde_json::from_str(
            r#"{
                "title": "Hi",
                "ctaText": "Old",
                "ctaLink": "/old",
                "cta": {"primary": {"text": "New", "link": "/new", "color": "accent"}}
            }"#,
        )
        .unwrap();
        hero.normalize_cta();

        let cta = hero.cta.unwrap();
        let primary = cta.primary.unwrap();
        assert_eq!(primary.text, "New");
        assert_eq!(primary.link, "/new");
        assert_eq!(primary.color, Some(ButtonColor::Accent));
        assert_eq!(primary.text_color, Some(TextColor::White));
        assert_eq!(cta.secondary.unwrap().link, "/contact");
    }

    #[test]
    fn test_legacy_fields_synthesize_cta() {
        let mut hero: Hero =
            serde_json::from_str(r#"{"ctaText": "Book Now", "ctaLink": "/book"}"#).unwrap();
        hero.normalize_cta();

        let cta = hero.cta.clone().unwrap();
        let primary = cta.primary.unwrap();
        assert_eq!(primary.text, "Book Now");
        assert_eq!(primary.link, "/book");
        assert_eq!(primary.color, Some(ButtonColor::Primary));
        assert_eq!(primary.text_color, Some(TextColor::White));

        let secondary = cta.secondary.unwrap();
        assert!(secondary.enabled);
        assert_eq!(secondary.link, "/contact");
        assert_eq!(secondary.color, Some(ButtonColor::Outline));
        assert_eq!(secondary.text_color, Some(TextColor::Primary));

        // Legacy fields survive for round-tripping
        assert_eq!(hero.cta_text.as_deref(), Some("Book Now"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut once: Hero = serde_json::from_str(r#"{"ctaText": "Go"}"#).unwrap();
        once.normalize_cta();
        let mut twice = once.clone();
        twice.normalize_cta();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_disabled_buttons_are_not_rendered() {
        let hero: Hero = serde_json::from_str(
            r#"{"cta": {"primary": {"text": "Go"}, "secondary": {"enabled": false}}}"#,
        )
        .unwrap();
        let buttons = hero.buttons();
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].text, "Go");
        assert_eq!(buttons[0].color, ButtonColor::Primary);
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let hero: Hero = serde_json::from_str(r#"{"title": "T", "badge": "New!"}"#).unwrap();
        let value = serde_json::to_value(&hero).unwrap();
        assert_eq!(value["badge"], "New!");
    }
}
