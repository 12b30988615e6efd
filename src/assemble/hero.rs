//! Hero visuals: background image or styled fallback, plus buttons

use serde::Serialize;

use crate::schema::site::{image_key, HeroStyling, SiteConfig};
use crate::schema::tokens::HeroBackgroundType;
use crate::schema::{Hero, HeroOverlay, ResolvedButton};

/// Background drawn behind a hero
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HeroBackground {
    /// Full-bleed image with its overlay
    #[serde(rename_all = "camelCase")]
    Image {
        image: String,
        image_key: String,
        overlay: HeroOverlay,
    },
    Gradient {
        from: String,
        to: String,
    },
    Solid {
        color: String,
    },
}

impl HeroBackground {
    /// Background of the hero on `page_key`.
    ///
    /// A non-empty `heroBackgrounds[page_key]` wins. Next is a site-wide
    /// `heroStyling` image, then the styled gradient or solid color.
    pub fn resolve(site: &SiteConfig, page_key: &str) -> Self {
        let per_page = site
            .hero_backgrounds
            .get(page_key)
            .map(|path| path.trim())
            .filter(|path| !path.is_empty());
        if let Some(path) = per_page {
            return Self::from_image(site, path);
        }

        let styling = &site.hero_styling;
        if styling.background_type == HeroBackgroundType::Image
            && !styling.background_image.trim().is_empty()
        {
            return Self::from_image(site, styling.background_image.trim());
        }
        Self::styled(styling)
    }

    /// Image background with the overlay stored for that image
    pub fn from_image(site: &SiteConfig, path: &str) -> Self {
        let filename = path.rsplit('/').next().unwrap_or(path);
        let key = image_key(filename);
        let overlay = site.hero_overlays.get(&key).cloned().unwrap_or_default();
        HeroBackground::Image {
            image: path.to_string(),
            image_key: key,
            overlay,
        }
    }

    fn styled(styling: &HeroStyling) -> Self {
        match styling.background_type {
            HeroBackgroundType::Solid => HeroBackground::Solid {
                color: styling.background_color.clone(),
            },
            HeroBackgroundType::Gradient | HeroBackgroundType::Image => HeroBackground::Gradient {
                from: styling.gradient_from.clone(),
                to: styling.gradient_to.clone(),
            },
        }
    }
}

/// Hero with buttons and background decided
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHero {
    pub title: String,
    pub subtitle: String,
    /// Foreground image of the hero, not its background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub buttons: Vec<ResolvedButton>,
    pub background: HeroBackground,
}

impl ResolvedHero {
    pub fn new(hero: &Hero, site: &SiteConfig, page_key: &str) -> Self {
        Self {
            title: hero.title.clone(),
            subtitle: hero.subtitle.clone(),
            image: hero
                .image
                .as_deref()
                .map(str::trim)
                .filter(|image| !image.is_empty())
                .map(str::to_string),
            buttons: hero.buttons(),
            background: HeroBackground::resolve(site, page_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tokens::OverlayType;

    fn site(json: &str) -> SiteConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_per_page_image_with_overlay() {
        let site = site(
            r#"{
                "heroBackgrounds": {"home": "/uploads/hero-background-1.jpg"},
                "heroOverlays": {"image-hero-background-1.jpg": {"type": "primary", "opacity": 0.3}}
            }"#,
        );
        match HeroBackground::resolve(&site, "home") {
            HeroBackground::Image {
                image,
                image_key,
                overlay,
            } => {
                assert_eq!(image, "/uploads/hero-background-1.jpg");
                assert_eq!(image_key, "image-hero-background-1.jpg");
                assert_eq!(overlay.overlay_type, OverlayType::Primary);
                assert_eq!(overlay.opacity, 0.3);
            }
            other => panic!("unexpected background {:?}", other),
        }
    }

    #[test]
    fn test_missing_overlay_uses_default() {
        let site = site(r#"{"heroBackgrounds": {"about": "/uploads/a.png"}}"#);
        match HeroBackground::resolve(&site, "about") {
            HeroBackground::Image { overlay, .. } => assert_eq!(overlay, HeroOverlay::default()),
            other => panic!("unexpected background {:?}", other),
        }
    }

    #[test]
    fn test_fallback_to_styling() {
        let gradient = site(r#"{"heroBackgrounds": {"home": "  "}}"#);
        assert!(matches!(
            HeroBackground::resolve(&gradient, "home"),
            HeroBackground::Gradient { .. }
        ));

        let solid = site(r##"{"heroStyling": {"backgroundType": "solid", "backgroundColor": "#111"}}"##);
        assert_eq!(
            HeroBackground::resolve(&solid, "contact"),
            HeroBackground::Solid {
                color: "#111".to_string()
            }
        );
    }

    #[test]
    fn test_hero_image_is_carried() {
        let config = site("{}");
        let mut hero = Hero::new("Welcome", "");
        hero.image = Some("/uploads/van.png".to_string());
        let resolved = ResolvedHero::new(&hero, &config, "home");
        assert_eq!(resolved.image.as_deref(), Some("/uploads/van.png"));

        hero.image = Some("  ".to_string());
        assert_eq!(ResolvedHero::new(&hero, &config, "home").image, None);
    }

    #[test]
    fn test_site_wide_image() {
        let wide = site(
            r#"{"heroStyling": {"backgroundType": "image", "backgroundImage": "/uploads/site.jpg"}}"#,
        );
        assert!(matches!(
            HeroBackground::resolve(&wide, "reviews"),
            HeroBackground::Image { ref image, .. } if image == "/uploads/site.jpg"
        ));

        let empty = site(r#"{"heroStyling": {"backgroundType": "image"}}"#);
        assert!(matches!(
            HeroBackground::resolve(&empty, "reviews"),
            HeroBackground::Gradient { .. }
        ));
    }
}
