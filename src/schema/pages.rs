//! The remaining page documents: about, contact, plan and reviews

use serde::{Deserialize, Serialize};

use super::page::{Extra, FaqItem, FeatureItem, Hero, PricingPlan, Testimonial};
use super::tokens;
use super::Resolve;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutPage {
    pub hero: Hero,
    pub story: Story,
    pub values: Vec<FeatureItem>,
    pub team: Vec<TeamMember>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub title: String,
    /// Markdown
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactPage {
    pub hero: Hero,
    pub form: ContactForm,
    pub hours: Vec<BusinessHours>,
    /// Shown unless explicitly `false`
    #[serde(with = "tokens::unless_false")]
    pub show_map: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Default for ContactPage {
    fn default() -> Self {
        Self {
            hero: Hero::default(),
            form: ContactForm::default(),
            hours: Vec::new(),
            show_map: true,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    pub title: String,
    pub subtitle: String,
    pub submit_text: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            title: "Send us a message".to_string(),
            subtitle: String::new(),
            submit_text: "Send Message".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub days: String,
    pub hours: String,
}

/// Maintenance plan page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanPage {
    pub hero: Hero,
    pub intro: String,
    pub plans: Vec<PricingPlan>,
    pub benefits: Vec<FeatureItem>,
    pub faq: Vec<FaqItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewsPage {
    pub hero: Hero,
    pub reviews: Vec<Testimonial>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl ReviewsPage {
    /// Mean star rating, `None` without reviews
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(total) / self.reviews.len() as f64)
    }
}

macro_rules! resolve_hero_only {
    ($($ty:ty),+) => {
        $(impl Resolve for $ty {
            fn resolve(&mut self) {
                self.hero.normalize_cta();
            }
        })+
    };
}

resolve_hero_only!(AboutPage, ContactPage, PlanPage, ReviewsPage);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_defaults() {
        let page: ContactPage = serde_json::from_str(r#"{"hours": [{"days": "Mon-Fri", "hours": "8-5"}]}"#).unwrap();
        assert!(page.show_map);
        assert_eq!(page.form.submit_text, "Send Message");
        assert_eq!(page.hours.len(), 1);
    }

    #[test]
    fn test_plan_page_resolves_hero() {
        let mut page: PlanPage =
            serde_json::from_str(r#"{"hero": {"title": "Plans", "ctaText": "Join"}}"#).unwrap();
        page.resolve();
        let primary = page.hero.cta.unwrap().primary.unwrap();
        assert_eq!(primary.text, "Join");
    }

    #[test]
    fn test_average_rating() {
        let page: ReviewsPage =
            serde_json::from_str(r#"{"reviews": [{"rating": 5}, {"rating": 4}]}"#).unwrap();
        assert_eq!(page.average_rating(), Some(4.5));
        assert_eq!(ReviewsPage::default().average_rating(), None);
    }
}
