//! Navigation document (`navigation.json`)

use serde::{Deserialize, Serialize};

use super::page::Extra;
use super::tokens;
use super::Resolve;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Navigation {
    pub header: Vec<NavLink>,
    pub footer: Vec<NavLink>,
    pub cta: NavCta,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Resolve for Navigation {
    fn resolve(&mut self) {
        self.header.retain(|link| !link.label.trim().is_empty());
        self.footer.retain(|link| !link.label.trim().is_empty());
        if self.cta.external {
            // External targets always leave the site
            self.cta.open_in_new_tab = true;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// Header call-to-action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavCta {
    pub label: String,
    pub href: String,
    #[serde(with = "tokens::only_if_true")]
    pub external: bool,
    #[serde(with = "tokens::only_if_true")]
    pub open_in_new_tab: bool,
}

impl Default for NavCta {
    fn default() -> Self {
        Self {
            label: "Get a Quote".to_string(),
            href: "/contact".to_string(),
            external: false,
            open_in_new_tab: false,
        }
    }
}
