//! Resource identifiers: the closed set of documents the store holds

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One content page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Home,
    About,
    Services,
    Contact,
    Plan,
    Reviews,
}

impl PageId {
    pub const ALL: [PageId; 6] = [
        PageId::Home,
        PageId::About,
        PageId::Services,
        PageId::Contact,
        PageId::Plan,
        PageId::Reviews,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Home => "home",
            PageId::About => "about",
            PageId::Services => "services",
            PageId::Contact => "contact",
            PageId::Plan => "plan",
            PageId::Reviews => "reviews",
        }
    }

    /// Public route of the page
    pub fn route(self) -> &'static str {
        match self {
            PageId::Home => "/",
            PageId::About => "/about",
            PageId::Services => "/services",
            PageId::Contact => "/contact",
            PageId::Plan => "/plan",
            PageId::Reviews => "/reviews",
        }
    }
}

/// Identifier of a stored JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceId {
    SiteConfig,
    Navigation,
    Page(PageId),
}

impl ResourceId {
    pub fn all() -> impl Iterator<Item = ResourceId> {
        [ResourceId::SiteConfig, ResourceId::Navigation]
            .into_iter()
            .chain(PageId::ALL.into_iter().map(ResourceId::Page))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceId::SiteConfig => "site-config",
            ResourceId::Navigation => "navigation",
            ResourceId::Page(page) => page.as_str(),
        }
    }

    /// Location relative to the content root
    pub fn relative_path(self) -> String {
        match self {
            ResourceId::SiteConfig | ResourceId::Navigation => format!("{}.json", self.as_str()),
            ResourceId::Page(page) => format!("pages/{}.json", page.as_str()),
        }
    }
}

/// Token that names no known resource
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown content type: {0}")]
pub struct UnknownResource(pub String);

impl FromStr for PageId {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageId::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| UnknownResource(s.to_string()))
    }
}

impl FromStr for ResourceId {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "site-config" => Ok(ResourceId::SiteConfig),
            "navigation" => Ok(ResourceId::Navigation),
            other => other.parse().map(ResourceId::Page),
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
