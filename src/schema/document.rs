//! Typed documents and the default-resolution pass

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::home::HomePage;
use super::navigation::Navigation;
use super::pages::{AboutPage, ContactPage, PlanPage, ReviewsPage};
use super::resource::{PageId, ResourceId};
use super::services::ServicesConfig;
use super::site::SiteConfig;
use super::Resolve;

/// Any stored JSON document, typed by its resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    SiteConfig(SiteConfig),
    Navigation(Navigation),
    Home(HomePage),
    About(AboutPage),
    Services(ServicesConfig),
    Contact(ContactPage),
    Plan(PlanPage),
    Reviews(ReviewsPage),
}

/// Parse one typed document and run its default-resolution pass.
///
/// `null` is read as an empty object, so a blank file yields the
/// all-defaults document.
pub fn parse_resolved<T>(value: Value) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Resolve,
{
    let value = match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let mut doc: T = serde_json::from_value(value)?;
    doc.resolve();
    Ok(doc)
}

impl Document {
    /// Parse a raw document for `resource`, see [`parse_resolved`]
    pub fn from_value(resource: ResourceId, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match resource {
            ResourceId::SiteConfig => Document::SiteConfig(parse_resolved(value)?),
            ResourceId::Navigation => Document::Navigation(parse_resolved(value)?),
            ResourceId::Page(PageId::Home) => Document::Home(parse_resolved(value)?),
            ResourceId::Page(PageId::About) => Document::About(parse_resolved(value)?),
            ResourceId::Page(PageId::Services) => Document::Services(parse_resolved(value)?),
            ResourceId::Page(PageId::Contact) => Document::Contact(parse_resolved(value)?),
            ResourceId::Page(PageId::Plan) => Document::Plan(parse_resolved(value)?),
            ResourceId::Page(PageId::Reviews) => Document::Reviews(parse_resolved(value)?),
        })
    }

    /// Document with every field at its default
    pub fn empty(resource: ResourceId) -> Self {
        let mut doc = match resource {
            ResourceId::SiteConfig => Document::SiteConfig(Default::default()),
            ResourceId::Navigation => Document::Navigation(Default::default()),
            ResourceId::Page(PageId::Home) => Document::Home(Default::default()),
            ResourceId::Page(PageId::About) => Document::About(Default::default()),
            ResourceId::Page(PageId::Services) => Document::Services(Default::default()),
            ResourceId::Page(PageId::Contact) => Document::Contact(Default::default()),
            ResourceId::Page(PageId::Plan) => Document::Plan(Default::default()),
            ResourceId::Page(PageId::Reviews) => Document::Reviews(Default::default()),
        };
        doc.resolve();
        doc
    }

    pub fn resource(&self) -> ResourceId {
        match self {
            Document::SiteConfig(_) => ResourceId::SiteConfig,
            Document::Navigation(_) => ResourceId::Navigation,
            Document::Home(_) => ResourceId::Page(PageId::Home),
            Document::About(_) => ResourceId::Page(PageId::About),
            Document::Services(_) => ResourceId::Page(PageId::Services),
            Document::Contact(_) => ResourceId::Page(PageId::Contact),
            Document::Plan(_) => ResourceId::Page(PageId::Plan),
            Document::Reviews(_) => ResourceId::Page(PageId::Reviews),
        }
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Resolve for Document {
    fn resolve(&mut self) {
        match self {
            Document::SiteConfig(doc) => doc.resolve(),
            Document::Navigation(doc) => doc.resolve(),
            Document::Home(doc) => doc.resolve(),
            Document::About(doc) => doc.resolve(),
            Document::Services(doc) => doc.resolve(),
            Document::Contact(doc) => doc.resolve(),
            Document::Plan(doc) => doc.resolve(),
            Document::Reviews(doc) => doc.resolve(),
        }
    }
}

/// Whether a raw document carries no content at all
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
