//! Built-in default content, used on first run and for blank page documents

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::document::{parse_resolved, Document};
use super::resource::{PageId, ResourceId};
use super::Resolve;

/// Raw JSON of the built-in document for `resource`
pub fn builtin_json(resource: ResourceId) -> &'static str {
    match resource {
        ResourceId::SiteConfig => include_str!("defaults/site-config.json"),
        ResourceId::Navigation => include_str!("defaults/navigation.json"),
        ResourceId::Page(PageId::Home) => include_str!("defaults/home.json"),
        ResourceId::Page(PageId::About) => include_str!("defaults/about.json"),
        ResourceId::Page(PageId::Services) => include_str!("defaults/services.json"),
        ResourceId::Page(PageId::Contact) => include_str!("defaults/contact.json"),
        ResourceId::Page(PageId::Plan) => include_str!("defaults/plan.json"),
        ResourceId::Page(PageId::Reviews) => include_str!("defaults/reviews.json"),
    }
}

/// The built-in document for `resource`, defaults resolved
pub fn builtin(resource: ResourceId) -> Document {
    let parsed = serde_json::from_str::<Value>(builtin_json(resource))
        .and_then(|value| Document::from_value(resource, value));
    match parsed {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!("Built-in {} document is invalid: {}", resource, e);
            Document::empty(resource)
        }
    }
}

/// The built-in document for `resource` as its concrete type
pub fn builtin_as<T>(resource: ResourceId) -> T
where
    T: DeserializeOwned + Resolve + Default,
{
    let parsed = serde_json::from_str::<Value>(builtin_json(resource)).and_then(parse_resolved);
    match parsed {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!("Built-in {} document is invalid: {}", resource, e);
            let mut doc = T::default();
            doc.resolve();
            doc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_parses() {
        for resource in ResourceId::all() {
            let value: Value = serde_json::from_str(builtin_json(resource)).unwrap();
            let doc = Document::from_value(resource, value).unwrap();
            assert_eq!(doc.resource(), resource);
            assert_ne!(doc, Document::empty(resource), "{} is empty", resource);
        }
    }

    #[test]
    fn test_builtin_home_has_all_sections() {
        match builtin(ResourceId::Page(PageId::Home)) {
            Document::Home(home) => {
                assert!(home.sections.services.is_some());
                assert!(home.sections.faq.is_some());
                assert_eq!(home.sections.order.len(), 6);
            }
            other => panic!("unexpected document {:?}", other),
        }
    }

    #[test]
    fn test_builtin_as_matches_builtin() {
        let plan: crate::schema::PlanPage = builtin_as(ResourceId::Page(PageId::Plan));
        assert_eq!(Document::Plan(plan), builtin(ResourceId::Page(PageId::Plan)));
    }
}
