//! Content schema: typed documents, style tokens and default resolution
//!
//! Every document type runs one default-resolution pass right after it is
//! parsed. Field-level defaults come from serde; rules that span fields
//! (legacy CTA fields, role-dependent button styles, derived slugs) live in
//! each type's [`Resolve`] impl. Consumers only ever see resolved documents.

mod builtin;
mod document;
pub mod home;
pub mod navigation;
pub mod page;
pub mod pages;
mod resource;
pub mod services;
pub mod site;
pub mod slug;
pub mod tokens;

pub use builtin::{builtin, builtin_as, builtin_json};
pub use document::{is_blank, parse_resolved, Document};
pub use home::{HomePage, HomeSections, Polarity, SectionKey};
pub use navigation::{NavCta, NavLink, Navigation};
pub use page::{ButtonRole, CtaButton, Hero, PricingPlan, ResolvedButton};
pub use pages::{AboutPage, ContactPage, PlanPage, ReviewsPage};
pub use resource::{PageId, ResourceId, UnknownResource};
pub use services::{Service, ServicesConfig};
pub use site::{HeroOverlay, SiteConfig};

/// The default-resolution pass of a document type.
///
/// Must be idempotent: resolving twice equals resolving once.
pub trait Resolve {
    fn resolve(&mut self);
}
