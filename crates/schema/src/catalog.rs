//! The site's resource catalog
//!
//! Every admin screen of the marketing site manages one of the resources
//! declared here. Adding a screen means adding a definition, not a
//! controller.

use crate::envelope::Envelope;
use crate::field::FieldDef;
use crate::resource::ResourceDef;
use estate_core::{AdminError, AdminResult, Validatable};
use std::collections::HashSet;

/// A named set of resource definitions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    resources: Vec<ResourceDef>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource definition
    pub fn with(mut self, resource: ResourceDef) -> Self {
        self.resources.push(resource);
        self
    }

    /// Look up a resource by name
    pub fn get(&self, name: &str) -> AdminResult<&ResourceDef> {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| AdminError::ResourceNotFound(name.to_string()))
    }

    /// Iterate over resources in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResourceDef> {
        self.resources.iter()
    }

    /// Resource names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The resources managed by the site's admin screens
    pub fn site() -> Self {
        Self::new()
            // ── Home page ────────────────────────────────────────────────
            .with(
                ResourceDef::new("hero-carousel", "/hero-carousel")
                    .with_description("Slides of the home page hero carousel")
                    .with_item_label("slide")
                    .with_field(FieldDef::text("heading").required())
                    .with_field(FieldDef::text("subheading").required())
                    .with_field(FieldDef::image("image").required()),
            )
            .with(
                ResourceDef::new("mission", "/home/mission")
                    .with_description("Mission statement block")
                    .with_item_label("mission")
                    .with_envelope(Envelope::Single)
                    .with_field(FieldDef::text("title").required())
                    .with_field(FieldDef::long_text("description").required())
                    .with_field(FieldDef::image("image")),
            )
            .with(
                ResourceDef::new("home-projects", "/home/projects")
                    .with_description("Projects featured on the home page")
                    .with_item_label("project")
                    .with_field(FieldDef::text("title").required())
                    .with_field(FieldDef::text("location").required())
                    .with_field(FieldDef::long_text("description"))
                    .with_field(FieldDef::image("image").required()),
            )
            .with(
                ResourceDef::new("testimonials", "/home/testimonials")
                    .with_description("Client testimonials")
                    .with_item_label("testimonial")
                    .with_field(FieldDef::text("name").required())
                    .with_field(FieldDef::text("designation"))
                    .with_field(FieldDef::long_text("message").required())
                    .with_field(FieldDef::image("image")),
            )
            .with(
                ResourceDef::new("company-values", "/home/company-values")
                    .with_description("Company values grid")
                    .with_item_label("value")
                    .with_envelope(Envelope::Data)
                    .with_field(FieldDef::text("title").required())
                    .with_field(FieldDef::long_text("description").required())
                    .with_field(FieldDef::image("icon")),
            )
            // ── Shared content ───────────────────────────────────────────
            .with(
                ResourceDef::new("partners", "/partners")
                    .with_description("Partner companies")
                    .with_item_label("partner")
                    .with_field(FieldDef::text("name").required())
                    .with_field(FieldDef::long_text("description").required())
                    .with_field(FieldDef::image("logo")),
            )
            .with(
                ResourceDef::new("news", "/news")
                    .with_description("News and press articles")
                    .with_item_label("article")
                    .with_field(FieldDef::text("title").required())
                    .with_field(FieldDef::date("date").required())
                    .with_field(FieldDef::long_text("summary"))
                    .with_field(FieldDef::long_text("content").required())
                    .with_field(FieldDef::image("image")),
            )
            .with(
                ResourceDef::new("gallery", "/gallery")
                    .with_description("Site photo gallery")
                    .with_item_label("photo")
                    .with_field(FieldDef::text("title"))
                    .with_field(FieldDef::image("image").required()),
            )
            .with(
                ResourceDef::new("footer", "/footer")
                    .with_description("Footer contact details and social links")
                    .with_item_label("footer")
                    .with_envelope(Envelope::Single)
                    .with_field(FieldDef::long_text("address").required())
                    .with_field(FieldDef::text("phone").required())
                    .with_field(FieldDef::text("email").required())
                    .with_field(FieldDef::text("facebook"))
                    .with_field(FieldDef::text("instagram"))
                    .with_field(FieldDef::text("linkedin")),
            )
            // ── Project pages ────────────────────────────────────────────
            .with(
                ResourceDef::new("hpr-projects", "/hpr-projects")
                    .with_description("Projects with their own detail pages")
                    .with_item_label("project")
                    .with_envelope(Envelope::Data)
                    .with_field(FieldDef::text("title").required())
                    .with_field(FieldDef::text("location").required())
                    .with_field(FieldDef::text("status"))
                    .with_field(FieldDef::long_text("description"))
                    .with_field(FieldDef::image("image").required())
                    .with_field(FieldDef::document("brochure")),
            )
            .with(
                ResourceDef::new("hpr-project-gallery", "/hpr-projects/{parent}/gallery")
                    .with_description("Photo gallery of one project")
                    .with_item_label("photo")
                    .scoped_by_segment()
                    .with_envelope(Envelope::Data)
                    .with_field(FieldDef::text("caption"))
                    .with_field(FieldDef::image("image").required()),
            )
            .with(
                ResourceDef::new(
                    "hpr-project-floor-plans",
                    "/hpr-projects/{parent}/floor-plans",
                )
                .with_description("Floor plans of one project")
                .with_item_label("floor plan")
                .scoped_by_segment()
                .with_envelope(Envelope::Data)
                .with_field(FieldDef::text("title").required())
                .with_field(FieldDef::image("image").required()),
            )
            .with(
                ResourceDef::new("hpr-project-amenities", "/hpr-projects/amenities")
                    .with_description("Amenities of one project")
                    .with_item_label("amenity")
                    .scoped_by_query("projectId")
                    .with_field(FieldDef::text("name").required())
                    .with_field(FieldDef::image("icon")),
            )
            .with(
                ResourceDef::new("hpr-project-brochures", "/hpr-projects/brochures")
                    .with_description("Downloadable brochures of one project")
                    .with_item_label("brochure")
                    .scoped_by_query("projectId")
                    .with_field(FieldDef::text("title").required())
                    .with_field(FieldDef::document("file").required()),
            )
    }
}

impl Validatable for Catalog {
    fn validate(&self) -> AdminResult<()> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            resource.validate()?;
            if !seen.insert(resource.name.as_str()) {
                return Err(AdminError::validation(format!(
                    "Duplicate resource name '{}'",
                    resource.name
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FormMode};
    use crate::resource::ParentScope;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_site_catalog_is_valid() {
        let catalog = Catalog::site();
        assert!(catalog.validate().is_ok(), "{:?}", catalog.validation_errors());
        assert_eq!(catalog.len(), 14);
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::site();
        let partners = catalog.get("partners").unwrap();
        assert_eq!(partners.path, "/partners");
        assert_eq!(partners.envelope, Envelope::Bare);

        let values = catalog.get("company-values").unwrap();
        assert_eq!(values.envelope, Envelope::Data);

        let err = catalog.get("careers").unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource: careers");
    }

    #[test]
    fn test_hero_slide_schema() {
        let catalog = Catalog::site();
        let slides = catalog.get("hero-carousel").unwrap();
        let required: Vec<_> = slides
            .required_fields(FormMode::Create)
            .map(|f| (f.name.as_str(), f.kind))
            .collect();
        assert_eq!(
            required,
            vec![
                ("heading", FieldKind::Text),
                ("subheading", FieldKind::Text),
                ("image", FieldKind::Image),
            ]
        );
    }

    #[test]
    fn test_project_sub_resources_are_scoped() {
        let catalog = Catalog::site();
        for name in catalog.names() {
            if name.starts_with("hpr-project-") {
                assert!(catalog.get(name).unwrap().parent.is_some(), "{name}");
            }
        }
        assert_eq!(
            catalog.get("hpr-project-amenities").unwrap().parent,
            Some(ParentScope::Query {
                param: "projectId".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let catalog = Catalog::new()
            .with(ResourceDef::new("news", "/news"))
            .with(ResourceDef::new("news", "/press"));
        assert!(catalog.validate().is_err());
    }
}
