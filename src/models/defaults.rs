//! The hardcoded default site content.
//!
//! Seeded into an empty backend, restored by a reset, and used as the
//! last-resort fallback when the content service is unreachable.

use std::sync::OnceLock;

use super::SiteContent;

/// Bundled default document in its wire format.
pub const DEFAULT_CONTENT_JSON: &str = include_str!("default_content.json");

static DEFAULT_CONTENT: OnceLock<SiteContent> = OnceLock::new();

impl Default for SiteContent {
    /// Returns a fresh deep copy of the default document.
    fn default() -> Self {
        DEFAULT_CONTENT
            .get_or_init(|| {
                serde_json::from_str(DEFAULT_CONTENT_JSON)
                    .expect("bundled default_content.json must match the SiteContent schema")
            })
            .clone()
    }
}

/// The default document as an untyped JSON value, as stored by backends.
pub fn default_content_value() -> serde_json::Value {
    // Round-trip through the typed model so the stored shape matches what
    // clients serialize on save.
    serde_json::to_value(SiteContent::default()).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PopupKind;

    #[test]
    fn test_default_content_parses() {
        let content = SiteContent::default();
        assert_eq!(content.services.len(), 10);
        assert!(content.projects.is_empty());
        assert_eq!(content.services[0].id, "web-designs");
        assert_eq!(content.footer.nav_links.len(), 4);
        assert_eq!(content.homepage.stats.items.len(), 4);
        assert!(!content.popup.enabled);
        assert_eq!(content.popup.kind, PopupKind::Announcement);
    }

    #[test]
    fn test_default_is_a_fresh_copy() {
        let mut first = SiteContent::default();
        first.services.clear();
        first.branding.logo_url = "changed".to_string();

        let second = SiteContent::default();
        assert_eq!(second.services.len(), 10);
        assert_ne!(second.branding.logo_url, "changed");
    }

    #[test]
    fn test_default_value_matches_typed_default() {
        let value = default_content_value();
        assert_eq!(value["services"].as_array().unwrap().len(), 10);
        let parsed: SiteContent = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, SiteContent::default());
    }

    #[test]
    fn test_featured_services_reference_existing_services() {
        let content = SiteContent::default();
        for id in &content.homepage.featured_services.service_ids {
            assert!(content.service_by_id(id).is_some(), "missing {}", id);
        }
    }
}
