//! Headless admin editing session.
//!
//! Holds the authentication flag and a draft copy of the site content. Every
//! edit replaces the draft wholesale; nothing reaches the service until an
//! explicit save, which overwrites the whole remote document.

use std::sync::Arc;

use serde_json::Value;

use crate::models::{
    generate_id, Client, CyclingContent, IconKind, IconSource, IconTextItem, LoginResult,
    NavLink, Presentation, PresentationKind, Project, ProjectStatus, Service, SiteContent,
    SocialLink, StatItem, TabItem,
};
use crate::path::{self, FieldPath};
use crate::store::{ContentStore, ReloadRequired, StoreError};

const UNKNOWN_LOGIN_ERROR: &str = "An unknown error occurred.";
const UNREACHABLE_LOGIN_ERROR: &str = "Could not connect to the authentication server.";

const NEW_CLIENT_LOGO: &str = "https://res.cloudinary.com/dwwvh34yi/image/upload/v1753313010/client-logos/placeholder_white.svg";

const NEW_SERVICE_IMAGE: &str =
    "https://images.unsplash.com/photo-1521737604893-d14cc237f11d?q=80&w=800&auto=format&fit=crop";

/// A question the operator must answer before a destructive edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation<'a> {
    /// Delete the named service?
    DeleteService { title: &'a str },
    /// Delete it even though `count` projects will lose their category?
    OrphanProjects { title: &'a str, count: usize },
}

/// One operator's admin session.
pub struct AdminSession {
    store: Arc<ContentStore>,
    authenticated: bool,
    draft: Option<SiteContent>,
}

impl AdminSession {
    pub fn new(store: Arc<ContentStore>) -> Self {
        Self {
            store,
            authenticated: false,
            draft: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The document being edited; `None` while logged out.
    pub fn draft(&self) -> Option<&SiteContent> {
        self.draft.as_ref()
    }

    /// Check the password with the service and open a draft on success.
    pub async fn login(&mut self, password: &str) -> LoginResult {
        let result = match self.store.login(password).await {
            Ok(result) if result.success => LoginResult::ok(),
            Ok(result) => LoginResult::failed(
                result
                    .message
                    .unwrap_or_else(|| UNKNOWN_LOGIN_ERROR.to_string()),
            ),
            Err(e) => {
                tracing::error!("An error occurred during login: {}", e);
                LoginResult::failed(UNREACHABLE_LOGIN_ERROR)
            }
        };

        self.authenticated = result.success;
        self.draft = if result.success {
            Some((*self.store.get_or_default()).clone())
        } else {
            None
        };
        result
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
        self.draft = None;
    }

    /// Closing the panel also logs out.
    pub fn close(&mut self) {
        self.logout();
    }

    /// Replace the value at a dot-separated path in the draft.
    pub fn update_field(&mut self, path: &str, value: Value) -> Result<(), StoreError> {
        let path = FieldPath::parse(path)?;
        let draft = self.draft_ref()?;
        let updated = path::update(draft, &path, value)?;
        self.draft = Some(updated);
        Ok(())
    }

    /// Remove the entry with `id` from the id-bearing list at `list_path`.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_item(&mut self, list_path: &str, id: &str) -> Result<bool, StoreError> {
        let path = FieldPath::parse(list_path)?;
        let document = serde_json::to_value(self.draft_ref()?)
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let Some(Value::Array(items)) = path::get(&document, &path) else {
            return Err(path::PathError::InvalidPath {
                path: list_path.to_string(),
                reason: "not a list".to_string(),
            }
            .into());
        };

        let kept: Vec<Value> = items
            .iter()
            .filter(|item| item.get("id").and_then(Value::as_str) != Some(id))
            .cloned()
            .collect();
        if kept.len() == items.len() {
            return Ok(false);
        }

        self.update_field(list_path, Value::Array(kept))?;
        Ok(true)
    }

    /// Prepend a placeholder service and return its id.
    pub fn add_service(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let service = Service {
            id: id.clone(),
            title: "New Service".to_string(),
            description: "A brief description of the new service.".to_string(),
            long_description: "A more detailed description of what this service entails."
                .to_string(),
            image_url: NEW_SERVICE_IMAGE.to_string(),
        };
        self.edit(|draft| draft.services.insert(0, service))?;
        Ok(id)
    }

    /// Delete a service after confirmation.
    ///
    /// Projects filed under it keep their dangling `service_id`; the operator
    /// is asked a second time when any exist. Returns whether it was deleted.
    pub fn delete_service<F>(&mut self, id: &str, mut confirm: F) -> Result<bool, StoreError>
    where
        F: FnMut(&Confirmation<'_>) -> bool,
    {
        let draft = self.draft_ref()?;
        let Some(service) = draft.service_by_id(id) else {
            return Ok(false);
        };

        if !confirm(&Confirmation::DeleteService {
            title: &service.title,
        }) {
            return Ok(false);
        }

        let count = draft.projects_by_service_id(id).count();
        if count > 0
            && !confirm(&Confirmation::OrphanProjects {
                title: &service.title,
                count,
            })
        {
            return Ok(false);
        }

        self.edit(|draft| draft.services.retain(|s| s.id != id))?;
        Ok(true)
    }

    /// Prepend a placeholder project filed under the first service.
    pub fn add_project(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let draft = self.draft_ref()?;
        let project = Project {
            id: id.clone(),
            title: "New Project".to_string(),
            description: String::new(),
            service_id: draft
                .services
                .first()
                .map(|s| s.id.clone())
                .unwrap_or_default(),
            status: ProjectStatus::Live,
            image_url: None,
            demo_link: None,
            presentation: None,
        };
        self.edit(|draft| draft.projects.insert(0, project))?;
        Ok(id)
    }

    pub fn delete_project(&mut self, id: &str) -> Result<bool, StoreError> {
        self.remove_item("projects", id)
    }

    /// Switch a project's presentation kind, or remove it with `None`.
    ///
    /// URLs survive only when the kind is unchanged.
    pub fn set_project_presentation(
        &mut self,
        index: usize,
        kind: Option<PresentationKind>,
    ) -> Result<(), StoreError> {
        self.edit_project(index, |project| {
            project.presentation = kind.map(|kind| {
                let urls = match &project.presentation {
                    Some(existing) if existing.kind == kind => existing.urls.clone(),
                    _ => Vec::new(),
                };
                Presentation { kind, urls }
            });
        })
    }

    /// Replace the URLs of an existing presentation; no-op without one.
    pub fn set_presentation_urls(
        &mut self,
        index: usize,
        urls: Vec<String>,
    ) -> Result<(), StoreError> {
        self.edit_project(index, |project| {
            if let Some(presentation) = project.presentation.as_mut() {
                presentation.urls = urls;
            }
        })
    }

    /// Append a placeholder client to a marquee row, creating rows up to it.
    pub fn add_client(&mut self, row: usize) -> Result<String, StoreError> {
        let id = generate_id();
        let client = Client {
            id: id.clone(),
            name: "New Client".to_string(),
            logo_url: NEW_CLIENT_LOGO.to_string(),
        };
        self.edit(|draft| {
            let rows = &mut draft.homepage.client_marquee.clients;
            if rows.len() <= row {
                rows.resize_with(row + 1, Vec::new);
            }
            rows[row].push(client);
        })?;
        Ok(id)
    }

    /// Remove a client from a marquee row. Returns whether one was removed.
    pub fn remove_client(&mut self, row: usize, id: &str) -> Result<bool, StoreError> {
        self.remove_item(&format!("homepage.clientMarquee.clients.{}", row), id)
    }

    /// Append a placeholder item to a homepage tab.
    pub fn add_tab_item(&mut self, tab_index: usize) -> Result<String, StoreError> {
        let id = generate_id();
        let item = TabItem {
            id: id.clone(),
            icon: IconSource {
                kind: IconKind::Lucide,
                value: "HelpCircle".to_string(),
            },
            title: "New Item".to_string(),
            description: "A new description.".to_string(),
            icon_class_name: Some(String::new()),
        };

        let mut next = self.draft_ref()?.clone();
        let Some(tab) = next.homepage.tabs_section.tabs.get_mut(tab_index) else {
            return Err(path::PathError::InvalidPath {
                path: format!("homepage.tabsSection.tabs.{}", tab_index),
                reason: "no such tab".to_string(),
            }
            .into());
        };
        tab.items.push(item);
        self.draft = Some(next);
        Ok(id)
    }

    pub fn add_cycling_content(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let item = CyclingContent {
            id: id.clone(),
            icon: "Sparkles".to_string(),
            text: "New Item".to_string(),
        };
        self.edit(|draft| draft.header.cycling_content.push(item))?;
        Ok(id)
    }

    pub fn add_social_link(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let link = SocialLink {
            id: id.clone(),
            label: "New Link".to_string(),
            url: "#".to_string(),
            icon_url: String::new(),
        };
        self.edit(|draft| draft.footer.social_links.push(link))?;
        Ok(id)
    }

    pub fn add_nav_link(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let link = NavLink {
            id: id.clone(),
            label: "New Link".to_string(),
            url: "#".to_string(),
        };
        self.edit(|draft| draft.footer.nav_links.push(link))?;
        Ok(id)
    }

    pub fn add_stat_item(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let item = StatItem {
            id: id.clone(),
            icon: "HelpCircle".to_string(),
            value: "0".to_string(),
            label: "New Stat".to_string(),
        };
        self.edit(|draft| draft.homepage.stats.items.push(item))?;
        Ok(id)
    }

    pub fn add_mission_point(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let item = IconTextItem {
            id: id.clone(),
            icon: "Target".to_string(),
            title: "New Point".to_string(),
            text: "Description for the new point.".to_string(),
        };
        self.edit(|draft| draft.about.mission.points.push(item))?;
        Ok(id)
    }

    pub fn add_principle(&mut self) -> Result<String, StoreError> {
        let id = generate_id();
        let item = IconTextItem {
            id: id.clone(),
            icon: "Lightbulb".to_string(),
            title: "New Principle".to_string(),
            text: "Description for the new principle.".to_string(),
        };
        self.edit(|draft| draft.about.principles.items.push(item))?;
        Ok(id)
    }

    /// Publish the draft, overwriting the remote document.
    pub async fn save(&mut self) -> Result<ReloadRequired, StoreError> {
        let draft = self.draft_ref()?.clone();
        self.store.save(draft).await
    }

    /// Restore the default document remotely and reload the draft from it.
    pub async fn reset(&mut self) -> Result<ReloadRequired, StoreError> {
        self.draft_ref()?;
        let reload = self.store.reset().await?;
        self.draft = Some((*self.store.get_or_default()).clone());
        Ok(reload)
    }

    fn draft_ref(&self) -> Result<&SiteContent, StoreError> {
        match (&self.draft, self.authenticated) {
            (Some(draft), true) => Ok(draft),
            _ => Err(StoreError::Auth("Admin session is not authenticated".to_string())),
        }
    }

    /// Apply `change` to a copy of the draft and swap it in.
    fn edit(&mut self, change: impl FnOnce(&mut SiteContent)) -> Result<(), StoreError> {
        let mut next = self.draft_ref()?.clone();
        change(&mut next);
        self.draft = Some(next);
        Ok(())
    }

    fn edit_project(
        &mut self,
        index: usize,
        change: impl FnOnce(&mut Project),
    ) -> Result<(), StoreError> {
        let mut next = self.draft_ref()?.clone();
        let Some(project) = next.projects.get_mut(index) else {
            return Err(path::PathError::InvalidPath {
                path: format!("projects.{}", index),
                reason: "no such project".to_string(),
            }
            .into());
        };
        change(project);
        self.draft = Some(next);
        Ok(())
    }
}
