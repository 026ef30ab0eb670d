//! Site content model matching the frontend `SiteContent` interface.
//!
//! Older stored documents may lack substructures introduced later
//! (`branding.splashScreen`, `popup`, `popup.type`, `popup.imageUrl`).
//! Those fields carry serde defaults so they are patched in on load, whether
//! the key is absent or stored as `null`.

use serde::{Deserialize, Deserializer, Serialize};

/// The root document holding all editable site content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub branding: Branding,
    pub header: HeaderContent,
    pub footer: FooterContent,
    pub homepage: HomepageContent,
    pub about: AboutPageContent,
    pub contact: ContactPageContent,
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
    #[serde(
        default = "PopupSettings::legacy_default",
        deserialize_with = "popup_or_legacy"
    )]
    pub popup: PopupSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub logo_url: String,
    #[serde(default, deserialize_with = "splash_or_default")]
    pub splash_screen: SplashScreen,
    pub colors: BrandColors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplashScreen {
    pub brand_name: String,
    pub description: String,
}

fn popup_or_legacy<'de, D>(deserializer: D) -> Result<PopupSettings, D::Error>
where
    D: Deserializer<'de>,
{
    let popup = Option::<PopupSettings>::deserialize(deserializer)?;
    Ok(popup.unwrap_or_else(PopupSettings::legacy_default))
}

fn splash_or_default<'de, D>(deserializer: D) -> Result<SplashScreen, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SplashScreen>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for SplashScreen {
    fn default() -> Self {
        Self {
            brand_name: "Kaste Brands & Designs".to_string(),
            description: "Building Bold Brands & Smart Solutions".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub surface: String,
    pub light_text: String,
    pub gray_text: String,
    pub dark_text: String,
}

/// A rotating headline entry in the site header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclingContent {
    pub id: String,
    /// Icon name from the icon library.
    pub icon: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderContent {
    pub cycling_content: Vec<CyclingContent>,
    pub contact: HeaderContact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderContact {
    pub phone: String,
    pub whatsapp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: String,
    pub label: String,
    pub url: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub id: String,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    pub tagline: String,
    pub contact: FooterContact,
    pub social_links: Vec<SocialLink>,
    pub nav_links: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterContact {
    pub email: String,
    pub location: String,
}

/// Where an icon is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Custom,
    Lucide,
    Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSource {
    #[serde(rename = "type")]
    pub kind: IconKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageContent {
    pub hero: HomepageHero,
    pub featured_services: FeaturedServices,
    pub client_marquee: ClientMarquee,
    pub tabs_section: TabsSection,
    pub stats: StatsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageHero {
    pub title: String,
    pub subtitle: String,
    pub background_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedServices {
    pub title: String,
    pub subtitle: String,
    pub service_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientMarquee {
    pub title: String,
    /// Client logos grouped into marquee rows.
    pub clients: Vec<Vec<Client>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabsSection {
    pub title: String,
    pub subtitle: String,
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub items: Vec<TabItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    pub id: String,
    pub icon: IconSource,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSection {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<StatItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatItem {
    pub id: String,
    pub icon: String,
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutPageContent {
    pub hero: AboutHero,
    pub mission: Mission,
    pub principles: Principles,
    pub cta: CallToAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutHero {
    pub title: String,
    pub subtitle: String,
    pub highlighted_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mission {
    pub title: String,
    pub body: String,
    pub image_url: String,
    pub points: Vec<IconTextItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principles {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<IconTextItem>,
}

/// Shared shape of mission points and principles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconTextItem {
    pub id: String,
    pub icon: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPageContent {
    pub hero: ContactHero,
    pub details: ContactDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactHero {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub location: String,
}

/// A service offered by the agency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub image_url: String,
}

/// Publication state of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Live,
    ComingSoon,
}

/// A portfolio project, filed under a service by `service_id`.
///
/// The reference is advisory: deleting the service leaves it dangling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub service_id: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Presentation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationKind {
    Gallery,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(rename = "type")]
    pub kind: PresentationKind,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupKind {
    #[default]
    Announcement,
    Special,
}

/// Settings for the site-wide announcement popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupSettings {
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub kind: PopupKind,
    pub icon: String,
    pub title: String,
    pub message: String,
    pub cta_text: String,
    pub cta_link: String,
    #[serde(default)]
    pub image_url: String,
}

impl PopupSettings {
    /// Popup synthesized for documents stored before popups existed.
    pub fn legacy_default() -> Self {
        Self {
            enabled: false,
            kind: PopupKind::Announcement,
            icon: "Megaphone".to_string(),
            title: "New Announcement!".to_string(),
            message: "Check out our latest news or special offers.".to_string(),
            cta_text: "Learn More".to_string(),
            cta_link: "/about".to_string(),
            image_url: String::new(),
        }
    }
}

impl SiteContent {
    /// Parse a stored document, patching in defaults for missing legacy fields.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn service_by_id(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn projects_by_service_id<'a>(
        &'a self,
        service_id: &'a str,
    ) -> impl Iterator<Item = &'a Project> + 'a {
        self.projects.iter().filter(move |p| p.service_id == service_id)
    }

    /// Projects whose `service_id` names no existing service.
    pub fn orphaned_projects(&self) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| self.service_by_id(&p.service_id).is_none())
            .collect()
    }
}

/// Generate a fresh list-item identifier: `id_<unix-millis>_<9 alphanumerics>`.
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("id_{}_{}", millis, &random[..9])
}
