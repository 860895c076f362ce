//! The per-user portal page: what the caller can launch, grouped by category.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Application, Category, Identity, OTHER_CATEGORY_ID, UserInfo, default_categories};
use crate::service::access::{can_access, is_admin};
use crate::service::launch::{LaunchContext, launch_url};
use crate::service::{PortalError, PortalService};

/// Where an application entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    Directory,
    IdentityProvider,
}

/// One launchable tile.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub tags: Vec<String>,
    pub launch_url: String,
    pub federated: bool,
    pub origin: Origin,
}

/// A category heading with the tiles filed under it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySection {
    #[serde(flatten)]
    pub category: Category,
    pub applications: Vec<AppView>,
}

/// Body of `GET /api/portal`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub user: UserInfo,
    pub is_admin: bool,
    /// Applications known to the portal after merging.
    pub total: usize,
    /// Applications the caller may launch, before search filtering.
    pub accessible: usize,
    pub categories: Vec<CategorySection>,
}

/// Directory applications with identity-provider applications laid over
/// them. On an id collision the identity provider's record replaces the
/// directory's in place; new ids are appended.
pub fn merge_applications(
    directory: Vec<Application>,
    idp: Vec<Application>,
) -> Vec<(Application, Origin)> {
    let mut merged: Vec<(Application, Origin)> = directory
        .into_iter()
        .map(|app| (app, Origin::Directory))
        .collect();
    let mut positions: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, (app, _))| (app.id.clone(), i))
        .collect();
    for app in idp {
        match positions.get(&app.id) {
            Some(&pos) => merged[pos] = (app, Origin::IdentityProvider),
            None => {
                positions.insert(app.id.clone(), merged.len());
                merged.push((app, Origin::IdentityProvider));
            }
        }
    }
    merged
}

/// Case-insensitive match of `term` against name and description.
pub fn matches_search(app: &Application, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    format!("{} {}", app.name, app.description)
        .to_lowercase()
        .contains(&term)
}

/// Inputs for [`build_catalog`].
pub struct CatalogInput<'a> {
    pub categories: Vec<Category>,
    pub directory: Vec<Application>,
    pub idp: Vec<Application>,
    pub identity: &'a Identity,
    pub admin_group: Option<&'a str>,
    pub search: Option<&'a str>,
    pub launch: &'a LaunchContext,
}

/// Assemble the caller's portal page.
pub fn build_catalog(input: CatalogInput<'_>) -> CatalogView {
    let merged = merge_applications(input.directory, input.idp);
    let total = merged.len();

    let visible: Vec<(Application, Origin)> = merged
        .into_iter()
        .filter(|(app, _)| can_access(app, input.identity))
        .collect();
    let accessible = visible.len();

    let mut categories = input.categories;
    if !categories.iter().any(|c| c.id == OTHER_CATEGORY_ID) {
        categories.extend(
            default_categories()
                .into_iter()
                .filter(|c| c.id == OTHER_CATEGORY_ID),
        );
    }
    categories.sort_by_key(|c| c.order);

    let mut sections: Vec<CategorySection> = categories
        .into_iter()
        .map(|category| CategorySection {
            category,
            applications: Vec::new(),
        })
        .collect();
    let index: HashMap<String, usize> = sections
        .iter()
        .enumerate()
        .map(|(i, s)| (s.category.id.clone(), i))
        .collect();
    let other = index[OTHER_CATEGORY_ID];

    let term = input.search.unwrap_or_default();
    for (app, origin) in visible {
        if !matches_search(&app, term) {
            continue;
        }
        let slot = index.get(app.category_id()).copied().unwrap_or(other);
        let view = AppView {
            launch_url: launch_url(&app, input.launch),
            federated: app.active_oidc().is_some(),
            id: app.id,
            name: app.name,
            description: app.description,
            icon: app.icon,
            color: app.color,
            tags: app.tags,
            origin,
        };
        sections[slot].applications.push(view);
    }
    sections.retain(|s| !s.applications.is_empty());

    let is_admin = is_admin(input.identity, input.admin_group);
    CatalogView {
        user: UserInfo::new(input.identity, is_admin),
        is_admin,
        total,
        accessible,
        categories: sections,
    }
}

impl PortalService {
    /// Whether `identity` administers this portal.
    pub fn is_admin(&self, identity: &Identity) -> bool {
        is_admin(identity, self.config.admin_group.as_deref())
    }

    /// The `/api/user` body for `identity`.
    pub fn user_info(&self, identity: &Identity) -> UserInfo {
        UserInfo::new(identity, self.is_admin(identity))
    }

    /// Build the portal page for `identity` reaching us through `host`.
    pub async fn catalog(
        &self,
        identity: &Identity,
        host: Option<&str>,
        search: Option<&str>,
    ) -> Result<CatalogView, PortalError> {
        let doc = self.list()?;
        let idp = match &self.idp {
            Some(registry) => registry.applications().await,
            None => Vec::new(),
        };
        let launch = LaunchContext::for_request(&self.config, host);
        Ok(build_catalog(CatalogInput {
            categories: doc.categories,
            directory: doc.applications,
            idp,
            identity,
            admin_group: self.config.admin_group.as_deref(),
            search,
            launch: &launch,
        }))
    }
}
