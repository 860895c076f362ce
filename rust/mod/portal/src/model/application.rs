use serde::{Deserialize, Serialize};

use crate::model::OTHER_CATEGORY_ID;

/// Group tokens that make an application visible to everyone.
pub const SENTINEL_GROUPS: &[&str] = &["tous", "all"];

/// An application tile listed by the portal.
///
/// `id`, `name` and `url` are mandatory; the directory rejects writes where
/// any of them is empty. They deserialize to empty strings when missing so
/// that validation can name the offending field instead of failing decode.
///
/// Records are stored as submitted: optional fields left empty are not
/// written back, and fields the portal does not know about are kept in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Stable unique key.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Icon class or glyph shown on the tile.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,

    /// Target URL. May embed `${DOMAIN}`, `${REALM}` and `${KEYCLOAK_HOST}`.
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,

    /// Groups allowed to see the application. Empty, or containing a
    /// sentinel group, means everyone.
    #[serde(default)]
    pub groups: Vec<String>,

    /// Category id as stored; see [`Application::category_id`].
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Federated login redirect, when the application is reached through
    /// the identity provider rather than directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc: Option<OidcSettings>,

    /// Fields set by administrators that the portal does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Parameters for redirecting through the identity provider's authorization
/// endpoint with a hinted upstream identity source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub realm: String,

    #[serde(default)]
    pub client_id: String,

    /// Value for `kc_idp_hint`; omitted from the redirect when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp_hint: Option<String>,

    /// May embed `${DOMAIN}`.
    #[serde(default)]
    pub redirect_uri: String,
}

impl Application {
    /// First mandatory field that is empty, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.id.trim().is_empty() {
            Some("id")
        } else if self.name.trim().is_empty() {
            Some("name")
        } else if self.url.trim().is_empty() {
            Some("url")
        } else {
            None
        }
    }

    /// Category the application is filed under, `other` when unset.
    pub fn category_id(&self) -> &str {
        match self.category.trim() {
            "" => OTHER_CATEGORY_ID,
            id => id,
        }
    }

    /// Whether the group list grants access to everyone: no groups at all,
    /// or a sentinel group among them. Blank entries grant nothing.
    pub fn is_public(&self) -> bool {
        self.groups.is_empty() || self.groups.iter().any(|g| is_sentinel_group(g))
    }

    /// Federation settings when enabled.
    pub fn active_oidc(&self) -> Option<&OidcSettings> {
        self.oidc.as_ref().filter(|o| o.enabled)
    }
}

/// Whether `group` is one of the "visible to everyone" tokens.
pub fn is_sentinel_group(group: &str) -> bool {
    let group = group.trim();
    SENTINEL_GROUPS.iter().any(|s| s.eq_ignore_ascii_case(group))
}
