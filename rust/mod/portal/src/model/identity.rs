use serde::Serialize;

/// The caller as described by the upstream authentication proxy.
///
/// Derived per request from trusted headers; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub email: Option<String>,
    pub user: Option<String>,
    pub preferred_username: Option<String>,
    /// Trimmed, non-empty, original case.
    pub groups: Vec<String>,
}

impl Identity {
    /// Display name: preferred username, else the local part of the email.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.preferred_username {
            return Some(name.clone());
        }
        self.email
            .as_deref()
            .map(|email| email.split('@').next().unwrap_or(email).to_string())
    }

    /// Login name, falling back to the preferred username.
    pub fn login(&self) -> Option<String> {
        self.user.clone().or_else(|| self.preferred_username.clone())
    }
}

/// Body of `GET /api/user`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub authenticated: bool,
    pub email: Option<String>,
    pub user: Option<String>,
    pub name: Option<String>,
    pub groups: Vec<String>,
    pub is_admin: bool,
}

impl UserInfo {
    pub fn new(identity: &Identity, is_admin: bool) -> Self {
        Self {
            authenticated: true,
            email: identity.email.clone(),
            user: identity.login(),
            name: identity.display_name(),
            groups: identity.groups.clone(),
            is_admin,
        }
    }
}
