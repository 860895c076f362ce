//! Launch URL resolution.
//!
//! Stored URLs are templates: `https://vault.${DOMAIN}`,
//! `${KEYCLOAK_HOST}/realms/${REALM}/account/`. Applications with federation
//! enabled are launched through the identity provider's authorization
//! endpoint instead, with an optional `kc_idp_hint` selecting the upstream
//! identity source.

use crate::model::Application;
use crate::service::PortalConfig;

const DOMAIN_TOKEN: &str = "${DOMAIN}";
const REALM_TOKEN: &str = "${REALM}";
const KEYCLOAK_HOST_TOKEN: &str = "${KEYCLOAK_HOST}";

/// Values substituted into URL templates for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchContext {
    pub domain: String,
    pub realm: Option<String>,
    pub keycloak_host: Option<String>,
}

impl LaunchContext {
    /// Context for a request to `host`; a configured domain takes precedence
    /// over the one derived from the host.
    pub fn for_request(config: &PortalConfig, host: Option<&str>) -> Self {
        let domain = config
            .domain
            .clone()
            .or_else(|| host.map(domain_from_host))
            .unwrap_or_default();
        Self {
            domain,
            realm: config.realm.clone(),
            keycloak_host: config.keycloak_host.clone(),
        }
    }
}

/// Registrable domain of a request host: its last two labels, port removed.
///
/// `portal.corp.example.com:8443` → `example.com`
pub fn domain_from_host(host: &str) -> String {
    let host = host.trim();
    let host = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    let start = labels.len().saturating_sub(2);
    labels[start..].join(".")
}

/// URL the portal should send the user to for `app`.
pub fn launch_url(app: &Application, ctx: &LaunchContext) -> String {
    if let (Some(oidc), Some(host)) = (app.active_oidc(), ctx.keycloak_host.as_deref()) {
        let redirect_uri = oidc.redirect_uri.replace(DOMAIN_TOKEN, &ctx.domain);
        let mut url = format!(
            "{}/realms/{}/protocol/openid-connect/auth?client_id={}&redirect_uri={}&response_type=code&scope=openid",
            host,
            oidc.realm,
            query_escape(&oidc.client_id),
            query_escape(&redirect_uri),
        );
        if let Some(hint) = oidc.idp_hint.as_deref().filter(|h| !h.is_empty()) {
            url.push_str("&kc_idp_hint=");
            url.push_str(&query_escape(hint));
        }
        return url;
    }

    let mut url = app.url.replace(DOMAIN_TOKEN, &ctx.domain);
    if let Some(host) = &ctx.keycloak_host {
        url = url.replace(KEYCLOAK_HOST_TOKEN, host);
    }
    if let Some(realm) = &ctx.realm {
        url = url.replace(REALM_TOKEN, realm);
    }
    url
}

/// Form-encode a query parameter value.
fn query_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
