use std::path::PathBuf;

/// Default data directory when none is configured.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Name of the registry document inside the data directory.
pub const REGISTRY_FILE: &str = "applications.json";

/// Runtime configuration of the portal service.
///
/// The binary fills this from command-line flags and environment variables,
/// then hands it to storage initialization and the portal module.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the registry document.
    pub data_dir: PathBuf,

    /// Listen address for the HTTP server.
    pub listen: String,

    /// Group that grants portal administration. When unset, any group whose
    /// name contains "admin" does.
    pub admin_group: Option<String>,

    /// Domain substituted for `${DOMAIN}` in application URLs.
    /// Derived from the request host when unset.
    pub domain: Option<String>,

    /// Realm substituted for `${REALM}` in application URLs.
    pub realm: Option<String>,

    /// Identity provider origin (e.g. `https://keycloak.example.com`), used for
    /// `${KEYCLOAK_HOST}` and federated launch URLs.
    pub keycloak_host: Option<String>,

    /// Endpoint returning `{"applications": [...]}` registered at the
    /// identity provider.
    pub idp_clients_url: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            listen: "0.0.0.0:3000".to_string(),
            admin_group: None,
            domain: None,
            realm: None,
            keycloak_host: None,
            idp_clients_url: None,
        }
    }
}

impl ServiceConfig {
    /// Path of the persisted registry document: `{data_dir}/applications.json`.
    pub fn resolve_data_file(&self) -> PathBuf {
        self.data_dir.join(REGISTRY_FILE)
    }

    /// Drop optional settings that were given as empty strings.
    ///
    /// Environment variables are often present but blank in container
    /// manifests; blank means unset.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.admin_group,
            &mut self.domain,
            &mut self.realm,
            &mut self.keycloak_host,
            &mut self.idp_clients_url,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        if let Some(host) = self.keycloak_host.as_mut() {
            while host.ends_with('/') {
                host.pop();
            }
        }
        self
    }
}
