pub mod access;
pub mod catalog;
pub mod directory;
pub mod identity;
pub mod idp;
pub mod launch;
pub mod migration;
pub mod store;

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::info;

use portal_core::ServiceConfig;
use portal_kv::{KVError, KVStore};

use crate::service::idp::IdpClientRegistry;
use crate::service::store::RegistryStore;

/// Remediation shown to callers that reach the portal without identity
/// headers.
pub const UNAUTHENTICATED_HINT: &str =
    "Check that the reverse proxy forwards the X-Forwarded-Email / X-Forwarded-User \
     headers (or their X-Auth-Request-* equivalents) set by the authentication proxy";

/// Portal service error type.
#[derive(Debug, Error)]
pub enum PortalError {
    /// The registry could not be read, parsed or written.
    #[error("storage: {0}")]
    Storage(String),

    /// Malformed administrator input.
    #[error("validation: {0}")]
    Validation(String),

    /// No identity headers on the request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}

impl From<KVError> for PortalError {
    fn from(e: KVError) -> Self {
        PortalError::Storage(e.to_string())
    }
}

impl From<PortalError> for portal_core::ServiceError {
    fn from(e: PortalError) -> Self {
        match e {
            PortalError::Storage(m) => portal_core::ServiceError::Storage(m),
            PortalError::Validation(m) => portal_core::ServiceError::Validation(m),
            PortalError::Unauthenticated(m) => portal_core::ServiceError::Unauthenticated {
                message: m,
                hint: UNAUTHENTICATED_HINT.to_string(),
            },
        }
    }
}

/// Settings the portal needs at request time.
#[derive(Debug, Clone, Default)]
pub struct PortalConfig {
    /// Group granting administration; see [`access::is_admin`].
    pub admin_group: Option<String>,
    pub domain: Option<String>,
    pub realm: Option<String>,
    pub keycloak_host: Option<String>,
}

impl From<&ServiceConfig> for PortalConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            admin_group: config.admin_group.clone(),
            domain: config.domain.clone(),
            realm: config.realm.clone(),
            keycloak_host: config.keycloak_host.clone(),
        }
    }
}

/// The portal service. Owns the registry and every mutation of it.
pub struct PortalService {
    pub(crate) store: RegistryStore,
    pub(crate) config: PortalConfig,
    pub(crate) idp: Option<IdpClientRegistry>,
    /// Serializes read-merge-write cycles issued by this process.
    pub(crate) write_lock: Mutex<()>,
}

impl PortalService {
    /// Create the service and make sure a registry document exists.
    ///
    /// A missing document is seeded and a legacy one rewritten here, before
    /// the service is shared; request-time reads never write. A failure
    /// means the portal cannot serve and is returned to the caller.
    pub fn new(
        kv: Arc<dyn KVStore>,
        config: PortalConfig,
        idp: Option<IdpClientRegistry>,
    ) -> Result<Arc<Self>, PortalError> {
        let store = RegistryStore::new(kv);
        let doc = store.init()?;
        info!(
            "Registry ready at {} ({} categories, {} applications)",
            store.location(),
            doc.categories.len(),
            doc.applications.len()
        );
        Ok(Arc::new(Self {
            store,
            config,
            idp,
            write_lock: Mutex::new(()),
        }))
    }

    /// Where the registry document lives.
    pub fn data_location(&self) -> String {
        self.store.location()
    }
}


#[cfg(test)]
mod tests {
    use portal_core::ServiceError;
    use portal_kv::MemoryStore;

    use super::*;
    use crate::service::store::REGISTRY_KEY;

    #[test]
    fn test_new_seeds_registry() {
        let (svc, mem) = testing::memory_service(PortalConfig::default());
        assert!(mem.get(REGISTRY_KEY).unwrap().is_some());
        assert_eq!(svc.list().unwrap().applications.len(), 3);
    }

    #[test]
    fn test_new_migrates_legacy_registry() {
        let mem = Arc::new(MemoryStore::new());
        mem.set(REGISTRY_KEY, br#"{"applications":[{"id":"x","name":"X","url":"http://x"}]}"#)
            .unwrap();
        let kv: Arc<dyn KVStore> = mem.clone();
        PortalService::new(kv, PortalConfig::default(), None).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&mem.get(REGISTRY_KEY).unwrap().unwrap()).unwrap();
        assert!(raw["categories"].is_array());
        assert_eq!(raw["applications"][0]["category"], "other");
    }

    #[test]
    fn test_new_fails_when_seed_cannot_be_written() {
        let mem = Arc::new(MemoryStore::new());
        mem.set_fail_writes(true);
        let kv: Arc<dyn KVStore> = mem;
        let err = PortalService::new(kv, PortalConfig::default(), None)
            .err()
            .unwrap();
        assert!(matches!(err, PortalError::Storage(_)));
    }

    #[test]
    fn test_error_mapping() {
        let e: ServiceError = PortalError::Unauthenticated("no headers".into()).into();
        match e {
            ServiceError::Unauthenticated { message, hint } => {
                assert_eq!(message, "no headers");
                assert!(hint.contains("X-Forwarded-Email"));
            }
            other => panic!("unexpected {:?}", other),
        }
        let e: ServiceError = PortalError::Storage("disk".into()).into();
        assert_eq!(e.error_code(), "STORAGE_ERROR");
        let e: ServiceError = PortalError::Validation("bad".into()).into();
        assert_eq!(e.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_portal_config_from_service_config() {
        let sc = ServiceConfig {
            admin_group: Some("GG-POM-ADMINS".into()),
            realm: Some("corp".into()),
            ..Default::default()
        };
        let pc = PortalConfig::from(&sc);
        assert_eq!(pc.admin_group.as_deref(), Some("GG-POM-ADMINS"));
        assert_eq!(pc.realm.as_deref(), Some("corp"));
        assert_eq!(pc.domain, None);
    }
}
