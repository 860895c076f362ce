//! Startup: open the data directory and bring the portal module up.
//!
//! Any failure here is fatal; the portal refuses to serve without a
//! readable registry document.

use std::sync::Arc;

use tracing::{info, warn};

use portal::PortalModule;
use portal::service::PortalConfig;
use portal::service::idp::IdpClientRegistry;
use portal_core::ServiceConfig;

/// Open storage and create the portal module described by `config`.
pub fn init_module(config: &ServiceConfig) -> anyhow::Result<PortalModule> {
    let kv: Arc<dyn portal_kv::KVStore> = Arc::new(
        portal_kv::FileStore::open(&config.data_dir)
            .map_err(|e| anyhow::anyhow!("failed to open data directory: {}", e))?,
    );

    let idp = match &config.idp_clients_url {
        Some(url) => {
            let registry = IdpClientRegistry::new(url.clone())
                .map_err(|e| anyhow::anyhow!("failed to build identity provider client: {}", e))?;
            info!("Identity provider clients from {}", url);
            Some(registry)
        }
        None => None,
    };

    let portal_config = PortalConfig::from(config);
    if portal_config.admin_group.is_none() {
        warn!("No admin group configured; any group containing \"admin\" grants administration");
    }

    let module = PortalModule::new(kv, portal_config, idp)
        .map_err(|e| anyhow::anyhow!("failed to initialize registry: {}", e))?;
    info!("Portal module initialized");
    Ok(module)
}
