//! Portal module: a catalog of internal web applications filtered by the
//! caller's groups.
//!
//! # Resources
//!
//! - **Application**: a launchable tile with a target URL and allowed groups
//! - **Category**: a heading applications are filed under
//! - **Identity**: the caller, as forwarded by the authentication proxy
//!
//! Applications and categories live together in one JSON registry document
//! on disk. Older document shapes are read in the current shape and
//! rewritten once when the module starts.
//!
//! # Usage
//!
//! ```ignore
//! use portal::{PortalModule, service::PortalConfig};
//!
//! let module = PortalModule::new(kv, PortalConfig::default(), None)?;
//! let router = module.routes(); // Mount under /api
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use portal_core::{Module, ServiceError};
use portal_kv::KVStore;

use crate::service::idp::IdpClientRegistry;
use crate::service::{PortalConfig, PortalService};

/// Portal module implementing the Module trait.
pub struct PortalModule {
    service: Arc<PortalService>,
}

impl PortalModule {
    /// Create the module, seeding or migrating the registry on the way.
    pub fn new(
        kv: Arc<dyn KVStore>,
        config: PortalConfig,
        idp: Option<IdpClientRegistry>,
    ) -> Result<Self, ServiceError> {
        let service = PortalService::new(kv, config, idp).map_err(ServiceError::from)?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &Arc<PortalService> {
        &self.service
    }
}

impl Module for PortalModule {
    fn name(&self) -> &str {
        "portal"
    }

    fn prefix(&self) -> &str {
        "/api"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
