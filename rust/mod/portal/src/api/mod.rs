mod applications;
mod categories;
mod extract;
mod groups;
mod portal;
mod user;

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;

use portal_core::ServiceError;

use crate::service::PortalService;

/// Shared application state.
pub type AppState = Arc<PortalService>;

/// Build the portal API router.
///
/// Routes are relative; the caller nests them under `/api`.
pub fn build_router(svc: Arc<PortalService>) -> Router {
    Router::new()
        .merge(applications::routes())
        .merge(categories::routes())
        .merge(groups::routes())
        .merge(user::routes())
        .merge(portal::routes())
        .with_state(svc)
}

/// Decode a request body as JSON, reporting syntax errors as validation
/// failures.
fn json_body(body: &Bytes) -> Result<serde_json::Value, ServiceError> {
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::Validation(format!("request body is not valid JSON: {}", e)))
}
