use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use portal_core::ServiceError;

use crate::api::AppState;
use crate::api::extract::request_host;
use crate::model::Identity;
use crate::service::catalog::CatalogView;

#[derive(Debug, Default, Deserialize)]
struct PortalQuery {
    #[serde(default)]
    q: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/portal", get(portal))
}

async fn portal(
    State(svc): State<AppState>,
    Query(query): Query<PortalQuery>,
    headers: HeaderMap,
    identity: Identity,
) -> Result<Json<CatalogView>, ServiceError> {
    let host = request_host(&headers);
    let view = svc
        .catalog(&identity, host.as_deref(), query.q.as_deref())
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(view))
}
