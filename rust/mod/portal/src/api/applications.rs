use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use portal_core::ServiceError;

use crate::api::{AppState, json_body};
use crate::model::Application;
use crate::service::directory::parse_applications;

pub fn routes() -> Router<AppState> {
    Router::new().route("/applications", get(list_applications).post(replace_applications))
}

async fn list_applications(
    State(svc): State<AppState>,
) -> Result<Json<Vec<Application>>, ServiceError> {
    let apps = svc.list_applications().map_err(ServiceError::from)?;
    Ok(Json(apps))
}

async fn replace_applications(
    State(svc): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let apps = parse_applications(json_body(&body)?).map_err(ServiceError::from)?;
    let count = svc.replace_applications(apps).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"success": true, "count": count})))
}
