use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use portal_core::ServiceError;

use crate::api::{AppState, json_body};
use crate::model::Category;
use crate::service::directory::parse_categories;

pub fn routes() -> Router<AppState> {
    Router::new().route("/categories", get(list_categories).post(replace_categories))
}

async fn list_categories(State(svc): State<AppState>) -> Json<Vec<Category>> {
    Json(svc.list_categories())
}

async fn replace_categories(
    State(svc): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let categories = parse_categories(json_body(&body)?).map_err(ServiceError::from)?;
    let count = svc.replace_categories(categories).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"success": true, "count": count})))
}
