use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use portal_core::ServiceError;

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/groups", get(list_groups))
}

async fn list_groups(State(svc): State<AppState>) -> Result<Json<Vec<String>>, ServiceError> {
    let groups = svc.list_groups().map_err(ServiceError::from)?;
    Ok(Json(groups))
}
