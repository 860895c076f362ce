use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::AppState;
use crate::model::{Identity, UserInfo};

pub fn routes() -> Router<AppState> {
    Router::new().route("/user", get(current_user))
}

/// Who the authentication proxy says is calling.
async fn current_user(State(svc): State<AppState>, identity: Identity) -> Json<UserInfo> {
    Json(svc.user_info(&identity))
}
