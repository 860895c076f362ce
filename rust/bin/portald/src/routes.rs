//! Route registration: module routes plus system endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use portal_core::{Module, ServiceError};

use crate::middleware;

/// State for the system endpoints.
struct SystemState {
    data_file: String,
}

/// Build the complete router: every module nested under its prefix, the
/// system endpoints, and the CORS and logging layers around all of it.
pub fn build_router(modules: &[&dyn Module], data_file: String) -> Router {
    let mut app: Router = Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .with_state(Arc::new(SystemState { data_file }));

    for module in modules {
        info!("Mounting {} module at {}", module.name(), module.prefix());
        app = app.nest(module.prefix(), module.routes());
    }

    app.fallback(not_found)
        .layer(axum::middleware::from_fn(middleware::cors))
        .layer(axum::middleware::from_fn(middleware::log_requests))
}

async fn health(State(state): State<Arc<SystemState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "dataFile": state.data_file,
    }))
}

async fn version() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "portald",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found() -> ServiceError {
    ServiceError::NotFound("no such endpoint".into())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use portal::PortalModule;
    use portal::service::PortalConfig;
    use portal_kv::{KVStore, MemoryStore};

    use super::*;

    fn app() -> Router {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryStore::new());
        let module = PortalModule::new(kv, PortalConfig::default(), None).unwrap();
        let data_file = module.service().data_location();
        build_router(&[&module], data_file)
    }

    async fn json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_data_file() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        let body = json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["dataFile"], "memory:applications.json");
    }

    #[tokio::test]
    async fn test_version() {
        let req = Request::builder().uri("/version").body(Body::empty()).unwrap();
        let body = json(app().oneshot(req).await.unwrap()).await;
        assert_eq!(body["name"], "portald");
    }

    #[tokio::test]
    async fn test_module_nested_under_api() {
        let req = Request::builder().uri("/api/applications").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json(resp).await.as_array().unwrap().len(), 3);

        let req = Request::builder().uri("/applications").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preflight_answered() {
        for uri in ["/api/applications", "/api/anything"] {
            let req = Request::builder()
                .method("OPTIONS")
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let resp = app().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
            assert_eq!(resp.headers()["access-control-allow-methods"], "GET, POST, OPTIONS");
            assert_eq!(resp.headers()["access-control-allow-headers"], "Content-Type");
        }
    }

    #[tokio::test]
    async fn test_error_responses_carry_cors_headers() {
        let req = Request::builder().uri("/api/user").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}
