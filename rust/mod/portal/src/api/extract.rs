use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use portal_core::ServiceError;

use crate::model::Identity;
use crate::service::identity::{first_header, parse_identity};

/// Handlers that take an `Identity` answer 401 when the authentication
/// proxy did not forward one.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_identity(&parts.headers).map_err(|e| {
            warn!("{} {}: {}", parts.method, parts.uri.path(), e);
            ServiceError::from(e)
        })
    }
}

const HOST_HEADERS: &[&str] = &["x-forwarded-host", "host"];

/// Host the client used to reach us, preferring the proxy's view.
pub(crate) fn request_host(headers: &axum::http::HeaderMap) -> Option<String> {
    first_header(headers, HOST_HEADERS)
}
