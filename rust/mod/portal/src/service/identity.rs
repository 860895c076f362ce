//! Identity extraction from authentication-proxy headers.
//!
//! The upstream proxy (oauth2-proxy behind nginx) authenticates the user and
//! forwards the result as `X-Forwarded-*` headers, or `X-Auth-Request-*`
//! depending on its mode. The first alias present wins.

use std::borrow::Cow;

use axum::http::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::model::Identity;
use crate::service::PortalError;

const EMAIL_HEADERS: &[&str] = &["x-forwarded-email", "x-auth-request-email"];
const USER_HEADERS: &[&str] = &["x-forwarded-user", "x-auth-request-user"];
const GROUPS_HEADERS: &[&str] = &["x-forwarded-groups", "x-auth-request-groups"];
const PREFERRED_USERNAME_HEADERS: &[&str] = &[
    "x-forwarded-preferred-username",
    "x-auth-request-preferred-username",
];

/// Build the caller's identity from request headers.
///
/// Fails with `Unauthenticated` when neither an email nor a user header is
/// present.
pub fn parse_identity(headers: &HeaderMap) -> Result<Identity, PortalError> {
    let email = first_header(headers, EMAIL_HEADERS);
    let user = first_header(headers, USER_HEADERS);

    if email.is_none() && user.is_none() {
        return Err(PortalError::Unauthenticated(
            "no identity headers from the authentication proxy".into(),
        ));
    }

    let groups = first_header(headers, GROUPS_HEADERS)
        .map(|raw| parse_groups(&raw))
        .unwrap_or_default();

    Ok(Identity {
        email,
        user,
        preferred_username: first_header(headers, PREFERRED_USERNAME_HEADERS),
        groups,
    })
}

/// Decode a groups header value.
///
/// Values starting with `[` are tried as a JSON list of strings first; any
/// other value, or a list that fails to decode, is split on commas. Entries
/// are trimmed and blanks dropped.
pub fn parse_groups(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let groups = if raw.starts_with('[') {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => list,
            Err(e) => {
                debug!("groups header is not a JSON string list ({}), splitting on commas", e);
                split_groups(raw)
            }
        }
    } else {
        split_groups(raw)
    };

    groups
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect()
}

fn split_groups(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

/// Value of the first listed header that is present and non-blank.
pub(crate) fn first_header(headers: &HeaderMap, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        let value = header_text(headers.get(*name)?);
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Header bytes as text. Proxies forward names and groups as raw UTF-8,
/// which `HeaderValue::to_str` refuses; invalid sequences are replaced
/// rather than dropping the whole value.
fn header_text(value: &HeaderValue) -> Cow<'_, str> {
    String::from_utf8_lossy(value.as_bytes())
}
