//! Visibility and administration rules.
//!
//! Group names differ between the identity provider (`GG-POM-ADMINS`) and
//! what administrators type into the registry (`admin`), so matching is a
//! case-insensitive substring test in both directions. Group names are
//! administrator-controlled, never user-controlled.

use crate::model::{Application, Identity};

/// Substring marking an admin group when no admin group is configured.
pub const DEFAULT_ADMIN_MARKER: &str = "admin";

/// Whether `identity` may see `app`.
pub fn can_access(app: &Application, identity: &Identity) -> bool {
    if app.is_public() {
        return true;
    }
    app.groups.iter().any(|required| {
        identity
            .groups
            .iter()
            .any(|owned| groups_match(required, owned))
    })
}

/// Loose group comparison: either name contains the other, ignoring case.
/// Blank names never match.
pub fn groups_match(required: &str, owned: &str) -> bool {
    let required = required.trim().to_lowercase();
    let owned = owned.trim().to_lowercase();
    if required.is_empty() || owned.is_empty() {
        return false;
    }
    owned.contains(&required) || required.contains(&owned)
}

/// Whether `identity` may administer the portal.
///
/// With `admin_group` set, some owned group must equal or contain it
/// (ignoring case). Otherwise any group containing "admin" qualifies.
pub fn is_admin(identity: &Identity, admin_group: Option<&str>) -> bool {
    let needle = admin_group
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or(DEFAULT_ADMIN_MARKER)
        .to_lowercase();
    identity
        .groups
        .iter()
        .any(|g| g.to_lowercase().contains(&needle))
}
