//! Normalization of stored registry documents.
//!
//! Two legacy layouts are still found on disk:
//!
//! ```text
//! [ {app}, {app}, ... ]                      bare application list
//! { "applications": [ {app}, ... ] }        object without categories
//! ```
//!
//! Both become `{"categories": DEFAULT, "applications": [...]}` with each
//! application's `category` defaulted to `other` and `tags` to `[]`.
//! Documents already in the current layout pass through untouched.

use serde_json::{Map, Value};

use crate::model::{OTHER_CATEGORY_ID, RegistryDocument, default_categories};
use crate::service::PortalError;

/// Which legacy layout a document was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyShape {
    BareList,
    MissingCategories,
}

/// Result of [`migrate`].
#[derive(Debug, Clone)]
pub struct Migrated {
    pub document: RegistryDocument,
    /// Set when the input was in a legacy layout and must be written back.
    pub legacy_shape: Option<LegacyShape>,
}

/// Bring a raw stored document into the current layout.
pub fn migrate(raw: Value) -> Result<Migrated, PortalError> {
    let (mut root, legacy_shape) = match raw {
        Value::Array(applications) => {
            let mut root = Map::new();
            root.insert("applications".into(), Value::Array(applications));
            (root, Some(LegacyShape::BareList))
        }
        Value::Object(root) => {
            let has_categories = root.get("categories").is_some_and(|c| !c.is_null());
            let shape = (!has_categories).then_some(LegacyShape::MissingCategories);
            (root, shape)
        }
        other => {
            return Err(PortalError::Storage(format!(
                "registry document has unexpected type: {}",
                json_type(&other)
            )));
        }
    };

    if legacy_shape.is_some() {
        let categories = serde_json::to_value(default_categories())
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        root.insert("categories".into(), categories);
        if let Some(Value::Array(apps)) = root.get_mut("applications") {
            apps.iter_mut().for_each(default_application_fields);
        }
    }

    if root.get("applications").is_none_or(Value::is_null) {
        root.insert("applications".into(), Value::Array(Vec::new()));
    }

    let document: RegistryDocument = serde_json::from_value(Value::Object(root))
        .map_err(|e| PortalError::Storage(format!("registry document is malformed: {}", e)))?;

    Ok(Migrated {
        document,
        legacy_shape,
    })
}

/// Fill `category` and `tags` on a legacy application record.
fn default_application_fields(app: &mut Value) {
    let Some(obj) = app.as_object_mut() else {
        return;
    };
    let category_missing = match obj.get("category") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if category_missing {
        obj.insert("category".into(), Value::String(OTHER_CATEGORY_ID.into()));
    }
    if obj.get("tags").is_none_or(Value::is_null) {
        obj.insert("tags".into(), Value::Array(Vec::new()));
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
