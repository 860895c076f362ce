use std::collections::{BTreeSet, HashMap};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::model::{Application, Category, RegistryDocument, default_categories};
use crate::service::{PortalError, PortalService};

/// Groups always offered to administrators, whether or not an application
/// references them yet.
pub const BASELINE_GROUPS: &[&str] = &["GG-POM-USERS", "GG-POM-ADMINS"];

impl PortalService {
    /// The whole registry, migrated if needed.
    pub fn list(&self) -> Result<RegistryDocument, PortalError> {
        self.store.load()
    }

    /// All stored applications.
    pub fn list_applications(&self) -> Result<Vec<Application>, PortalError> {
        Ok(self.list()?.applications)
    }

    /// Stored categories. Never fails: any read error yields the defaults.
    pub fn list_categories(&self) -> Vec<Category> {
        match self.list() {
            Ok(doc) => doc.categories,
            Err(e) => {
                warn!("Falling back to default categories: {}", e);
                default_categories()
            }
        }
    }

    /// Sorted, de-duplicated groups referenced by applications, plus the
    /// baseline groups.
    pub fn list_groups(&self) -> Result<Vec<String>, PortalError> {
        let doc = self.list()?;
        let mut groups: BTreeSet<String> = BASELINE_GROUPS.iter().map(|g| g.to_string()).collect();
        for app in &doc.applications {
            groups.extend(
                app.groups
                    .iter()
                    .map(|g| g.trim())
                    .filter(|g| !g.is_empty())
                    .map(str::to_string),
            );
        }
        Ok(groups.into_iter().collect())
    }

    /// Replace every application, keeping categories as stored.
    ///
    /// All records are validated before anything is written. Records sharing
    /// an id collapse into one: the last one wins, at the first one's
    /// position. Returns the number of applications stored.
    pub fn replace_applications(&self, applications: Vec<Application>) -> Result<usize, PortalError> {
        for (index, app) in applications.iter().enumerate() {
            if let Some(field) = app.missing_field() {
                return Err(PortalError::Validation(format!(
                    "application #{} ({:?}) is missing required field '{}'; every application needs id, name and url",
                    index, app.id, field
                )));
            }
        }
        let applications = dedup_by_id(applications);

        let _guard = self.write_lock.lock().unwrap();
        let mut doc = self.store.load()?;
        doc.applications = applications;
        self.store.save(&doc)?;

        info!("Applications saved: {} entries", doc.applications.len());
        Ok(doc.applications.len())
    }

    /// Replace every category, keeping applications as stored.
    pub fn replace_categories(&self, categories: Vec<Category>) -> Result<usize, PortalError> {
        let _guard = self.write_lock.lock().unwrap();
        let mut doc = self.store.load()?;
        doc.categories = categories;
        self.store.save(&doc)?;

        info!("Categories saved: {} entries", doc.categories.len());
        Ok(doc.categories.len())
    }
}

/// Decode an administrator-supplied application list.
pub fn parse_applications(body: serde_json::Value) -> Result<Vec<Application>, PortalError> {
    parse_list(body, "applications")
}

/// Decode an administrator-supplied category list.
pub fn parse_categories(body: serde_json::Value) -> Result<Vec<Category>, PortalError> {
    parse_list(body, "categories")
}

fn parse_list<T: DeserializeOwned>(body: serde_json::Value, what: &str) -> Result<Vec<T>, PortalError> {
    let serde_json::Value::Array(items) = body else {
        return Err(PortalError::Validation(format!(
            "request body must be a JSON array of {}",
            what
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|e| PortalError::Validation(format!("{} #{}: {}", what, index, e)))
        })
        .collect()
}

fn dedup_by_id(applications: Vec<Application>) -> Vec<Application> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Application> = Vec::with_capacity(applications.len());
    for app in applications {
        match positions.get(&app.id) {
            Some(&pos) => out[pos] = app,
            None => {
                positions.insert(app.id.clone(), out.len());
                out.push(app);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use portal_kv::KVStore;

    use super::*;
    use crate::service::PortalConfig;
    use crate::service::store::REGISTRY_KEY;
    use crate::service::testing::memory_service;

    fn app(id: &str, name: &str) -> Application {
        serde_json::from_value(json!({"id": id, "name": name, "url": format!("https://{}", id)}))
            .unwrap()
    }

    #[test]
    fn test_replace_then_list_roundtrip() {
        let (svc, _) = memory_service(PortalConfig::default());
        let before = svc.list().unwrap();

        let mut vpn = app("vpn", "VPN");
        vpn.groups = vec!["admin-infra".into()];
        vpn.tags = vec!["wireguard".into()];
        let list = vec![app("wiki", "Wiki"), vpn];

        assert_eq!(svc.replace_applications(list.clone()).unwrap(), 2);
        let after = svc.list().unwrap();
        assert_eq!(after.applications, list);
        assert_eq!(after.categories, before.categories);
    }

    #[test]
    fn test_validation_rejects_without_writing() {
        let (svc, mem) = memory_service(PortalConfig::default());
        let before = mem.get(REGISTRY_KEY).unwrap();

        let bad: Application =
            serde_json::from_value(json!({"id": "", "name": "X", "url": "http://x"})).unwrap();
        let err = svc.replace_applications(vec![bad]).unwrap_err();
        match err {
            PortalError::Validation(msg) => assert!(msg.contains("'id'"), "{}", msg),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(mem.get(REGISTRY_KEY).unwrap(), before);
        assert_eq!(svc.list().unwrap(), crate::model::RegistryDocument::seed());
    }

    #[test]
    fn test_validation_names_first_invalid_record() {
        let (svc, _) = memory_service(PortalConfig::default());
        let no_url: Application =
            serde_json::from_value(json!({"id": "b", "name": "B"})).unwrap();
        let no_name: Application =
            serde_json::from_value(json!({"id": "c", "url": "http://c"})).unwrap();
        let err = svc
            .replace_applications(vec![app("a", "A"), no_url, no_name])
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("#1"), "{}", msg);
        assert!(msg.contains("'url'"), "{}", msg);
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let (svc, _) = memory_service(PortalConfig::default());
        let count = svc
            .replace_applications(vec![app("a", "First"), app("b", "B"), app("a", "Second")])
            .unwrap();
        assert_eq!(count, 2);
        let apps = svc.list_applications().unwrap();
        assert_eq!(apps[0].id, "a");
        assert_eq!(apps[0].name, "Second");
        assert_eq!(apps[1].id, "b");
    }

    #[test]
    fn test_replace_categories_keeps_applications() {
        let (svc, _) = memory_service(PortalConfig::default());
        let apps_before = svc.list_applications().unwrap();
        let cats = parse_categories(json!([{"id": "ops", "name": "Ops", "order": 1}])).unwrap();
        assert_eq!(svc.replace_categories(cats).unwrap(), 1);
        assert_eq!(svc.list_categories()[0].id, "ops");
        assert_eq!(svc.list_applications().unwrap(), apps_before);
    }

    #[test]
    fn test_categories_fall_back_to_defaults() {
        let (svc, mem) = memory_service(PortalConfig::default());
        svc.replace_categories(vec![]).unwrap();
        assert!(svc.list_categories().is_empty());

        mem.set(REGISTRY_KEY, b"garbage").unwrap();
        assert_eq!(svc.list_categories(), default_categories());
        assert!(matches!(svc.list_applications(), Err(PortalError::Storage(_))));
    }

    #[test]
    fn test_reads_never_write_back() {
        let (svc, mem) = memory_service(PortalConfig::default());
        let legacy = br#"[{"id":"old","name":"Old","url":"http://old"}]"#;
        mem.set(REGISTRY_KEY, legacy).unwrap();
        mem.set_fail_writes(true);

        assert_eq!(svc.list_applications().unwrap()[0].category_id(), "other");
        assert_eq!(svc.list_categories(), default_categories());
        assert!(svc.list_groups().is_ok());
        assert_eq!(mem.get(REGISTRY_KEY).unwrap().unwrap(), legacy.to_vec());

        // The next write persists the migrated shape under the write lock.
        mem.set_fail_writes(false);
        svc.replace_categories(default_categories()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&mem.get(REGISTRY_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw["applications"][0]["id"], "old");
    }

    #[test]
    fn test_storage_failure_on_save() {
        let (svc, mem) = memory_service(PortalConfig::default());
        mem.set_fail_writes(true);
        let err = svc.replace_applications(vec![app("a", "A")]).unwrap_err();
        assert!(matches!(err, PortalError::Storage(_)));
        let err = svc.replace_categories(vec![]).unwrap_err();
        assert!(matches!(err, PortalError::Storage(_)));
    }

    #[test]
    fn test_list_groups() {
        let (svc, _) = memory_service(PortalConfig::default());
        let mut a = app("a", "A");
        a.groups = vec!["zeta".into(), " admin-infra ".into(), "".into()];
        let mut b = app("b", "B");
        b.groups = vec!["GG-POM-USERS".into(), "zeta".into()];
        svc.replace_applications(vec![a, b]).unwrap();

        assert_eq!(
            svc.list_groups().unwrap(),
            vec!["GG-POM-ADMINS", "GG-POM-USERS", "admin-infra", "zeta"]
        );
    }

    #[test]
    fn test_parse_list_rejects_non_arrays() {
        assert!(matches!(
            parse_applications(json!({"id": "a"})),
            Err(PortalError::Validation(_))
        ));
        assert!(matches!(parse_categories(json!("x")), Err(PortalError::Validation(_))));
        assert!(matches!(
            parse_categories(json!([{"name": "no id"}])),
            Err(PortalError::Validation(_))
        ));
        assert_eq!(parse_applications(json!([])).unwrap(), vec![]);
    }

    #[test]
    fn test_concurrent_writers_do_not_corrupt() {
        let (svc, _) = memory_service(PortalConfig::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let svc = Arc::clone(&svc);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        svc.replace_applications(vec![app(&format!("app{}", i), "X")])
                            .unwrap();
                    } else {
                        svc.replace_categories(default_categories()).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let doc = svc.list().unwrap();
        assert_eq!(doc.categories, default_categories());
        assert_eq!(doc.applications.len(), 1);
    }
}
