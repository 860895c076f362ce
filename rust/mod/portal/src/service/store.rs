use std::sync::Arc;

use tracing::info;

use portal_core::config::REGISTRY_FILE;
use portal_kv::KVStore;

use crate::model::RegistryDocument;
use crate::service::PortalError;
use crate::service::migration;

/// Key of the registry document in the backing store.
pub const REGISTRY_KEY: &str = REGISTRY_FILE;

/// Durable home of the [`RegistryDocument`].
///
/// Every read goes through the migration layer and never writes. Seeding a
/// missing document and rewriting a legacy one happen once, in [`init`],
/// before the store is shared.
///
/// [`init`]: RegistryStore::init
pub struct RegistryStore {
    kv: Arc<dyn KVStore>,
}

impl RegistryStore {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    /// Persist the document in the current shape: seed it when missing,
    /// rewrite it when found in a legacy shape.
    pub fn init(&self) -> Result<RegistryDocument, PortalError> {
        let Some(migrated) = self.read()? else {
            let doc = RegistryDocument::seed();
            self.save(&doc)?;
            info!("Registry document initialized at {}", self.location());
            return Ok(doc);
        };
        if let Some(shape) = migrated.legacy_shape {
            info!("Migrating registry document from {:?} shape", shape);
            self.save(&migrated.document)?;
            info!("Registry migration complete");
        }
        Ok(migrated.document)
    }

    /// Read the current document. A missing document reads as the seed and
    /// a legacy one as its migrated form; neither is written back here.
    pub fn load(&self) -> Result<RegistryDocument, PortalError> {
        Ok(self
            .read()?
            .map(|m| m.document)
            .unwrap_or_else(RegistryDocument::seed))
    }

    fn read(&self) -> Result<Option<migration::Migrated>, PortalError> {
        let Some(bytes) = self.kv.get(REGISTRY_KEY)? else {
            return Ok(None);
        };

        let raw: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            PortalError::Storage(format!(
                "registry document {} is not valid JSON: {}",
                self.location(),
                e
            ))
        })?;

        migration::migrate(raw).map(Some)
    }

    /// Replace the stored document. Readers see either the old or the new
    /// document, never a mix.
    pub fn save(&self, doc: &RegistryDocument) -> Result<(), PortalError> {
        let data = serde_json::to_vec_pretty(doc)
            .map_err(|e| PortalError::Storage(format!("encode registry: {}", e)))?;
        self.kv.set(REGISTRY_KEY, &data)?;
        Ok(())
    }

    /// Location of the document, for diagnostics.
    pub fn location(&self) -> String {
        self.kv.location(REGISTRY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use portal_kv::{FileStore, MemoryStore};

    use super::*;
    use crate::model::default_categories;

    fn memory_store() -> (RegistryStore, Arc<MemoryStore>) {
        let mem = Arc::new(MemoryStore::new());
        let kv: Arc<dyn KVStore> = mem.clone();
        (RegistryStore::new(kv), mem)
    }

    #[test]
    fn test_init_seeds_missing_document() {
        let (store, mem) = memory_store();
        let doc = store.init().unwrap();
        assert_eq!(doc, RegistryDocument::seed());

        let persisted: RegistryDocument =
            serde_json::from_slice(&mem.get(REGISTRY_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, doc);
    }

    #[test]
    fn test_load_missing_document_reads_seed_without_writing() {
        let (store, mem) = memory_store();
        assert_eq!(store.load().unwrap(), RegistryDocument::seed());
        assert!(mem.get(REGISTRY_KEY).unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_document_is_storage_error() {
        let (store, mem) = memory_store();
        mem.set(REGISTRY_KEY, b"{not json").unwrap();
        assert!(matches!(store.load(), Err(PortalError::Storage(_))));
        assert!(matches!(store.init(), Err(PortalError::Storage(_))));
        // Nothing was overwritten.
        assert_eq!(mem.get(REGISTRY_KEY).unwrap().unwrap(), b"{not json");
    }

    #[test]
    fn test_load_migrates_without_writing() {
        let (store, mem) = memory_store();
        let legacy = br#"[{"id":"x","name":"X","url":"http://x"}]"#;
        mem.set(REGISTRY_KEY, legacy).unwrap();
        mem.set_fail_writes(true);

        let doc = store.load().unwrap();
        assert_eq!(doc.categories, default_categories());
        assert_eq!(doc.applications[0].category, "other");
        assert_eq!(mem.get(REGISTRY_KEY).unwrap().unwrap(), legacy.to_vec());
    }

    #[test]
    fn test_init_migrates_and_writes_back() {
        let (store, mem) = memory_store();
        mem.set(
            REGISTRY_KEY,
            br#"[{"id":"x","name":"X","url":"http://x"}]"#,
        )
        .unwrap();

        let doc = store.init().unwrap();
        assert_eq!(doc.categories, default_categories());
        assert_eq!(doc.applications[0].category, "other");

        let raw: serde_json::Value =
            serde_json::from_slice(&mem.get(REGISTRY_KEY).unwrap().unwrap()).unwrap();
        assert!(raw.is_object());
        assert_eq!(raw["applications"][0]["category"], "other");
    }

    #[test]
    fn test_save_failure_propagates() {
        let (store, mem) = memory_store();
        store.init().unwrap();
        mem.set_fail_writes(true);
        let err = store.save(&RegistryDocument::seed()).unwrap_err();
        assert!(matches!(err, PortalError::Storage(_)));
    }

    #[test]
    fn test_file_backed_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let kv: Arc<dyn KVStore> = Arc::new(FileStore::open(dir.path()).unwrap());
        let store = RegistryStore::new(kv);

        let mut doc = store.init().unwrap();
        assert!(dir.path().join("applications.json").is_file());

        doc.applications.truncate(1);
        store.save(&doc).unwrap();
        assert_eq!(store.load().unwrap(), doc);
        assert_eq!(
            store.location(),
            dir.path().join("applications.json").display().to_string()
        );
    }
}
