use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::KVError;
use crate::traits::KVStore;

/// FileStore is a KVStore implementation backed by the local filesystem.
///
/// Each key maps to one file directly under `base_dir`:
///   key "applications.json" → `{base_dir}/applications.json`
///
/// Writes go to a temporary file in `base_dir` which is then renamed over the
/// target, so readers never see a half-written value.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new FileStore rooted at `base_dir`.
    /// The directory is created if it doesn't exist.
    pub fn open(base_dir: &Path) -> Result<Self, KVError> {
        fs::create_dir_all(base_dir).map_err(|e| {
            KVError::Storage(format!("create {}: {}", base_dir.display(), e))
        })?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
        })
    }

    /// Resolve a key to a filesystem path. Only flat file names are accepted.
    fn resolve(&self, key: &str) -> Result<PathBuf, KVError> {
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains('/')
            || key.contains('\\')
        {
            return Err(KVError::InvalidKey(format!("{:?}", key)));
        }
        Ok(self.base_dir.join(key))
    }
}

impl KVStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let path = self.resolve(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KVError::Storage(format!("read {}: {}", path.display(), e))),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        let path = self.resolve(key)?;
        let storage_err =
            |e: std::io::Error| KVError::Storage(format!("write {}: {}", path.display(), e));

        let mut tmp = NamedTempFile::new_in(&self.base_dir).map_err(storage_err)?;
        tmp.write_all(value).map_err(storage_err)?;
        tmp.as_file().sync_all().map_err(storage_err)?;
        tmp.persist(&path).map_err(|e| storage_err(e.error))?;

        debug!("FileStore: wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        self.base_dir.join(key).display().to_string()
    }
}
