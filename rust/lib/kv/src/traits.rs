use crate::error::KVError;

/// KVStore provides whole-value storage keyed by a flat name.
///
/// Values are opaque byte documents. A `set` replaces the previous value
/// atomically: concurrent readers observe either the old or the new value,
/// never a partial write.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, replacing any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Human-readable location of a key (file path, memory slot, ...).
    fn location(&self, key: &str) -> String;
}
