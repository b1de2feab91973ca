use crate::error::KVError;

/// KVStore provides the key-value storage interface the ordering engine
/// persists through.
///
/// Keys follow a namespaced convention: `cart:{customer}:{product}`,
/// `order:{customer}:{id}`, etc. Implementations must keep `scan` output
/// sorted by key so prefix listings are deterministic.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Set several key-value pairs in one write. Implementations commit the
    /// batch atomically where the backend supports it.
    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError>;

    /// Delete several keys in one write.
    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
