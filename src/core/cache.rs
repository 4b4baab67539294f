use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Hashed-key memoization store with a fixed TTL.
///
/// Maps a canonical JSON fingerprint to a previously fetched raw response.
/// This is a best-effort memoization aid, not a mutual-exclusion mechanism:
/// two near-simultaneous calculations with the same fingerprint may both
/// reach the rate client, which is acceptable because the fetch is
/// idempotent and side-effect free.
pub struct RateCache {
    key_prefix: String,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl RateCache {
    pub fn new(ttl: Duration, key_prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Builds the storage key from arbitrary key material.
    ///
    /// serde_json serializes map keys in sorted order, so the JSON form is
    /// canonical. The digest is not a security boundary, only a stable
    /// fingerprint.
    fn hash_key(&self, key_data: &Value) -> String {
        let json = key_data.to_string();
        let digest = Sha256::digest(json.as_bytes());
        format!("{}{}", self.key_prefix, hex::encode(digest))
    }

    // A poisoned lock only means another thread panicked mid-insert; stale
    // or missing entries are tolerated, so recover the guard.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, key: &str, value: Value) {
        self.entries().insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Reads a live entry, evicting it if its TTL has lapsed.
    pub fn read(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    pub fn delete(&self, key: &str) {
        self.entries().remove(key);
    }

    pub fn set_with_hashed_key(&self, key_data: &Value, value: Value) {
        self.set(&self.hash_key(key_data), value);
    }

    pub fn read_hashed_value(&self, key_data: &Value) -> Option<Value> {
        self.read(&self.hash_key(key_data))
    }

    pub fn contains_hashed_value(&self, key_data: &Value) -> bool {
        self.contains(&self.hash_key(key_data))
    }

    pub fn delete_hashed_value(&self, key_data: &Value) {
        self.delete(&self.hash_key(key_data));
    }
}
