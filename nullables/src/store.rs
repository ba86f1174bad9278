//! Nullable stores — an inspectable blob store with scriptable failures,
//! and a registration store that fails a scripted number of writes.

use attest_store::{BlobStore, MemoryStore, RegistrationStore, SelfCertification, StoreError};
use attest_types::{Registration, RegistrationId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A blob store that records puts and can be told to fail specific keys.
pub struct NullBlobStore {
    failing: Mutex<HashSet<String>>,
    puts: Mutex<Vec<String>>,
}

impl NullBlobStore {
    pub fn new() -> Self {
        Self {
            failing: Mutex::new(HashSet::new()),
            puts: Mutex::new(Vec::new()),
        }
    }

    /// Make every put of `key` fail.
    pub fn fail_key(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    /// Keys stored so far, in put order.
    pub fn stored_keys(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    /// How many puts have succeeded.
    pub fn put_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }
}

impl Default for NullBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for NullBlobStore {
    fn put(&self, key: &str, _bytes: &[u8]) -> Result<String, StoreError> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(StoreError::Backend(format!("simulated upload failure for {key}")));
        }
        self.puts.lock().unwrap().push(key.to_string());
        Ok(format!("null://{key}"))
    }
}

/// Wraps a [`MemoryStore`], failing the first N certification writes
/// before delegating. Reads always delegate.
pub struct UnreliableRegistrationStore {
    inner: Arc<MemoryStore>,
    failures_left: AtomicUsize,
}

impl UnreliableRegistrationStore {
    pub fn failing_times(inner: Arc<MemoryStore>, failures: usize) -> Self {
        Self {
            inner,
            failures_left: AtomicUsize::new(failures),
        }
    }
}

impl RegistrationStore for UnreliableRegistrationStore {
    fn get(&self, id: &RegistrationId) -> Result<Registration, StoreError> {
        self.inner.get(id)
    }

    fn record_self_certification(
        &self,
        id: &RegistrationId,
        certification: &SelfCertification,
    ) -> Result<Registration, StoreError> {
        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(StoreError::Backend("simulated write failure".to_string()));
        }
        self.inner.record_self_certification(id, certification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::{EventId, Timestamp, UserId};

    #[test]
    fn failing_key_rejects_only_that_key() {
        let blobs = NullBlobStore::new();
        blobs.fail_key("evidence/r1/a1");

        assert!(blobs.put("evidence/r1/a1", b"x").is_err());
        assert_eq!(blobs.put("evidence/r1/a2", b"x").unwrap(), "null://evidence/r1/a2");
        assert_eq!(blobs.stored_keys(), vec!["evidence/r1/a2".to_string()]);
    }

    #[test]
    fn unreliable_store_recovers_after_scripted_failures() {
        let inner = Arc::new(MemoryStore::new());
        inner.insert_registration(Registration::new(
            RegistrationId::new("r1"),
            UserId::new("u1"),
            EventId::new("e1"),
        ));
        let store = UnreliableRegistrationStore::failing_times(Arc::clone(&inner), 1);
        let cert = SelfCertification {
            attended_at: Timestamp::new(5000),
            certification_start_at: Timestamp::new(4900),
            reported_position: None,
            reported_address: None,
        };

        assert!(store.record_self_certification(&RegistrationId::new("r1"), &cert).is_err());
        assert!(store.record_self_certification(&RegistrationId::new("r1"), &cert).is_ok());
    }
}
