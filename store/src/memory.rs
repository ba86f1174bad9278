//! In-memory reference backend.
//!
//! Mutex-protected maps; thread-safe for use with tokio's multi-threaded
//! runtime. The critical sections are where the idempotency and
//! at-most-once guarantees of the persistence contract actually live.

use crate::registration::{RegistrationStore, SelfCertification};
use crate::token::{IssuedToken, TokenSecret, TokenStore, VerificationToken};
use crate::{BlobStore, StoreError};
use attest_types::{Registration, RegistrationId, RegistrationStatus, Timestamp};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory registration + token + blob store.
pub struct MemoryStore {
    registrations: Mutex<HashMap<String, Registration>>,
    tokens: Mutex<HashMap<String, VerificationToken>>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            registrations: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    /// Seed a registration record (registration creation is out of scope
    /// for the core, so tests and callers insert directly).
    pub fn insert_registration(&self, registration: Registration) {
        self.registrations
            .lock()
            .unwrap()
            .insert(registration.id.as_str().to_string(), registration);
    }

    /// Number of stored evidence blobs.
    pub fn blob_count(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryStore {
    fn issue_or_get_token(
        &self,
        registration_id: &RegistrationId,
        now: Timestamp,
    ) -> Result<IssuedToken, StoreError> {
        // One guard across lookup and insert; concurrent duplicates
        // serialize here and the loser sees the winner's token.
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(existing) = tokens.get(registration_id.as_str()) {
            // A consumed token is spent for good; only a live one is
            // replayed. Minting below replaces the consumed record.
            if !existing.consumed {
                return Ok(IssuedToken {
                    token: existing.clone(),
                    newly_issued: false,
                });
            }
        }
        let token = VerificationToken {
            registration_id: registration_id.clone(),
            token: TokenSecret::generate()?,
            issued_at: now,
            consumed: false,
        };
        tokens.insert(registration_id.as_str().to_string(), token.clone());
        Ok(IssuedToken {
            token,
            newly_issued: true,
        })
    }

    fn get_live_token(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<VerificationToken>, StoreError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .get(registration_id.as_str())
            .filter(|t| !t.consumed)
            .cloned())
    }

    fn mark_consumed(
        &self,
        registration_id: &RegistrationId,
        presented: &str,
    ) -> Result<(), StoreError> {
        let mut tokens = self.tokens.lock().unwrap();
        let record = tokens
            .get_mut(registration_id.as_str())
            .ok_or_else(|| StoreError::NotFound(registration_id.to_string()))?;
        if !record.token.ct_eq(presented) {
            return Err(StoreError::TokenMismatch(registration_id.to_string()));
        }
        if record.consumed {
            return Err(StoreError::AlreadyConsumed(registration_id.to_string()));
        }
        record.consumed = true;
        Ok(())
    }
}

impl RegistrationStore for MemoryStore {
    fn get(&self, id: &RegistrationId) -> Result<Registration, StoreError> {
        self.registrations
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn record_self_certification(
        &self,
        id: &RegistrationId,
        certification: &SelfCertification,
    ) -> Result<Registration, StoreError> {
        // Compare-and-set on attended_at inside one guard: the full update
        // applies atomically or not at all.
        let mut registrations = self.registrations.lock().unwrap();
        let record = registrations
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if record.attended_at.is_some() {
            return Err(StoreError::AlreadyCertified(id.to_string()));
        }
        record.status = RegistrationStatus::SelfCertified;
        record.attended_at = Some(certification.attended_at);
        record.certification_start_at = Some(certification.certification_start_at);
        record.reported_position = certification.reported_position;
        record.reported_address = certification.reported_address.clone();
        record.validated_by = None;
        Ok(record.clone())
    }
}

impl BlobStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StoreError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(format!("memory://{key}"))
    }
}
