//! Verification tokens — opaque, unguessable proof of a passed identity
//! check, scoped to one registration.

use crate::StoreError;
use attest_types::{RegistrationId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The opaque token value: 16 OS-random bytes (128 bits of entropy, above
/// the 122-bit floor), hex-encoded for URL embedding.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);

impl TokenSecret {
    pub const BYTE_LEN: usize = 16;

    /// Mint a fresh token from OS randomness.
    pub fn generate() -> Result<Self, StoreError> {
        let mut bytes = [0u8; Self::BYTE_LEN];
        getrandom::getrandom(&mut bytes).map_err(|e| StoreError::Entropy(e.to_string()))?;
        Ok(Self(hex::encode(bytes)))
    }

    /// Accept an externally supplied token value (e.g. from the oracle).
    pub fn from_hex(raw: &str) -> Result<Self, StoreError> {
        if raw.len() != Self::BYTE_LEN * 2 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StoreError::Backend(format!(
                "malformed token value ({} chars)",
                raw.len()
            )));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a presented token. Tokens are
    /// bearer secrets; equality must not leak a matching prefix length.
    pub fn ct_eq(&self, presented: &str) -> bool {
        let ours = self.0.as_bytes();
        let theirs = presented.as_bytes();
        if ours.len() != theirs.len() {
            return false;
        }
        let mut diff = 0u8;
        for (a, b) in ours.iter().zip(theirs) {
            diff |= a ^ b;
        }
        diff == 0
    }
}

// Tokens stay out of logs; Debug shows only a stub.
impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenSecret(\u{2026})")
    }
}

/// Durable record of an issued token.
///
/// Immutable after creation except for `consumed`, which the out-of-scope
/// organizer-scan collaborator flips exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerificationToken {
    pub registration_id: RegistrationId,
    pub token: TokenSecret,
    pub issued_at: Timestamp,
    pub consumed: bool,
}

/// Result of [`TokenStore::issue_or_get_token`].
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub token: VerificationToken,
    /// False when an existing token was returned instead of minted —
    /// the idempotent-replay case.
    pub newly_issued: bool,
}

/// Durable association of registration → issued token. Source of truth for
/// "has this registration already passed verification".
pub trait TokenStore: Send + Sync {
    /// Issue a token for the registration, or return the existing live one.
    ///
    /// A consumed token is treated as absent: the registration holds at
    /// most one live token, and a spent one is replaced by a fresh mint
    /// rather than replayed. Must be safe under concurrent duplicate calls
    /// for the same registration: the second caller receives the first
    /// caller's token, never a second token.
    fn issue_or_get_token(
        &self,
        registration_id: &RegistrationId,
        now: Timestamp,
    ) -> Result<IssuedToken, StoreError>;

    /// The unconsumed token for a registration, if one exists.
    fn get_live_token(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<Option<VerificationToken>, StoreError>;

    /// Consume a token. Called by the organizer-scan collaborator, never by
    /// the flow itself.
    fn mark_consumed(&self, registration_id: &RegistrationId, presented: &str)
        -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_distinct_hex() {
        let a = TokenSecret::generate().unwrap();
        let b = TokenSecret::generate().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().bytes().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn from_hex_rejects_malformed_values() {
        assert!(TokenSecret::from_hex("deadbeef").is_err());
        assert!(TokenSecret::from_hex(&"zz".repeat(16)).is_err());
        assert!(TokenSecret::from_hex(&"ab".repeat(16)).is_ok());
    }

    #[test]
    fn constant_time_compare_matches_exactly() {
        let token = TokenSecret::from_hex(&"ab".repeat(16)).unwrap();
        assert!(token.ct_eq(&"ab".repeat(16)));
        assert!(!token.ct_eq(&"ab".repeat(15)));
        assert!(!token.ct_eq(&"ac".repeat(16)));
    }

    #[test]
    fn debug_redacts_the_secret() {
        let token = TokenSecret::generate().unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains(token.as_str()));
    }
}
