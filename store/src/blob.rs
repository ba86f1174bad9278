//! Opaque evidence blob store seam.

use crate::StoreError;

/// Write-once storage for uploaded evidence.
///
/// Failures here are non-fatal to the certification flow; the uploader
/// logs and skips.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, returning a public URL.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StoreError>;
}
