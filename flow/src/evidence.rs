//! Best-effort evidence upload.
//!
//! A failed individual upload is logged and skipped; it never fails the
//! overall confirmation. Already-uploaded attachments are not re-sent on a
//! confirm retry.

use crate::recap::RecapForm;
use attest_store::BlobStore;
use tracing::{debug, warn};

/// Upload every not-yet-uploaded attachment on the form. Returns how many
/// uploads succeeded during this pass.
pub(crate) fn upload_pending(blobs: &dyn BlobStore, form: &mut RecapForm) -> usize {
    let mut uploaded = 0;
    for pending in form.pending_mut().iter_mut() {
        if pending.uploaded_url.is_some() {
            continue;
        }
        let key = pending.attachment.storage_key();
        match blobs.put(&key, &pending.attachment.bytes) {
            Ok(url) => {
                debug!(key = %key, "evidence attachment uploaded");
                pending.uploaded_url = Some(url);
                uploaded += 1;
            }
            Err(error) => {
                warn!(key = %key, %error, "evidence attachment upload failed, skipping");
            }
        }
    }
    uploaded
}
