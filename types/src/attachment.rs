//! User-supplied evidence attachments for the self-attested path.

use crate::RegistrationId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// A still captured through the in-flow camera sub-flow.
    Image,
    /// A file picked from the device.
    File,
}

/// One piece of user-supplied evidence.
///
/// Created client-side, uploaded at confirmation time, immutable once
/// uploaded. Orphans from abandoned confirmations are not cleaned up here.
#[derive(Clone, Debug, PartialEq)]
pub struct Attachment {
    pub id: String,
    pub registration_id: RegistrationId,
    pub kind: AttachmentKind,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Storage key this attachment uploads under.
    pub fn storage_key(&self) -> String {
        format!("evidence/{}/{}", self.registration_id, self.id)
    }
}
