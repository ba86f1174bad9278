//! Recap form for the self-attested path.

use attest_types::Attachment;

/// What the recap screen collects before confirmation: an optional note,
/// zero or more evidence attachments, and the mandatory honor declaration.
#[derive(Debug, Default)]
pub struct RecapForm {
    note: Option<String>,
    attachments: Vec<PendingAttachment>,
    declaration_affirmed: bool,
}

/// An attachment queued for upload, remembering its public URL once
/// uploaded so a confirm retry does not upload twice.
#[derive(Debug)]
pub(crate) struct PendingAttachment {
    pub attachment: Attachment,
    pub uploaded_url: Option<String>,
}

impl RecapForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Queue an attachment (file pick or second camera capture).
    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(PendingAttachment {
            attachment,
            uploaded_url: None,
        });
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// Explicitly affirm the honor declaration.
    pub fn affirm_declaration(&mut self) {
        self.declaration_affirmed = true;
    }

    pub fn declaration_affirmed(&self) -> bool {
        self.declaration_affirmed
    }

    /// The confirm action is enabled only once the declaration is
    /// affirmed. A hard precondition, not a soft warning.
    pub fn can_confirm(&self) -> bool {
        self.declaration_affirmed
    }

    /// URLs of successfully uploaded attachments.
    pub fn uploaded_urls(&self) -> Vec<String> {
        self.attachments
            .iter()
            .filter_map(|p| p.uploaded_url.clone())
            .collect()
    }

    pub(crate) fn pending_mut(&mut self) -> &mut Vec<PendingAttachment> {
        &mut self.attachments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::{AttachmentKind, RegistrationId};

    #[test]
    fn confirm_is_gated_on_the_declaration() {
        let mut form = RecapForm::new();
        form.set_note("arrived at the north entrance");
        assert!(!form.can_confirm());

        form.affirm_declaration();
        assert!(form.can_confirm());
    }

    #[test]
    fn blank_notes_collapse_to_none() {
        let mut form = RecapForm::new();
        form.set_note("   ");
        assert_eq!(form.note(), None);
        form.set_note("real note");
        assert_eq!(form.note(), Some("real note"));
    }

    #[test]
    fn attachments_accumulate() {
        let mut form = RecapForm::new();
        form.add_attachment(Attachment {
            id: "a1".into(),
            registration_id: RegistrationId::new("r1"),
            kind: AttachmentKind::Image,
            bytes: vec![1],
        });
        assert_eq!(form.attachment_count(), 1);
        assert!(form.uploaded_urls().is_empty());
    }
}
