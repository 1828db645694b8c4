//! Recipient signing protocol
//!
//! Everything here is token-authenticated: possession of the bearer token
//! identifies the recipient, and the field-assignment resolver scopes what
//! they can see and write. The protocol is deliberately tolerant — field
//! submissions merge one at a time, re-completing is benign, and a corrupt
//! signature-data blob reads as "nothing filled yet" rather than an error.
//!
//! Completion aggregates across signers with a self-tolerance rule: the
//! completing recipient counts as satisfied even if the just-written
//! status has not been read back, so two signers finishing concurrently
//! cannot wedge a document short of `signed`.

use chrono::Utc;
use crate::{fields_for_recipient, required_fields_for_recipient, slot_matches, Engine, Job};
use signet_types::{
    validate_field_value, AccessToken, AuditEntry, AuditEvent, ClientInfo, Document, DocumentId,
    DocumentStatus, Field, FileRef, Recipient, RecipientRole, RecipientStatus, SignetError,
    SignetResult,
};
use tracing::info;

/// Progress row for one party, shown to every other party
#[derive(Clone, Debug)]
pub struct RecipientProgress {
    pub name: String,
    pub email: String,
    pub role: RecipientRole,
    pub order: u32,
    pub status: RecipientStatus,
}

impl From<&Recipient> for RecipientProgress {
    fn from(r: &Recipient) -> Self {
        Self {
            name: r.name.clone(),
            email: r.email.clone(),
            role: r.role,
            order: r.order,
            status: r.status,
        }
    }
}

/// Everything a signing page needs, scoped to one token.
///
/// `fields` holds only the fields assigned to this recipient's position;
/// other parties' fields and the sender's fields are not exposed.
#[derive(Clone, Debug)]
pub struct SigningSession {
    pub document_id: DocumentId,
    pub title: String,
    pub status: DocumentStatus,
    pub original_file: FileRef,
    pub fields: Vec<Field>,
    pub recipient: Recipient,
    pub sender_name: String,
    pub sender_email: String,
    pub parties: Vec<RecipientProgress>,
}

impl Engine {
    fn refuse_if_voided(document: &Document) -> SignetResult<()> {
        if document.status == DocumentStatus::Voided {
            return Err(SignetError::invalid_state("This document has been voided"));
        }
        Ok(())
    }

    /// Load the signing session for a token.
    ///
    /// Read-only: a lapsed deadline is reported as `expired` without being
    /// persisted, and viewing state is not touched (that is
    /// [`Engine::mark_viewed`]'s job).
    pub async fn signing_session(&self, token: &AccessToken) -> SignetResult<SigningSession> {
        let (recipient, document) = self.resolve_token(token).await?;

        Self::refuse_if_voided(&document)?;
        let status = document.effective_status(Utc::now());
        if status == DocumentStatus::Expired {
            return Err(SignetError::Expired);
        }

        let sender = self
            .store
            .user(&document.owner_id)
            .await?
            .ok_or_else(|| SignetError::not_found("User"))?;

        let mut parties: Vec<RecipientProgress> = self
            .store
            .recipients_by_document(&document.id)
            .await?
            .iter()
            .map(RecipientProgress::from)
            .collect();
        parties.sort_by_key(|p| p.order);

        let fields = fields_for_recipient(&document.fields, recipient.order)
            .into_iter()
            .cloned()
            .collect();

        Ok(SigningSession {
            document_id: document.id,
            title: document.title,
            status,
            original_file: document.original_file,
            fields,
            recipient,
            sender_name: sender.name,
            sender_email: sender.email,
            parties,
        })
    }

    /// Record that a recipient opened the document.
    ///
    /// Idempotent: only a `pending` recipient transitions to `viewed`, and
    /// only a `sent` document escalates to `viewed`. Repeat calls are
    /// no-ops and append nothing.
    pub async fn mark_viewed(&self, token: &AccessToken, client: ClientInfo) -> SignetResult<()> {
        let (mut recipient, mut document) = self.resolve_token(token).await?;

        self.refuse_if_expired(&mut document).await?;
        Self::refuse_if_voided(&document)?;

        if recipient.status != RecipientStatus::Pending {
            return Ok(());
        }

        recipient.status = RecipientStatus::Viewed;
        recipient.record_client(&client);
        let recipient_email = recipient.email.clone();
        self.store.update_recipient(recipient).await?;

        if document.status == DocumentStatus::Sent {
            document.status = DocumentStatus::Viewed;
            self.store.update_document(document.clone()).await?;
        }

        self.record(
            AuditEntry::new(document.id.clone(), AuditEvent::Viewed, recipient_email)
                .with_client(&client),
        )
        .await;

        info!(document_id = %document.id, "recipient viewed document");
        Ok(())
    }

    /// Submit one field value, merging it into the recipient's signature
    /// data. The field must resolve to the recipient's signing position.
    ///
    /// Only document-level state gates this: a recipient who already
    /// signed may still revise a value while the document is live.
    pub async fn submit_field(
        &self,
        token: &AccessToken,
        field_id: &str,
        value: &str,
        client: ClientInfo,
    ) -> SignetResult<()> {
        let (mut recipient, mut document) = self.resolve_token(token).await?;

        self.refuse_if_expired(&mut document).await?;
        Self::refuse_if_voided(&document)?;

        validate_field_value(value)?;
        let field = document
            .field(field_id)
            .ok_or_else(|| SignetError::not_found("Field"))?;
        if !slot_matches(field.assigned_to, recipient.order) {
            return Err(SignetError::unauthorized(
                "Field is not assigned to this recipient",
            ));
        }

        recipient.set_signature_value(field_id, value);
        recipient.record_client(&client);
        self.store.update_recipient(recipient).await
    }

    /// Complete signing for the recipient behind `token`.
    ///
    /// Fails with `Validation` naming the first unfilled required field.
    /// On success the recipient is marked `signed`; if every signer is now
    /// satisfied the document settles to `signed` and finalization jobs
    /// (PDF generation, completion notices) are enqueued once.
    pub async fn complete(&self, token: &AccessToken, client: ClientInfo) -> SignetResult<()> {
        let (mut recipient, mut document) = self.resolve_token(token).await?;

        self.refuse_if_expired(&mut document).await?;
        Self::refuse_if_voided(&document)?;

        let filled = recipient.parsed_signature_data();
        for field in required_fields_for_recipient(&document.fields, recipient.order) {
            let missing = filled
                .get(&field.id)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(SignetError::validation(format!(
                    "Required field \"{}\" is not filled",
                    field.label
                )));
            }
        }

        let now = Utc::now();
        let recipient_id = recipient.id.clone();
        let recipient_email = recipient.email.clone();
        recipient.status = RecipientStatus::Signed;
        recipient.signed_at = Some(now);
        recipient.record_client(&client);
        self.store.update_recipient(recipient).await?;

        self.record(
            AuditEntry::new(document.id.clone(), AuditEvent::Signed, recipient_email)
                .with_client(&client),
        )
        .await;

        // Self-tolerance: the completing recipient counts as signed even
        // if this read races the write above.
        let parties = self.store.recipients_by_document(&document.id).await?;
        let all_signed = parties
            .iter()
            .filter(|p| p.role == RecipientRole::Signer)
            .all(|p| p.id == recipient_id || p.status == RecipientStatus::Signed);

        if all_signed && document.status != DocumentStatus::Signed {
            document.status = DocumentStatus::Signed;
            document.completed_at = Some(now);
            let document_id = document.id.clone();
            self.store.update_document(document).await?;
            self.jobs
                .enqueue(Job::GenerateSignedPdf(document_id.clone()))
                .await?;
            self.jobs
                .enqueue(Job::SendSigningComplete(document_id.clone()))
                .await?;
            info!(document_id = %document_id, "all signers complete, document signed");
        }

        Ok(())
    }
}
