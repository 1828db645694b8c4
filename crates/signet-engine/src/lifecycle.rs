//! Document lifecycle state machine
//!
//! Owner-facing transitions over `draft → sent → viewed → signed`, with
//! `voided` and `expired` as side exits. Two rules hold at every mutating
//! guard point:
//!
//! - expiry is checked first and wins: a lapsed deadline is persisted as
//!   `expired` and raised before any competing state error;
//! - no transition leaves a terminal state (`signed`, `voided`,
//!   `expired`) except audit appends.
//!
//! Read paths never persist expiry; they report an effective status
//! computed from the deadline instead.

use chrono::Utc;
use crate::{Caller, Engine, Job};
use signet_types::{
    sort_audit_entries, validate_recipients, AuditEntry, AuditEvent, Document, DocumentId,
    DocumentStatus, Field, FileRef, Recipient, RecipientInput, SignetError, SignetResult,
    TemplateId,
};
use std::collections::HashMap;
use tracing::info;

/// Input to [`Engine::create_document`]
#[derive(Clone, Debug)]
pub struct CreateDocument {
    pub title: String,
    pub template_id: Option<TemplateId>,
    pub original_file: FileRef,
    pub variable_values: HashMap<String, String>,
    pub fields: Vec<Field>,
}

/// Owner view of a document: record plus sorted recipients and audit trail
#[derive(Clone, Debug)]
pub struct DocumentView {
    pub document: Document,
    pub recipients: Vec<Recipient>,
    pub audit: Vec<AuditEntry>,
}

/// Outcome of a successful send
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendReceipt {
    pub document_id: DocumentId,
    pub recipients_created: usize,
}

impl Engine {
    /// Persist expiry and refuse the mutation if the deadline has lapsed.
    ///
    /// Terminal documents other than `expired` are left alone; an already
    /// expired document still refuses with `Expired`.
    pub(crate) async fn refuse_if_expired(&self, document: &mut Document) -> SignetResult<()> {
        if document.status == DocumentStatus::Expired {
            return Err(SignetError::Expired);
        }
        if !document.status.is_terminal() && document.is_expired_at(Utc::now()) {
            document.status = DocumentStatus::Expired;
            self.store.update_document(document.clone()).await?;
            info!(document_id = %document.id, "document expired");
            return Err(SignetError::Expired);
        }
        Ok(())
    }

    /// Create a draft document. Counts against the owner's plan and
    /// hourly creation quotas; the original PDF must already be stored.
    pub async fn create_document(
        &self,
        caller: &Caller,
        request: CreateDocument,
    ) -> SignetResult<DocumentId> {
        let user = self.resolve_user(caller).await?;

        if self.files.url(&request.original_file).await?.is_none() {
            return Err(SignetError::validation(
                "PDF file does not exist in storage",
            ));
        }

        self.check_creation_quota(&user).await?;

        let mut document = Document::draft(user.id.clone(), request.title, request.original_file)
            .with_fields(request.fields)
            .with_variable_values(request.variable_values);
        if let Some(template_id) = request.template_id {
            document = document.with_template(template_id);
        }

        let document_id = document.id.clone();
        self.store.insert_document(document).await?;
        self.record(AuditEntry::new(
            document_id.clone(),
            AuditEvent::Created,
            &user.email,
        ))
        .await;

        info!(document_id = %document_id, owner = %user.id, "document created");
        Ok(document_id)
    }

    /// List the caller's documents, newest first, optionally filtered by
    /// status. Statuses are reported effective: a lapsed deadline reads as
    /// `expired` without being persisted.
    pub async fn list_documents(
        &self,
        caller: &Caller,
        status: Option<DocumentStatus>,
    ) -> SignetResult<Vec<Document>> {
        let user = self.resolve_user(caller).await?;
        let now = Utc::now();

        let mut documents = self.store.documents_by_owner(&user.id).await?;
        for document in &mut documents {
            document.status = document.effective_status(now);
        }
        if let Some(status) = status {
            documents.retain(|d| d.status == status);
        }
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    /// Full owner view: document with effective status, recipients sorted
    /// by signing order, audit trail sorted by timestamp.
    pub async fn get_document(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
    ) -> SignetResult<DocumentView> {
        let (_, mut document) = self.resolve_owned_document(caller, document_id).await?;
        document.status = document.effective_status(Utc::now());

        let mut recipients = self.store.recipients_by_document(document_id).await?;
        recipients.sort_by_key(|r| r.order);

        let mut audit = self.store.audit_by_document(document_id).await?;
        sort_audit_entries(&mut audit);

        Ok(DocumentView {
            document,
            recipients,
            audit,
        })
    }

    /// Send a draft: validates recipients and fields, stamps the 30-day
    /// expiry, mints one pending recipient (with a fresh unique token) per
    /// input, and schedules a signing-request notification for each.
    pub async fn send_document(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
        recipients: Vec<RecipientInput>,
    ) -> SignetResult<SendReceipt> {
        let (user, mut document) = self.resolve_owned_document(caller, document_id).await?;

        self.refuse_if_expired(&mut document).await?;
        if document.status != DocumentStatus::Draft {
            return Err(SignetError::invalid_state(
                "Only draft documents can be sent",
            ));
        }
        if document.fields.is_empty() {
            return Err(SignetError::validation(
                "At least one field is required before sending",
            ));
        }
        validate_recipients(&recipients)?;

        let now = Utc::now();
        let expires_at = Document::expiry_from(now);
        document.status = DocumentStatus::Sent;
        document.sent_at = Some(now);
        document.expires_at = Some(expires_at);
        self.store.update_document(document).await?;

        let mut created = 0;
        for input in &recipients {
            let recipient = Recipient::invite(document_id.clone(), input, Some(expires_at));
            let recipient_id = recipient.id.clone();
            self.store.insert_recipient(recipient).await?;
            self.jobs.enqueue(Job::SendSigningRequest(recipient_id)).await?;
            created += 1;
        }

        self.record(AuditEntry::new(
            document_id.clone(),
            AuditEvent::Sent,
            &user.email,
        ))
        .await;

        info!(document_id = %document_id, recipients = created, "document sent");
        Ok(SendReceipt {
            document_id: document_id.clone(),
            recipients_created: created,
        })
    }

    /// Void a live document. Expiry wins a tie: voiding an expired
    /// document persists `expired` and raises `Expired` instead.
    pub async fn void_document(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
        reason: Option<String>,
    ) -> SignetResult<()> {
        let (user, mut document) = self.resolve_owned_document(caller, document_id).await?;

        self.refuse_if_expired(&mut document).await?;
        match document.status {
            DocumentStatus::Voided => {
                return Err(SignetError::invalid_state("Document is already voided"))
            }
            DocumentStatus::Signed => {
                return Err(SignetError::invalid_state("Cannot void a signed document"))
            }
            _ => {}
        }

        document.status = DocumentStatus::Voided;
        document.voided_reason = reason;
        self.store.update_document(document).await?;

        self.record(AuditEntry::new(
            document_id.clone(),
            AuditEvent::Voided,
            &user.email,
        ))
        .await;

        info!(document_id = %document_id, "document voided");
        Ok(())
    }

    /// Add a field. Legal while the document is draft, sent, or viewed.
    pub async fn add_field(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
        field: Field,
    ) -> SignetResult<()> {
        let (_, mut document) = self.resolve_owned_document(caller, document_id).await?;

        self.refuse_if_expired(&mut document).await?;
        if !document.fields_mutable() {
            return Err(SignetError::invalid_state(
                "Fields can no longer be modified on this document",
            ));
        }
        if document.field(&field.id).is_some() {
            return Err(SignetError::validation(format!(
                "Field id {:?} already exists",
                field.id
            )));
        }

        document.fields.push(field);
        self.store.update_document(document).await
    }

    /// Remove a field by id. Legal while the document is draft, sent, or
    /// viewed.
    pub async fn remove_field(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
        field_id: &str,
    ) -> SignetResult<()> {
        let (_, mut document) = self.resolve_owned_document(caller, document_id).await?;

        self.refuse_if_expired(&mut document).await?;
        if !document.fields_mutable() {
            return Err(SignetError::invalid_state(
                "Fields can no longer be modified on this document",
            ));
        }

        let before = document.fields.len();
        document.fields.retain(|f| f.id != field_id);
        if document.fields.len() == before {
            return Err(SignetError::not_found("Field"));
        }

        self.store.update_document(document).await
    }

    /// Re-send a signing reminder to one recipient, throttled to three per
    /// recipient e-mail per document per hour.
    pub async fn resend_reminder(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
        recipient_email: &str,
    ) -> SignetResult<()> {
        let (_, mut document) = self.resolve_owned_document(caller, document_id).await?;

        self.refuse_if_expired(&mut document).await?;
        if !matches!(
            document.status,
            DocumentStatus::Sent | DocumentStatus::Viewed
        ) {
            return Err(SignetError::invalid_state(
                "Can only resend reminders for sent or viewed documents",
            ));
        }

        let recipients = self.store.recipients_by_document(document_id).await?;
        let recipient = recipients
            .iter()
            .find(|r| r.email == recipient_email)
            .ok_or_else(|| SignetError::not_found("Recipient"))?;
        if recipient.status == signet_types::RecipientStatus::Signed {
            return Err(SignetError::invalid_state(
                "Recipient has already signed the document",
            ));
        }

        self.check_reminder_quota(document_id, recipient_email).await?;

        // The reminder_sent entry doubles as the throttle counter.
        self.record(AuditEntry::new(
            document_id.clone(),
            AuditEvent::ReminderSent,
            recipient_email,
        ))
        .await;
        self.jobs
            .enqueue(Job::SendReminder(recipient.id.clone()))
            .await?;

        info!(document_id = %document_id, "reminder scheduled");
        Ok(())
    }

    /// Validate a freshly uploaded blob as a PDF.
    ///
    /// Rate-limited per owner; an upload failing any check is deleted
    /// before the error surfaces. Returns the byte size on success.
    pub async fn validate_upload(
        &self,
        caller: &Caller,
        file: &FileRef,
    ) -> SignetResult<usize> {
        let user = self.resolve_user(caller).await?;
        self.check_upload_rate(&user).await?;
        signet_store::validate_pdf_upload(self.files.as_ref(), file).await
    }

    /// Download URL for the finalized PDF, recording a `downloaded` audit
    /// entry.
    pub async fn signed_document_url(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
    ) -> SignetResult<String> {
        let (user, document) = self.resolve_owned_document(caller, document_id).await?;

        let signed_file = document.signed_file.as_ref().ok_or_else(|| {
            SignetError::invalid_state("Document has not been finalized yet")
        })?;
        let url = self
            .files
            .url(signed_file)
            .await?
            .ok_or_else(|| SignetError::not_found("File"))?;

        self.record(
            AuditEntry::new(document_id.clone(), AuditEvent::Downloaded, &user.email),
        )
        .await;
        Ok(url)
    }
}
