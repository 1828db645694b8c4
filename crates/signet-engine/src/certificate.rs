//! Certificate payload for the finalized PDF
//!
//! Assembled by the PDF-generation job after a document settles to
//! `signed`: the submitted field values as positional overlays, a SHA-256
//! fingerprint of the original PDF bytes, the audit timeline, and a
//! summary row per signer. Rendering itself (pdf drawing, page layout)
//! happens downstream; this module only fixes the data and the coordinate
//! convention.

use chrono::{DateTime, Utc};
use crate::{fields_for_recipient, Engine};
use sha2::{Digest, Sha256};
use signet_types::{
    sort_audit_entries, AuditEntry, DocumentId, DocumentStatus, Field, FieldKind, RecipientRole,
    SignetError, SignetResult,
};

/// One filled field, positioned in stored (top-left origin) coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct FieldOverlay {
    pub field_id: String,
    pub kind: FieldKind,
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: String,
}

/// Certificate row for one signer
#[derive(Clone, Debug)]
pub struct SignerSummary {
    pub name: String,
    pub email: String,
    pub order: u32,
    pub signed_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
}

/// Everything the PDF renderer needs to produce the signed document
#[derive(Clone, Debug)]
pub struct CertificatePayload {
    pub title: String,
    pub completed_at: Option<DateTime<Utc>>,
    /// SHA-256 of the original PDF bytes, hex-encoded
    pub fingerprint_sha256: String,
    pub overlays: Vec<FieldOverlay>,
    pub timeline: Vec<AuditEntry>,
    pub signers: Vec<SignerSummary>,
}

/// Convert a stored top-left y coordinate to PDF bottom-left space.
///
/// Stored layouts measure y downward from the page top; PDF measures
/// upward from the bottom, anchored at the shape's lower edge.
pub fn overlay_y(page_height: f64, field: &Field) -> f64 {
    page_height - field.y - field.height
}

/// Hex-encoded SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

impl Engine {
    /// Assemble the certificate payload for a signed document.
    ///
    /// Called from the finalization job, so it authenticates nothing; the
    /// document must already have settled to `signed`.
    pub async fn certificate_payload(
        &self,
        document_id: &DocumentId,
    ) -> SignetResult<CertificatePayload> {
        let document = self
            .store
            .document(document_id)
            .await?
            .ok_or_else(|| SignetError::not_found("Document"))?;
        if document.status != DocumentStatus::Signed {
            return Err(SignetError::invalid_state("Document is not signed"));
        }

        let original = self
            .files
            .fetch(&document.original_file)
            .await?
            .ok_or_else(|| SignetError::not_found("File"))?;
        let fingerprint_sha256 = sha256_hex(&original.bytes);

        let mut recipients = self.store.recipients_by_document(document_id).await?;
        recipients.sort_by_key(|r| r.order);

        let mut overlays = Vec::new();
        let mut signers = Vec::new();
        for recipient in &recipients {
            if recipient.role != RecipientRole::Signer {
                continue;
            }
            let filled = recipient.parsed_signature_data();
            for field in fields_for_recipient(&document.fields, recipient.order) {
                if let Some(value) = filled.get(&field.id) {
                    overlays.push(FieldOverlay {
                        field_id: field.id.clone(),
                        kind: field.kind,
                        page: field.page,
                        x: field.x,
                        y: field.y,
                        width: field.width,
                        height: field.height,
                        value: value.clone(),
                    });
                }
            }
            signers.push(SignerSummary {
                name: recipient.name.clone(),
                email: recipient.email.clone(),
                order: recipient.order,
                signed_at: recipient.signed_at,
                ip_address: recipient.ip_address.clone(),
            });
        }

        let mut timeline = self.store.audit_by_document(document_id).await?;
        sort_audit_entries(&mut timeline);

        Ok(CertificatePayload {
            title: document.title,
            completed_at: document.completed_at,
            fingerprint_sha256,
            overlays,
            timeline,
            signers,
        })
    }
}
