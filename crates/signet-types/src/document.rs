//! Documents and their field layout
//!
//! A document's status moves monotonically along
//! `draft → sent → viewed → signed`, with `voided` and `expired` reachable
//! as side exits and no edges back out of any terminal state. Expiry is a
//! property of the clock rather than a stored transition: callers derive
//! the effective status from `expires_at` and decide per call path whether
//! to persist it.

use crate::{DocumentId, FileRef, TemplateId, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Documents live this long after being sent.
pub const DOCUMENT_TTL_DAYS: i64 = 30;

/// Lifecycle status of a document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Viewed,
    Signed,
    Expired,
    Voided,
}

impl DocumentStatus {
    /// Terminal states admit no further field or recipient mutation,
    /// only audit appends.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Signed | Self::Voided | Self::Expired)
    }
}

/// The kind of input a field collects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Signature,
    Date,
    Text,
    Initials,
    Checkbox,
}

/// Positional slot a field is assigned to.
///
/// Slots name a signing position (1, 2, 3), not a recipient id. This lets
/// a field layout exist before any recipient does — e.g. on a template —
/// and resolve to concrete recipients only at signing time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldSlot {
    #[serde(rename = "sender")]
    Sender,
    #[serde(rename = "recipient")]
    Recipient,
    #[serde(rename = "recipient_2")]
    Recipient2,
    #[serde(rename = "recipient_3")]
    Recipient3,
}

/// A placeable input on the document
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Unique within the owning document
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    /// Placement is opaque to the lifecycle core; only the PDF renderer
    /// interprets these.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub page: u32,
    pub assigned_to: FieldSlot,
    pub required: bool,
}

/// A signable unit: one PDF, a field layout, and a lifecycle status
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub owner_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,
    pub title: String,
    pub status: DocumentStatus,
    pub original_file: FileRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_file: Option<FileRef>,
    pub variable_values: HashMap<String, String>,
    pub fields: Vec<Field>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voided_reason: Option<String>,
}

impl Document {
    /// Create a fresh draft owned by `owner_id`.
    pub fn draft(owner_id: UserId, title: impl Into<String>, original_file: FileRef) -> Self {
        Self {
            id: DocumentId::generate(),
            owner_id,
            template_id: None,
            title: title.into(),
            status: DocumentStatus::Draft,
            original_file,
            signed_file: None,
            variable_values: HashMap::new(),
            fields: Vec::new(),
            created_at: Utc::now(),
            sent_at: None,
            completed_at: None,
            expires_at: None,
            voided_reason: None,
        }
    }

    pub fn with_template(mut self, template_id: TemplateId) -> Self {
        self.template_id = Some(template_id);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_variable_values(mut self, values: HashMap<String, String>) -> Self {
        self.variable_values = values;
        self
    }

    /// Whether the expiry deadline has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at < now).unwrap_or(false)
    }

    /// The status a reader should see at `now`: stored status, except that
    /// a lapsed deadline on a non-terminal document reads as `Expired`.
    pub fn effective_status(&self, now: DateTime<Utc>) -> DocumentStatus {
        if !self.status.is_terminal() && self.is_expired_at(now) {
            DocumentStatus::Expired
        } else {
            self.status
        }
    }

    /// Field add/remove is only legal before the document settles.
    pub fn fields_mutable(&self) -> bool {
        matches!(
            self.status,
            DocumentStatus::Draft | DocumentStatus::Sent | DocumentStatus::Viewed
        )
    }

    pub fn field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    /// The expiry deadline assigned when a document is sent.
    pub fn expiry_from(sent_at: DateTime<Utc>) -> DateTime<Utc> {
        sent_at + Duration::days(DOCUMENT_TTL_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::draft(
            UserId::generate(),
            "MSA",
            FileRef("file-1".to_string()),
        )
    }

    #[test]
    fn test_new_draft() {
        let d = doc();
        assert_eq!(d.status, DocumentStatus::Draft);
        assert!(d.expires_at.is_none());
        assert!(d.fields_mutable());
    }

    #[test]
    fn test_effective_status_reports_expiry_without_persisting() {
        let mut d = doc();
        d.status = DocumentStatus::Sent;
        d.expires_at = Some(Utc::now() - Duration::days(1));

        assert_eq!(d.effective_status(Utc::now()), DocumentStatus::Expired);
        // Stored status untouched
        assert_eq!(d.status, DocumentStatus::Sent);
    }

    #[test]
    fn test_effective_status_leaves_terminal_states_alone() {
        let mut d = doc();
        d.status = DocumentStatus::Signed;
        d.expires_at = Some(Utc::now() - Duration::days(1));
        assert_eq!(d.effective_status(Utc::now()), DocumentStatus::Signed);
    }

    #[test]
    fn test_fields_frozen_in_terminal_states() {
        let mut d = doc();
        for status in [
            DocumentStatus::Signed,
            DocumentStatus::Voided,
            DocumentStatus::Expired,
        ] {
            d.status = status;
            assert!(!d.fields_mutable());
        }
    }

    #[test]
    fn test_expiry_is_thirty_days_out() {
        let now = Utc::now();
        assert_eq!(Document::expiry_from(now), now + Duration::days(30));
    }

    #[test]
    fn test_field_slot_wire_names() {
        assert_eq!(
            serde_json::to_string(&FieldSlot::Recipient2).unwrap(),
            "\"recipient_2\""
        );
        assert_eq!(
            serde_json::to_string(&FieldSlot::Sender).unwrap(),
            "\"sender\""
        );
    }
}
