//! Recipients: the parties invited to a document
//!
//! A recipient is created when a document is sent and never deleted. Their
//! access token is the only credential for the signing session, and their
//! `signature_data` is a JSON map from field id to submitted value. The map
//! is parsed leniently everywhere: a corrupt blob means "nothing filled
//! yet", never a hard failure.

use crate::{AccessToken, DocumentId, RecipientId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Submitted field values may carry signature images as data URIs, so the
/// ceiling is generous.
pub const MAX_FIELD_VALUE_LEN: usize = 100_000;

/// Whether a recipient signs or just observes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    Signer,
    Cc,
}

/// A recipient's own signing progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientStatus {
    Pending,
    Viewed,
    Signed,
}

/// Client metadata captured at viewing/signing time for the audit trail
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn is_empty(&self) -> bool {
        self.ip_address.is_none() && self.user_agent.is_none()
    }
}

/// Caller-supplied description of one recipient, given at send time.
///
/// `order` is deliberately caller-assigned, not auto-incremented: it is the
/// 1-based signing position that field slots resolve against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientInput {
    pub email: String,
    pub name: String,
    pub role: RecipientRole,
    pub order: u32,
}

/// One party invited to a document via a unique bearer token
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    pub document_id: DocumentId,
    pub email: String,
    pub name: String,
    pub role: RecipientRole,
    pub order: u32,
    pub status: RecipientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<DateTime<Utc>>,
    /// JSON map from field id to submitted value (string, date string, or
    /// image data URI). Stored as the raw string; parse with
    /// [`Recipient::parsed_signature_data`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_data: Option<String>,
    pub access_token: AccessToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Recipient {
    /// Create a pending recipient for `document_id` with a fresh token.
    pub fn invite(
        document_id: DocumentId,
        input: &RecipientInput,
        token_expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: RecipientId::generate(),
            document_id,
            email: input.email.clone(),
            name: input.name.clone(),
            role: input.role,
            order: input.order,
            status: RecipientStatus::Pending,
            signed_at: None,
            signature_data: None,
            access_token: AccessToken::mint(),
            token_expires_at,
            ip_address: None,
            user_agent: None,
        }
    }

    /// Parse the stored signature data, treating a missing or corrupt blob
    /// as an empty map.
    pub fn parsed_signature_data(&self) -> HashMap<String, String> {
        self.signature_data
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    /// Merge one submitted value into the signature data map.
    pub fn set_signature_value(&mut self, field_id: &str, value: impl Into<String>) {
        let mut data = self.parsed_signature_data();
        data.insert(field_id.to_string(), value.into());
        // A flat string map always serializes
        self.signature_data = serde_json::to_string(&data).ok();
    }

    /// Record client metadata if the caller supplied any.
    pub fn record_client(&mut self, client: &ClientInfo) {
        if let Some(ip) = &client.ip_address {
            self.ip_address = Some(ip.clone());
        }
        if let Some(ua) = &client.user_agent {
            self.user_agent = Some(ua.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient() -> Recipient {
        Recipient::invite(
            DocumentId::generate(),
            &RecipientInput {
                email: "jo@x.com".to_string(),
                name: "Jo".to_string(),
                role: RecipientRole::Signer,
                order: 1,
            },
            None,
        )
    }

    #[test]
    fn test_invite_starts_pending_with_fresh_token() {
        let a = recipient();
        let b = recipient();
        assert_eq!(a.status, RecipientStatus::Pending);
        assert!(a.signature_data.is_none());
        assert_ne!(a.access_token, b.access_token);
    }

    #[test]
    fn test_signature_data_round_trip() {
        let mut r = recipient();
        r.set_signature_value("field-1", "Jo Harper");
        r.set_signature_value("field-2", "2026-08-30");

        let parsed = r.parsed_signature_data();
        assert_eq!(parsed.get("field-1").unwrap(), "Jo Harper");
        assert_eq!(parsed.get("field-2").unwrap(), "2026-08-30");

        // Re-serializing and re-parsing recovers the identical map
        let raw = r.signature_data.clone().unwrap();
        let reparsed: HashMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn test_corrupt_signature_data_reads_as_empty() {
        let mut r = recipient();
        r.signature_data = Some("{not json".to_string());
        assert!(r.parsed_signature_data().is_empty());

        // Merging on top of corruption starts from an empty map
        r.set_signature_value("field-1", "value");
        assert_eq!(r.parsed_signature_data().len(), 1);
    }

    #[test]
    fn test_record_client_keeps_existing_when_absent() {
        let mut r = recipient();
        r.record_client(&ClientInfo {
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("test-agent".to_string()),
        });
        r.record_client(&ClientInfo::default());
        assert_eq!(r.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(r.user_agent.as_deref(), Some("test-agent"));
    }
}
