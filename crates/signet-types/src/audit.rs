//! The audit trail: immutable, timestamped lifecycle records
//!
//! Entries are append-only and conceptually owned by their document, but
//! stored independently so they survive a later document-mutation failure.
//! Ordering for display and for the legal certificate is by timestamp
//! ascending; insertion order is never relied on.

use crate::{AuditEntryId, ClientInfo, DocumentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of lifecycle events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    Created,
    Sent,
    Viewed,
    Signed,
    Voided,
    Downloaded,
    ReminderSent,
}

/// An immutable record of one lifecycle event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub document_id: DocumentId,
    pub event: AuditEvent,
    /// The acting identity as free text, not a foreign key: actors may be
    /// unauthenticated recipients known only by e-mail.
    pub actor_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(document_id: DocumentId, event: AuditEvent, actor_email: impl Into<String>) -> Self {
        Self {
            id: AuditEntryId::generate(),
            document_id,
            event,
            actor_email: actor_email.into(),
            ip_address: None,
            user_agent: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_client(mut self, client: &ClientInfo) -> Self {
        self.ip_address = client.ip_address.clone();
        self.user_agent = client.user_agent.clone();
        self
    }
}

/// Sort entries into display/certificate order: timestamp ascending.
pub fn sort_audit_entries(entries: &mut [AuditEntry]) {
    entries.sort_by_key(|e| e.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_sort_is_by_timestamp_not_insertion() {
        let doc = DocumentId::generate();
        let mut late = AuditEntry::new(doc.clone(), AuditEvent::Signed, "a@x.com");
        late.timestamp = Utc::now();
        let mut early = AuditEntry::new(doc.clone(), AuditEvent::Viewed, "b@x.com");
        early.timestamp = Utc::now() - Duration::minutes(5);

        let mut entries = vec![late, early];
        sort_audit_entries(&mut entries);
        assert_eq!(entries[0].event, AuditEvent::Viewed);
        assert_eq!(entries[1].event, AuditEvent::Signed);
    }

    #[test]
    fn test_event_wire_names() {
        assert_eq!(
            serde_json::to_string(&AuditEvent::ReminderSent).unwrap(),
            "\"reminder_sent\""
        );
    }
}
