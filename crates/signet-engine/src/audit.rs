//! Audit recorder
//!
//! Appends are best-effort: the audit trail is layered onto the source of
//! truth, not a two-phase-commit partner, so a failed append is logged and
//! the state transition it describes stands. Reads sort by timestamp
//! ascending — concurrent writers may interleave insertion order freely.

use crate::{Caller, Engine};
use signet_types::{sort_audit_entries, AuditEntry, DocumentId, SignetResult};
use tracing::warn;

impl Engine {
    /// Append an audit entry, never failing the surrounding transition.
    pub(crate) async fn record(&self, entry: AuditEntry) {
        let event = entry.event;
        let document_id = entry.document_id.clone();
        if let Err(err) = self.store.append_audit(entry).await {
            warn!(%document_id, ?event, %err, "audit append failed; transition stands");
        }
    }

    /// The full audit trail for an owned document, timestamp ascending.
    pub async fn audit_trail(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
    ) -> SignetResult<Vec<AuditEntry>> {
        self.resolve_owned_document(caller, document_id).await?;
        let mut entries = self.store.audit_by_document(document_id).await?;
        sort_audit_entries(&mut entries);
        Ok(entries)
    }
}
