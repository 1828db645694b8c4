//! Store traits the engine operates through

use async_trait::async_trait;
use signet_types::{
    AccessToken, AuditEntry, Document, DocumentId, Recipient, RecipientId, SignetResult, Template,
    TemplateId, User, UserId,
};

/// Durable source of truth for all lifecycle records.
///
/// Implementations must provide per-record atomicity for the `update_*`
/// methods; nothing here holds a lock across calls. Audit entries are
/// append-only and must tolerate concurrent appends for one document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // ── Users ────────────────────────────────────────────────────────

    async fn upsert_user(&self, user: User) -> SignetResult<()>;

    async fn user(&self, id: &UserId) -> SignetResult<Option<User>>;

    /// Unique lookup by the external identity subject.
    async fn user_by_subject(&self, subject: &str) -> SignetResult<Option<User>>;

    // ── Documents ────────────────────────────────────────────────────

    async fn insert_document(&self, document: Document) -> SignetResult<()>;

    async fn document(&self, id: &DocumentId) -> SignetResult<Option<Document>>;

    /// Replace the stored document; errors if it does not exist.
    async fn update_document(&self, document: Document) -> SignetResult<()>;

    async fn documents_by_owner(&self, owner: &UserId) -> SignetResult<Vec<Document>>;

    // ── Recipients ───────────────────────────────────────────────────

    /// Insert a recipient. The access token is a system-wide unique index;
    /// a collision is a storage error.
    async fn insert_recipient(&self, recipient: Recipient) -> SignetResult<()>;

    async fn recipient(&self, id: &RecipientId) -> SignetResult<Option<Recipient>>;

    /// Unique lookup by bearer token.
    async fn recipient_by_token(&self, token: &AccessToken) -> SignetResult<Option<Recipient>>;

    async fn recipients_by_document(
        &self,
        document_id: &DocumentId,
    ) -> SignetResult<Vec<Recipient>>;

    /// Replace the stored recipient; errors if it does not exist.
    async fn update_recipient(&self, recipient: Recipient) -> SignetResult<()>;

    // ── Audit trail ──────────────────────────────────────────────────

    /// Append-only; entries are never mutated or deleted.
    async fn append_audit(&self, entry: AuditEntry) -> SignetResult<()>;

    /// All entries for one document, in storage order. Callers sort by
    /// timestamp; insertion order carries no meaning.
    async fn audit_by_document(&self, document_id: &DocumentId) -> SignetResult<Vec<AuditEntry>>;

    // ── Templates ────────────────────────────────────────────────────

    async fn insert_template(&self, template: Template) -> SignetResult<()>;

    async fn template(&self, id: &TemplateId) -> SignetResult<Option<Template>>;

    async fn update_template(&self, template: Template) -> SignetResult<()>;

    async fn delete_template(&self, id: &TemplateId) -> SignetResult<()>;

    async fn system_templates(&self) -> SignetResult<Vec<Template>>;

    async fn templates_by_owner(&self, owner: &UserId) -> SignetResult<Vec<Template>>;
}
