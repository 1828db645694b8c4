//! In-memory store with secondary indexes
//!
//! HashMap tables behind `parking_lot::RwLock`, with the indexes the
//! engine's lookup paths need: owner → documents, document → recipients,
//! access token → recipient, document → audit entries. The token index is
//! a unique constraint: inserting a recipient whose token already exists
//! anywhere in the system fails.

use crate::DocumentStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use signet_types::{
    AccessToken, AuditEntry, Document, DocumentId, Recipient, RecipientId, SignetError,
    SignetResult, Template, TemplateId, User, UserId,
};
use std::collections::HashMap;

/// In-memory [`DocumentStore`] used by the test suite
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    subject_index: RwLock<HashMap<String, UserId>>,
    documents: RwLock<HashMap<DocumentId, Document>>,
    owner_index: RwLock<HashMap<UserId, Vec<DocumentId>>>,
    recipients: RwLock<HashMap<RecipientId, Recipient>>,
    token_index: RwLock<HashMap<AccessToken, RecipientId>>,
    recipient_index: RwLock<HashMap<DocumentId, Vec<RecipientId>>>,
    audit: RwLock<HashMap<DocumentId, Vec<AuditEntry>>>,
    templates: RwLock<HashMap<TemplateId, Template>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn upsert_user(&self, user: User) -> SignetResult<()> {
        self.subject_index
            .write()
            .insert(user.subject.clone(), user.id.clone());
        self.users.write().insert(user.id.clone(), user);
        Ok(())
    }

    async fn user(&self, id: &UserId) -> SignetResult<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn user_by_subject(&self, subject: &str) -> SignetResult<Option<User>> {
        let id = match self.subject_index.read().get(subject) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.users.read().get(&id).cloned())
    }

    async fn insert_document(&self, document: Document) -> SignetResult<()> {
        let mut documents = self.documents.write();
        if documents.contains_key(&document.id) {
            return Err(SignetError::Storage(format!(
                "duplicate document id {}",
                document.id
            )));
        }
        self.owner_index
            .write()
            .entry(document.owner_id.clone())
            .or_default()
            .push(document.id.clone());
        documents.insert(document.id.clone(), document);
        Ok(())
    }

    async fn document(&self, id: &DocumentId) -> SignetResult<Option<Document>> {
        Ok(self.documents.read().get(id).cloned())
    }

    async fn update_document(&self, document: Document) -> SignetResult<()> {
        let mut documents = self.documents.write();
        if !documents.contains_key(&document.id) {
            return Err(SignetError::not_found("Document"));
        }
        documents.insert(document.id.clone(), document);
        Ok(())
    }

    async fn documents_by_owner(&self, owner: &UserId) -> SignetResult<Vec<Document>> {
        let ids = match self.owner_index.read().get(owner) {
            Some(ids) => ids.clone(),
            None => return Ok(vec![]),
        };
        let documents = self.documents.read();
        Ok(ids
            .iter()
            .filter_map(|id| documents.get(id).cloned())
            .collect())
    }

    async fn insert_recipient(&self, recipient: Recipient) -> SignetResult<()> {
        let mut token_index = self.token_index.write();
        if token_index.contains_key(&recipient.access_token) {
            return Err(SignetError::Storage(
                "access token collision on recipient insert".to_string(),
            ));
        }
        token_index.insert(recipient.access_token.clone(), recipient.id.clone());
        self.recipient_index
            .write()
            .entry(recipient.document_id.clone())
            .or_default()
            .push(recipient.id.clone());
        self.recipients
            .write()
            .insert(recipient.id.clone(), recipient);
        Ok(())
    }

    async fn recipient(&self, id: &RecipientId) -> SignetResult<Option<Recipient>> {
        Ok(self.recipients.read().get(id).cloned())
    }

    async fn recipient_by_token(&self, token: &AccessToken) -> SignetResult<Option<Recipient>> {
        let id = match self.token_index.read().get(token) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.recipients.read().get(&id).cloned())
    }

    async fn recipients_by_document(
        &self,
        document_id: &DocumentId,
    ) -> SignetResult<Vec<Recipient>> {
        let ids = match self.recipient_index.read().get(document_id) {
            Some(ids) => ids.clone(),
            None => return Ok(vec![]),
        };
        let recipients = self.recipients.read();
        Ok(ids
            .iter()
            .filter_map(|id| recipients.get(id).cloned())
            .collect())
    }

    async fn update_recipient(&self, recipient: Recipient) -> SignetResult<()> {
        let mut recipients = self.recipients.write();
        if !recipients.contains_key(&recipient.id) {
            return Err(SignetError::not_found("Recipient"));
        }
        recipients.insert(recipient.id.clone(), recipient);
        Ok(())
    }

    async fn append_audit(&self, entry: AuditEntry) -> SignetResult<()> {
        self.audit
            .write()
            .entry(entry.document_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn audit_by_document(&self, document_id: &DocumentId) -> SignetResult<Vec<AuditEntry>> {
        Ok(self
            .audit
            .read()
            .get(document_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_template(&self, template: Template) -> SignetResult<()> {
        self.templates
            .write()
            .insert(template.id.clone(), template);
        Ok(())
    }

    async fn template(&self, id: &TemplateId) -> SignetResult<Option<Template>> {
        Ok(self.templates.read().get(id).cloned())
    }

    async fn update_template(&self, template: Template) -> SignetResult<()> {
        let mut templates = self.templates.write();
        if !templates.contains_key(&template.id) {
            return Err(SignetError::not_found("Template"));
        }
        templates.insert(template.id.clone(), template);
        Ok(())
    }

    async fn delete_template(&self, id: &TemplateId) -> SignetResult<()> {
        if self.templates.write().remove(id).is_none() {
            return Err(SignetError::not_found("Template"));
        }
        Ok(())
    }

    async fn system_templates(&self) -> SignetResult<Vec<Template>> {
        Ok(self
            .templates
            .read()
            .values()
            .filter(|t| t.system)
            .cloned()
            .collect())
    }

    async fn templates_by_owner(&self, owner: &UserId) -> SignetResult<Vec<Template>> {
        Ok(self
            .templates
            .read()
            .values()
            .filter(|t| t.owner_id.as_ref() == Some(owner))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signet_types::{FileRef, RecipientInput, RecipientRole};

    fn sample_recipient(document_id: DocumentId) -> Recipient {
        Recipient::invite(
            document_id,
            &RecipientInput {
                email: "jo@x.com".to_string(),
                name: "Jo".to_string(),
                role: RecipientRole::Signer,
                order: 1,
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_user_subject_lookup() {
        let store = MemoryStore::new();
        let user = User::register("subj-1", "owner@x.com", "Owner");
        let id = user.id.clone();
        store.upsert_user(user).await.unwrap();

        let found = store.user_by_subject("subj-1").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(store.user_by_subject("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_document_owner_index() {
        let store = MemoryStore::new();
        let owner = UserId::generate();
        let doc = Document::draft(owner.clone(), "MSA", FileRef("f".into()));
        store.insert_document(doc.clone()).await.unwrap();

        let docs = store.documents_by_owner(&owner).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, doc.id);
    }

    #[tokio::test]
    async fn test_duplicate_document_insert_rejected() {
        let store = MemoryStore::new();
        let doc = Document::draft(UserId::generate(), "MSA", FileRef("f".into()));
        store.insert_document(doc.clone()).await.unwrap();
        assert!(store.insert_document(doc).await.is_err());
    }

    #[tokio::test]
    async fn test_token_index_is_unique() {
        let store = MemoryStore::new();
        let doc_id = DocumentId::generate();
        let first = sample_recipient(doc_id.clone());
        let token = first.access_token.clone();
        store.insert_recipient(first).await.unwrap();

        let mut clash = sample_recipient(doc_id);
        clash.access_token = token.clone();
        assert!(store.insert_recipient(clash).await.is_err());

        let found = store.recipient_by_token(&token).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_record_errors() {
        let store = MemoryStore::new();
        let doc = Document::draft(UserId::generate(), "MSA", FileRef("f".into()));
        assert!(matches!(
            store.update_document(doc).await,
            Err(SignetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_audit_append_only() {
        use signet_types::{AuditEntry, AuditEvent};

        let store = MemoryStore::new();
        let doc_id = DocumentId::generate();
        store
            .append_audit(AuditEntry::new(doc_id.clone(), AuditEvent::Created, "o@x.com"))
            .await
            .unwrap();
        store
            .append_audit(AuditEntry::new(doc_id.clone(), AuditEvent::Sent, "o@x.com"))
            .await
            .unwrap();

        let entries = store.audit_by_document(&doc_id).await.unwrap();
        assert_eq!(entries.len(), 2);
    }
}
