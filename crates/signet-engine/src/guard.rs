//! Identity and token guard
//!
//! Two authorization modes, both pure lookups:
//!
//! - **Owner mode**: an authenticated caller subject resolves to a user
//!   record; an operation on a document proceeds only when the document's
//!   owner matches.
//! - **Recipient mode**: possession of the bearer token is the entire
//!   check. No further identity verification happens, so the failure
//!   message never echoes the presented token.
//!
//! Callers of the guard still apply document-status checks before
//! mutating anything.

use chrono::Utc;
use crate::Engine;
use signet_types::{
    AccessToken, Document, DocumentId, Recipient, SignetError, SignetResult, User,
};

/// The caller of an owner-mode operation, as handed over by the external
/// identity provider. `anonymous()` models a request with no identity.
#[derive(Clone, Debug)]
pub struct Caller {
    subject: Option<String>,
}

impl Caller {
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { subject: None }
    }
}

impl Engine {
    /// Resolve an owner-mode caller to their user record.
    pub(crate) async fn resolve_user(&self, caller: &Caller) -> SignetResult<User> {
        let subject = caller
            .subject
            .as_deref()
            .ok_or(SignetError::NotAuthenticated)?;
        self.store
            .user_by_subject(subject)
            .await?
            .ok_or_else(|| SignetError::not_found("User"))
    }

    /// Resolve an owner-mode caller and load a document they own.
    pub(crate) async fn resolve_owned_document(
        &self,
        caller: &Caller,
        document_id: &DocumentId,
    ) -> SignetResult<(User, Document)> {
        let user = self.resolve_user(caller).await?;
        let document = self
            .store
            .document(document_id)
            .await?
            .ok_or_else(|| SignetError::not_found("Document"))?;
        if document.owner_id != user.id {
            return Err(SignetError::unauthorized(
                "Not authorized to access this document",
            ));
        }
        Ok((user, document))
    }

    /// Resolve a bearer token to its recipient and document.
    ///
    /// Token possession is the whole security boundary here; an unknown or
    /// lapsed token fails without revealing anything about why.
    pub(crate) async fn resolve_token(
        &self,
        token: &AccessToken,
    ) -> SignetResult<(Recipient, Document)> {
        let recipient = self
            .store
            .recipient_by_token(token)
            .await?
            .ok_or_else(|| SignetError::unauthorized("Invalid access token"))?;

        if let Some(expires_at) = recipient.token_expires_at {
            if expires_at < Utc::now() {
                return Err(SignetError::Expired);
            }
        }

        let document = self
            .store
            .document(&recipient.document_id)
            .await?
            .ok_or_else(|| SignetError::not_found("Document"))?;
        Ok((recipient, document))
    }
}
