//! Mail transport and dispatch
//!
//! [`Mailer`] is the transport seam; production wires an HTTP mail
//! provider behind it, tests use [`MemoryMailer`]. Dispatch helpers apply
//! per-party failure isolation: one bounced address never blocks the rest
//! of a fan-out, and the summary reports how many landed.

use crate::templates::{
    render_reminder, render_signing_complete, render_signing_request, MailContext,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use signet_types::{Recipient, SignetError, SignetResult};
use tracing::warn;

/// One rendered message, ready for the transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Mail transport seam
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> SignetResult<()>;
}

/// Outcome of a fan-out dispatch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Send the initial signing request to one recipient.
pub async fn send_signing_request(
    mailer: &dyn Mailer,
    ctx: &MailContext,
    recipient: &Recipient,
) -> SignetResult<()> {
    mailer.send(render_signing_request(ctx, recipient)).await
}

/// Send a reminder to one recipient.
pub async fn send_reminder(
    mailer: &dyn Mailer,
    ctx: &MailContext,
    recipient: &Recipient,
) -> SignetResult<()> {
    mailer.send(render_reminder(ctx, recipient)).await
}

/// Fan the completion notice out to the owner and every party.
///
/// Failures are isolated per message: each is logged (address only, never
/// the body) and counted, and the call errors only when nothing at all
/// could be sent.
pub async fn send_signing_complete(
    mailer: &dyn Mailer,
    ctx: &MailContext,
    parties: &[Recipient],
) -> SignetResult<DispatchSummary> {
    let mut summary = DispatchSummary::default();

    let owner_notice = render_signing_complete(ctx, &ctx.sender_email, &ctx.sender_name);
    deliver(mailer, owner_notice, &mut summary).await;

    for party in parties {
        let notice = render_signing_complete(ctx, &party.email, &party.name);
        deliver(mailer, notice, &mut summary).await;
    }

    if summary.sent == 0 {
        return Err(SignetError::Storage(
            "completion notice could not be delivered to any party".to_string(),
        ));
    }
    Ok(summary)
}

async fn deliver(mailer: &dyn Mailer, email: OutboundEmail, summary: &mut DispatchSummary) {
    let to = email.to.clone();
    match mailer.send(email).await {
        Ok(()) => summary.sent += 1,
        Err(err) => {
            summary.failed += 1;
            warn!(%to, %err, "completion notice delivery failed");
        }
    }
}

/// In-memory [`Mailer`] capturing sent messages, used by the test suite
#[derive(Default)]
pub struct MemoryMailer {
    sent: RwLock<Vec<OutboundEmail>>,
    /// Addresses that simulate a transport failure
    rejects: RwLock<Vec<String>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reject(&self, address: impl Into<String>) {
        self.rejects.write().push(address.into());
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.read().clone()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutboundEmail) -> SignetResult<()> {
        if self.rejects.read().contains(&email.to) {
            return Err(SignetError::Storage(format!(
                "delivery to {} refused",
                email.to
            )));
        }
        self.sent.write().push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signet_types::{DocumentId, RecipientInput, RecipientRole};

    fn ctx() -> MailContext {
        MailContext {
            base_url: "https://sign.example.com".to_string(),
            sender_name: "Acme".to_string(),
            sender_email: "legal@acme.io".to_string(),
            document_title: "MSA".to_string(),
        }
    }

    fn recipient(email: &str) -> Recipient {
        Recipient::invite(
            DocumentId::generate(),
            &RecipientInput {
                email: email.to_string(),
                name: email.to_string(),
                role: RecipientRole::Signer,
                order: 1,
            },
            None,
        )
    }

    #[tokio::test]
    async fn test_completion_fans_out_to_owner_and_parties() {
        let mailer = MemoryMailer::new();
        let parties = vec![recipient("a@x.io"), recipient("b@x.io")];
        let summary = send_signing_complete(&mailer, &ctx(), &parties)
            .await
            .unwrap();
        assert_eq!(summary, DispatchSummary { sent: 3, failed: 0 });
        let addresses: Vec<_> = mailer.sent().iter().map(|e| e.to.clone()).collect();
        assert_eq!(addresses, ["legal@acme.io", "a@x.io", "b@x.io"]);
    }

    #[tokio::test]
    async fn test_one_bounce_does_not_block_the_rest() {
        let mailer = MemoryMailer::new();
        mailer.reject("a@x.io");
        let parties = vec![recipient("a@x.io"), recipient("b@x.io")];
        let summary = send_signing_complete(&mailer, &ctx(), &parties)
            .await
            .unwrap();
        assert_eq!(summary, DispatchSummary { sent: 2, failed: 1 });
    }

    #[tokio::test]
    async fn test_total_delivery_failure_is_an_error() {
        let mailer = MemoryMailer::new();
        mailer.reject("legal@acme.io");
        mailer.reject("a@x.io");
        let parties = vec![recipient("a@x.io")];
        assert!(send_signing_complete(&mailer, &ctx(), &parties)
            .await
            .is_err());
    }
}
