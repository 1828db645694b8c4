//! E-mail rendering
//!
//! Each render function takes already-loaded records and produces one
//! [`OutboundEmail`]. The signing link embeds the recipient's bearer
//! token, so rendered bodies must never be logged; callers log message
//! metadata only.

use crate::escape::{escape_html, escape_subject};
use crate::mailer::OutboundEmail;
use signet_types::Recipient;

/// Context shared by every rendered message
#[derive(Clone, Debug)]
pub struct MailContext {
    /// Public origin the signing links point at, without a trailing slash
    pub base_url: String,
    pub sender_name: String,
    pub sender_email: String,
    pub document_title: String,
}

fn signing_link(base_url: &str, recipient: &Recipient) -> String {
    format!("{base_url}/sign/{}", recipient.access_token.as_str())
}

/// The initial "please sign" message sent to each recipient.
pub fn render_signing_request(ctx: &MailContext, recipient: &Recipient) -> OutboundEmail {
    let subject = escape_subject(&format!(
        "{} sent you a document to sign: {}",
        ctx.sender_name, ctx.document_title
    ));
    let html = format!(
        "<p>Hi {name},</p>\
         <p>{sender} ({sender_email}) has sent you <strong>{title}</strong> to review and sign.</p>\
         <p><a href=\"{link}\">Review and sign the document</a></p>\
         <p>This link is unique to you. Do not forward it.</p>",
        name = escape_html(&recipient.name),
        sender = escape_html(&ctx.sender_name),
        sender_email = escape_html(&ctx.sender_email),
        title = escape_html(&ctx.document_title),
        link = signing_link(&ctx.base_url, recipient),
    );
    OutboundEmail {
        to: recipient.email.clone(),
        subject,
        html,
    }
}

/// A nudge for a recipient who has not signed yet.
pub fn render_reminder(ctx: &MailContext, recipient: &Recipient) -> OutboundEmail {
    let subject = escape_subject(&format!(
        "Reminder: {} is waiting for your signature",
        ctx.document_title
    ));
    let html = format!(
        "<p>Hi {name},</p>\
         <p>This is a reminder that {sender} is still waiting for you to sign \
         <strong>{title}</strong>.</p>\
         <p><a href=\"{link}\">Review and sign the document</a></p>",
        name = escape_html(&recipient.name),
        sender = escape_html(&ctx.sender_name),
        title = escape_html(&ctx.document_title),
        link = signing_link(&ctx.base_url, recipient),
    );
    OutboundEmail {
        to: recipient.email.clone(),
        subject,
        html,
    }
}

/// Completion notice, sent to the owner and to every party once the last
/// signer finishes. Carries no signing link.
pub fn render_signing_complete(ctx: &MailContext, to: &str, name: &str) -> OutboundEmail {
    let subject = escape_subject(&format!("Completed: {}", ctx.document_title));
    let html = format!(
        "<p>Hi {name},</p>\
         <p><strong>{title}</strong> has been signed by all parties. \
         The finalized document is available from {sender}.</p>",
        name = escape_html(name),
        title = escape_html(&ctx.document_title),
        sender = escape_html(&ctx.sender_name),
    );
    OutboundEmail {
        to: to.to_string(),
        subject,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signet_types::{DocumentId, RecipientInput, RecipientRole};

    fn ctx() -> MailContext {
        MailContext {
            base_url: "https://sign.example.com".to_string(),
            sender_name: "Acme <Legal>".to_string(),
            sender_email: "legal@acme.io".to_string(),
            document_title: "MSA & SOW".to_string(),
        }
    }

    fn recipient() -> Recipient {
        Recipient::invite(
            DocumentId::generate(),
            &RecipientInput {
                email: "jo@client.io".to_string(),
                name: "Jo <script>".to_string(),
                role: RecipientRole::Signer,
                order: 1,
            },
            None,
        )
    }

    #[test]
    fn test_signing_request_embeds_token_link_once() {
        let r = recipient();
        let email = render_signing_request(&ctx(), &r);
        assert_eq!(email.to, "jo@client.io");
        assert!(email
            .html
            .contains(&format!("https://sign.example.com/sign/{}", r.access_token.as_str())));
        assert_eq!(email.html.matches("/sign/").count(), 1);
    }

    #[test]
    fn test_caller_controlled_text_is_escaped() {
        let email = render_signing_request(&ctx(), &recipient());
        assert!(email.html.contains("Jo &lt;script&gt;"));
        assert!(email.html.contains("MSA &amp; SOW"));
        assert!(!email.html.contains("<script>"));
        assert!(email.subject.contains("Acme &lt;Legal&gt;"));
    }

    #[test]
    fn test_completion_notice_has_no_signing_link() {
        let email = render_signing_complete(&ctx(), "legal@acme.io", "Acme");
        assert!(!email.html.contains("/sign/"));
        assert!(email.subject.starts_with("Completed:"));
    }
}
