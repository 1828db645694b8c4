//! Input validation for send-time and signing-time data
//!
//! The e-mail check is deliberately RFC-lite: `local@domain.tld` with sane
//! length bounds. Deliverability is the notification layer's problem; this
//! only rejects input that could never be an address.

use crate::{RecipientInput, RecipientRole, SignetError, SignetResult, MAX_FIELD_VALUE_LEN};
use std::collections::HashSet;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_RECIPIENT_NAME_LEN: usize = 100;

/// RFC-lite e-mail validation: `local@domain.tld`, at most 254 chars.
pub fn validate_email(email: &str) -> SignetResult<()> {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(SignetError::validation(format!(
            "Invalid recipient email: {email:?}"
        )));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(SignetError::validation(format!(
            "Invalid recipient email: {email:?}"
        )));
    };

    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.split('.').all(|label| !label.is_empty());

    if local.is_empty() || domain.contains('@') || !domain_ok {
        return Err(SignetError::validation(format!(
            "Invalid recipient email: {email:?}"
        )));
    }

    Ok(())
}

/// Display names must be non-empty and at most 100 chars.
pub fn validate_recipient_name(name: &str) -> SignetResult<()> {
    if name.trim().is_empty() {
        return Err(SignetError::validation("Recipient name cannot be empty"));
    }
    if name.len() > MAX_RECIPIENT_NAME_LEN {
        return Err(SignetError::validation(format!(
            "Recipient name too long (max {MAX_RECIPIENT_NAME_LEN} characters)"
        )));
    }
    Ok(())
}

/// Submitted field values must be non-empty after trimming and bounded.
pub fn validate_field_value(value: &str) -> SignetResult<()> {
    if value.trim().is_empty() {
        return Err(SignetError::validation("Signature value cannot be empty"));
    }
    if value.len() > MAX_FIELD_VALUE_LEN {
        return Err(SignetError::validation("Signature value too large"));
    }
    Ok(())
}

/// Validate the full recipient list supplied at send time.
///
/// Signing orders must be unique among signer-role recipients: field slots
/// resolve positionally, and two signers sharing an order would see the
/// same fields and make completion aggregation ambiguous.
pub fn validate_recipients(recipients: &[RecipientInput]) -> SignetResult<()> {
    if recipients.is_empty() {
        return Err(SignetError::validation(
            "At least one recipient is required",
        ));
    }

    let mut signer_orders = HashSet::new();
    for recipient in recipients {
        validate_email(&recipient.email)?;
        validate_recipient_name(&recipient.name)?;

        if recipient.order == 0 {
            return Err(SignetError::validation(
                "Recipient signing order must start at 1",
            ));
        }

        if recipient.role == RecipientRole::Signer && !signer_orders.insert(recipient.order) {
            return Err(SignetError::validation(format!(
                "Duplicate signing order {} among signers",
                recipient.order
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(email: &str, name: &str, role: RecipientRole, order: u32) -> RecipientInput {
        RecipientInput {
            email: email.to_string(),
            name: name.to_string(),
            role,
            order,
        }
    }

    #[test]
    fn test_accepts_plain_addresses() {
        for email in ["jo@x.com", "a.b+tag@sub.example.co.uk", "x@y.io"] {
            assert!(validate_email(email).is_ok(), "{email}");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for email in [
            "",
            "jo",
            "jo@",
            "@x.com",
            "jo@nodot",
            "jo@x.",
            "jo@.com",
            "jo@a..com",
            "jo@x@y.com",
        ] {
            assert!(validate_email(email).is_err(), "{email:?}");
        }
    }

    #[test]
    fn test_rejects_overlong_address() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&email).is_err());
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_recipient_name("Jo").is_ok());
        assert!(validate_recipient_name("").is_err());
        assert!(validate_recipient_name("  ").is_err());
        assert!(validate_recipient_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_field_value_bounds() {
        assert!(validate_field_value("Jo Harper").is_ok());
        assert!(validate_field_value("   ").is_err());
        assert!(validate_field_value(&"v".repeat(MAX_FIELD_VALUE_LEN + 1)).is_err());
    }

    #[test]
    fn test_empty_recipient_list_rejected() {
        assert!(validate_recipients(&[]).is_err());
    }

    #[test]
    fn test_duplicate_signer_order_rejected() {
        let recipients = vec![
            input("a@x.com", "A", RecipientRole::Signer, 1),
            input("b@x.com", "B", RecipientRole::Signer, 1),
        ];
        let err = validate_recipients(&recipients).unwrap_err();
        assert!(matches!(err, SignetError::Validation(_)));
    }

    #[test]
    fn test_cc_may_share_order_with_signer() {
        let recipients = vec![
            input("a@x.com", "A", RecipientRole::Signer, 1),
            input("b@x.com", "B", RecipientRole::Cc, 1),
        ];
        assert!(validate_recipients(&recipients).is_ok());
    }

    #[test]
    fn test_zero_order_rejected() {
        let recipients = vec![input("a@x.com", "A", RecipientRole::Signer, 0)];
        assert!(validate_recipients(&recipients).is_err());
    }
}
