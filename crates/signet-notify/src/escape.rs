//! HTML and header escaping for outbound mail
//!
//! Recipient names and document titles are caller-controlled, so both the
//! HTML bodies and the subject lines treat them as hostile: bodies get
//! entity escaping, subjects additionally get header-injection stripping
//! (a CR or LF in a subject would smuggle extra headers past the mailer).

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Sanitize a string for use in a subject line: each line break becomes a
/// space (a CRLF pair counts as one break), then HTML-significant
/// characters are escaped.
pub fn escape_subject(input: &str) -> String {
    let flattened = input.replace("\r\n", " ").replace(['\r', '\n'], " ");
    escape_html(&flattened)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_all_significant_characters() {
        assert_eq!(
            escape_html(r#"<b>"Fish & Chips'"#),
            "&lt;b&gt;&quot;Fish &amp; Chips&#039;"
        );
    }

    #[test]
    fn test_apostrophe_uses_zero_padded_entity() {
        assert_eq!(escape_html("O'Brien"), "O&#039;Brien");
        assert_eq!(escape_subject("O'Brien"), "O&#039;Brien");
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(escape_html("Vertrag für Müller 契約"), "Vertrag für Müller 契約");
    }

    #[test]
    fn test_subject_strips_header_injection() {
        assert_eq!(
            escape_subject("Invoice\r\nBcc: everyone@example.com"),
            "Invoice Bcc: everyone@example.com"
        );
        assert_eq!(escape_subject("line\none\ntwo"), "line one two");
    }

    #[test]
    fn test_subject_spaces_each_line_break() {
        // A CRLF pair is one break; bare CRs and LFs each count alone
        assert_eq!(escape_subject("a\n\nb"), "a  b");
        assert_eq!(escape_subject("a\r\n\nb"), "a  b");
        assert_eq!(escape_subject("a\r\rb"), "a  b");
    }

    #[test]
    fn test_subject_escapes_after_flattening() {
        assert_eq!(escape_subject("a\n<b>"), "a &lt;b&gt;");
    }

    #[test]
    fn test_plain_strings_untouched() {
        assert_eq!(escape_subject("Master Services Agreement"), "Master Services Agreement");
    }
}
