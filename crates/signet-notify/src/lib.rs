//! Outbound notifications for Signet
//!
//! Rendering and transport for the three lifecycle messages: the initial
//! signing request, reminders, and the all-parties completion notice.
//! Everything caller-controlled is escaped before it reaches a subject
//! line or an HTML body, and signing links (which embed bearer tokens)
//! are rendered but never logged.

#![deny(unsafe_code)]

mod escape;
mod mailer;
mod templates;

pub use escape::*;
pub use mailer::*;
pub use templates::*;
